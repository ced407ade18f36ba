use common::{GenerationKind, TaskStatus};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::ClientError;

/// A student's connection to one classroom server.
///
/// Joining stores the identity cookies in the underlying reqwest client, so
/// every later call rides on the same seat. Dropping the client drops the
/// seat's cookies but not the seat itself; the server keeps the student row.
#[derive(Debug, Clone)]
pub struct ClassroomClient {
    http: reqwest::Client,
    base_url: String,
}

/// One observation of a generation task, as reported by the server.
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    /// Parsed status, `None` when the provider sent a string we don't know.
    pub status: Option<TaskStatus>,
    /// The provider's status string as received.
    pub raw_status: String,
    /// Present once the task has succeeded.
    pub video_url: Option<String>,
    /// Present when the task failed and the provider said why.
    pub message: Option<String>,
}

impl ClassroomClient {
    /// Build a client for the server at `base_url` (no trailing slash).
    pub fn connect(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Join a classroom by its 8-digit code, claiming `name` as the nickname.
    pub async fn join(&self, classroom_code: &str, name: &str) -> Result<(), ClientError> {
        let body = json!({ "classroom_code": classroom_code, "name": name });
        self.post("/api/student/login", &body).await?;
        debug!(classroom_code, name, "Joined classroom");
        Ok(())
    }

    /// Submit a text-to-video generation. Returns the provider task id.
    pub async fn submit_text(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, ClientError> {
        let mut body = json!({ "prompt": prompt });
        if let Some(model) = model {
            body["model"] = Value::String(model.to_string());
        }
        self.submit(GenerationKind::Text2Video, body).await
    }

    /// Submit an image-to-video generation from a base64-encoded image.
    pub async fn submit_image(
        &self,
        image_b64: &str,
        prompt: Option<&str>,
    ) -> Result<String, ClientError> {
        let mut body = json!({ "image": image_b64 });
        if let Some(prompt) = prompt {
            body["prompt"] = Value::String(prompt.to_string());
        }
        self.submit(GenerationKind::Image2Video, body).await
    }

    async fn submit(&self, kind: GenerationKind, body: Value) -> Result<String, ClientError> {
        let data = self.post(&format!("/api/{}", kind.path()), &body).await?;
        let task_id = data["data"]["task_id"]
            .as_str()
            .ok_or_else(|| ClientError::UnexpectedResponse("Missing task id".into()))?;
        debug!(%kind, task_id, "Generation accepted");
        Ok(task_id.to_string())
    }

    /// Fetch the current status of a task.
    pub async fn task_status(
        &self,
        kind: GenerationKind,
        task_id: &str,
    ) -> Result<TaskSnapshot, ClientError> {
        let res = self
            .http
            .get(format!("{}/api/{}/{}", self.base_url, kind.path(), task_id))
            .send()
            .await?;
        // Status routes answer 403 once the seat is gone (removed student or
        // ended session), so on this route a 403 means the same as a 401.
        let body = match Self::read_body(res).await {
            Err(ClientError::Api { status: 403, .. }) => return Err(ClientError::SessionExpired),
            other => other?,
        };
        let data = &body["data"];

        let raw_status = data["task_status"].as_str().unwrap_or("").to_string();
        Ok(TaskSnapshot {
            status: TaskStatus::parse(&raw_status),
            raw_status,
            video_url: data["task_result"]["videos"][0]["url"]
                .as_str()
                .map(str::to_string),
            message: data["task_status_msg"].as_str().map(str::to_string),
        })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        let res = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::read_body(res).await
    }

    async fn read_body(res: reqwest::Response) -> Result<Value, ClientError> {
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::SessionExpired);
        }
        let body: Value = res.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let message = body["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}
