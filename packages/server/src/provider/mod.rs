pub mod token;

use common::GenerationKind;
use serde_json::Value;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::AppError;

/// Client for the external video-generation API.
///
/// Every call signs its own short-lived token; nothing is cached between
/// requests beyond reqwest's connection pool.
#[derive(Clone)]
pub struct VideoProvider {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<ProviderCredentials>,
}

#[derive(Clone)]
struct ProviderCredentials {
    access_key: String,
    secret_key: String,
}

/// Raw provider response: status code plus undecoded JSON body.
///
/// Handlers relay the body to callers unchanged, so it stays a `Value`.
#[derive(Debug)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Task handle assigned by the provider on acceptance.
    pub fn task_id(&self) -> Option<&str> {
        self.body["data"]["task_id"].as_str()
    }
}

impl VideoProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => Some(ProviderCredentials {
                access_key: access_key.clone(),
                secret_key: secret_key.clone(),
            }),
            _ => None,
        };

        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn fresh_token(&self) -> Result<String, AppError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(AppError::ProviderNotConfigured)?;
        token::sign(&creds.access_key, &creds.secret_key)
            .map_err(|e| AppError::Internal(format!("Provider token signing failed: {e}")))
    }

    /// Forward a generation payload to the provider's submission endpoint.
    pub async fn submit(
        &self,
        kind: GenerationKind,
        payload: &Value,
    ) -> Result<ProviderResponse, AppError> {
        let token = self.fresh_token()?;
        let url = format!("{}/v1/videos/{}", self.base_url, kind.path());
        debug!(%kind, "Submitting generation request to provider");

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        Self::read(response).await
    }

    /// Query the status of a previously accepted task.
    pub async fn task_status(
        &self,
        kind: GenerationKind,
        task_id: &str,
    ) -> Result<ProviderResponse, AppError> {
        let token = self.fresh_token()?;
        let url = format!("{}/v1/videos/{}/{}", self.base_url, kind.path(), task_id);

        let response = self.http.get(url).bearer_auth(token).send().await?;

        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<ProviderResponse, AppError> {
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(ProviderResponse { status, body })
    }
}
