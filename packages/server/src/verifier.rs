use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::AppError;

/// Client for the external service that validates teacher credentials.
#[derive(Clone)]
pub struct CredentialVerifier {
    http: reqwest::Client,
    base_url: String,
}

/// Identity returned by the verification service on success.
#[derive(Debug, Deserialize)]
pub struct VerifiedUser {
    pub username: String,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    user: Option<VerifiedUser>,
}

impl CredentialVerifier {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Check a username/password pair. `Ok(None)` means the credentials were
    /// rejected; transport failures surface as internal errors.
    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<VerifiedUser>, AppError> {
        let response = self
            .http
            .post(format!("{}/verify", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "Verifier rejected credentials");
            return Ok(None);
        }

        let body: VerifyResponse = response.json().await?;
        if body.success {
            Ok(body.user)
        } else {
            Ok(None)
        }
    }
}
