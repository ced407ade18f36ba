use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

/// Claims of the short-lived provider access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderClaims {
    /// Access key identity.
    pub iss: String,
    /// Expiration timestamp (now + 30 min).
    pub exp: usize,
    /// Not-valid-before (now − 5 s, tolerating clock skew).
    pub nbf: usize,
}

/// Lifetime of a signed provider token.
const TOKEN_TTL_SECS: i64 = 30 * 60;

/// Clock-skew allowance on the not-before claim.
const NBF_LEEWAY_SECS: i64 = 5;

/// Sign a fresh HS256 token authorizing one batch of provider calls.
///
/// Pure function of the current time and the configured key pair; every
/// outbound provider request signs its own token.
pub fn sign(access_key: &str, secret_key: &str) -> Result<String> {
    let now = Utc::now().timestamp();

    let claims = ProviderClaims {
        iss: access_key.to_owned(),
        exp: (now + TOKEN_TTL_SECS) as usize,
        nbf: (now - NBF_LEEWAY_SECS) as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret_key.as_bytes()),
    )?;

    Ok(token)
}
