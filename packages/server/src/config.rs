use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Credentials and endpoint of the external video-generation provider.
///
/// The key pair is optional so the server can start without it; generation
/// routes answer `PROVIDER_NOT_CONFIGURED` until both keys are present.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

/// Endpoint of the external service that verifies teacher credentials.
#[derive(Debug, Deserialize, Clone)]
pub struct VerifierConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    /// Lifetime of the identity cookies, in hours.
    pub max_age_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub verifier: VerifierConfig,
    pub cookie: CookieConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3001)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("provider.base_url", "https://api-beijing.klingai.com")?
            .set_default("verifier.base_url", "http://localhost:3000")?
            .set_default("cookie.max_age_hours", 6)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., REELROOM__PROVIDER__ACCESS_KEY)
            .add_source(Environment::with_prefix("REELROOM").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
