use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::provider::VideoProvider;
use crate::verifier::CredentialVerifier;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub provider: VideoProvider,
    pub verifier: CredentialVerifier,
}
