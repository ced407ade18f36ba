use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::provider::VideoProvider;
use server::state::AppState;
use server::verifier::CredentialVerifier;
use server::{build_router, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;

    let state = AppState {
        provider: VideoProvider::new(&config.provider),
        verifier: CredentialVerifier::new(&config.verifier.base_url),
        db,
        config: config.clone(),
    };

    if !state.provider.is_configured() {
        tracing::warn!("Provider API keys are not set; generation routes will return errors");
    }

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
