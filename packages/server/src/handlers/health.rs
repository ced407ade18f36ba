use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

/// Liveness probe; also reports whether provider credentials are present.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let db = match state.db.ping().await {
        Ok(()) => "connected",
        Err(_) => "unreachable",
    };

    Json(json!({
        "status": "ok",
        "has_provider_credentials": state.provider.is_configured(),
        "db": db,
    }))
}
