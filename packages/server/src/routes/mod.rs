use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/teacher/login", post(handlers::auth::teacher_login))
        .route("/student/login", post(handlers::auth::student_login))
        .route("/session", get(handlers::auth::session_info))
        .route("/session/end", post(handlers::auth::end_session))
        .route("/teacher/activity", get(handlers::auth::activity))
        .route("/text2video", post(handlers::generate::text_to_video))
        .route("/image2video", post(handlers::generate::image_to_video))
        // Status polling for both kinds; static routes above take priority.
        .route("/{kind}/{task_id}", get(handlers::generate::task_status))
}
