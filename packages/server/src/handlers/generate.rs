use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use common::{GenerationKind, SubmissionStatus, TaskStatus};
use sea_orm::*;
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::entity::video_submission;
use crate::error::AppError;
use crate::extractors::auth::Caller;
use crate::extractors::json::AppJson;
use crate::models::generate::{
    ImageToVideoRequest, TextToVideoRequest, validate_image_request, validate_text_request,
};
use crate::state::AppState;

/// Prompt text recorded with a submission, falling back to a generic label.
fn resolve_prompt(prompt: Option<&str>, kind: GenerationKind) -> String {
    match prompt.map(str::trim) {
        Some(p) if !p.is_empty() => p.to_owned(),
        _ => kind.default_prompt().to_owned(),
    }
}

/// Persist a `Pending` submission for a provider-accepted task.
async fn record_submission(
    db: &DatabaseConnection,
    session_id: Uuid,
    student_id: Uuid,
    task_id: &str,
    prompt: String,
) -> Result<(), AppError> {
    video_submission::ActiveModel {
        id: Set(Uuid::new_v4()),
        session_id: Set(session_id),
        student_id: Set(student_id),
        task_id: Set(task_id.to_owned()),
        prompt: Set(prompt),
        status: Set(SubmissionStatus::Pending),
        video_url: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    info!(task_id, "Submission recorded as pending");
    Ok(())
}

/// Relay a generation payload and record the resulting task.
async fn relay(
    state: &AppState,
    caller: &Caller,
    kind: GenerationKind,
    payload: Value,
    prompt: String,
) -> Result<Response, AppError> {
    let (session, student) = caller.require_active_student()?;

    if !state.provider.is_configured() {
        return Err(AppError::ProviderNotConfigured);
    }

    let response = state.provider.submit(kind, &payload).await?;

    if !response.is_success() {
        // Relay the provider's verdict untouched; nothing is persisted.
        return Err(AppError::Provider {
            status: response.status,
            body: response.body,
        });
    }

    if let Some(task_id) = response.task_id() {
        record_submission(&state.db, session.id, student.id, task_id, prompt).await?;
    }

    Ok(Json(response.body).into_response())
}

/// `POST /api/text2video`
#[instrument(skip_all)]
pub async fn text_to_video(
    State(state): State<AppState>,
    caller: Caller,
    AppJson(payload): AppJson<TextToVideoRequest>,
) -> Result<Response, AppError> {
    validate_text_request(&payload)?;

    let prompt = resolve_prompt(payload.prompt.as_deref(), GenerationKind::Text2Video);
    let body = serde_json::to_value(&payload)
        .map_err(|e| AppError::Internal(format!("Payload serialization failed: {e}")))?;

    relay(&state, &caller, GenerationKind::Text2Video, body, prompt).await
}

/// `POST /api/image2video`
#[instrument(skip_all)]
pub async fn image_to_video(
    State(state): State<AppState>,
    caller: Caller,
    AppJson(payload): AppJson<ImageToVideoRequest>,
) -> Result<Response, AppError> {
    validate_image_request(&payload)?;

    let prompt = resolve_prompt(payload.prompt.as_deref(), GenerationKind::Image2Video);
    let body = serde_json::to_value(&payload)
        .map_err(|e| AppError::Internal(format!("Payload serialization failed: {e}")))?;

    relay(&state, &caller, GenerationKind::Image2Video, body, prompt).await
}

/// `GET /api/{kind}/{task_id}` — poll the provider and mirror the result
/// into the stored submission.
#[instrument(skip(state, caller))]
pub async fn task_status(
    State(state): State<AppState>,
    caller: Caller,
    Path((kind, task_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    if !caller.is_authenticated() {
        return Err(AppError::PermissionDenied);
    }

    let kind: GenerationKind = kind
        .parse()
        .map_err(|_| AppError::NotFound("Unknown generation kind".into()))?;

    let response = state.provider.task_status(kind, &task_id).await?;

    // Reconciliation is best-effort: the caller already holds the live
    // provider status, so store failures are logged and swallowed.
    if response.is_success() {
        if let Err(e) = reconcile_submission(&state.db, &task_id, &response.body).await {
            warn!(task_id, error = %e, "Submission reconciliation failed");
        }
    }

    Ok(Json(response.body).into_response())
}

/// Mirror a terminal provider status into the stored submission.
///
/// Unknown task ids (stale or foreign) and non-terminal statuses leave the
/// store untouched. Terminal records are never rewritten.
async fn reconcile_submission(
    db: &DatabaseConnection,
    task_id: &str,
    body: &Value,
) -> Result<(), DbErr> {
    let status = body["data"]["task_status"]
        .as_str()
        .and_then(TaskStatus::parse);

    let new_status = match status {
        Some(TaskStatus::Succeed) => SubmissionStatus::Success,
        Some(TaskStatus::Failed) => SubmissionStatus::Error,
        _ => return Ok(()),
    };

    let video_url = body["data"]["task_result"]["videos"][0]["url"]
        .as_str()
        .map(str::to_owned);

    if new_status == SubmissionStatus::Success && video_url.is_none() {
        // A success without a URL would break the invariant that SUCCESS
        // always carries one; leave the row pending until the URL shows up.
        warn!(task_id, "Provider reported success without a video URL");
        return Ok(());
    }

    let Some(submission) = video_submission::Entity::find()
        .filter(video_submission::Column::TaskId.eq(task_id))
        .one(db)
        .await?
    else {
        warn!(task_id, "No stored submission for task; skipping update");
        return Ok(());
    };

    if submission.status.is_terminal() {
        return Ok(());
    }

    let mut active: video_submission::ActiveModel = submission.into();
    active.status = Set(new_status);
    active.video_url = Set(video_url);
    active.update(db).await?;

    info!(task_id, status = %new_status, "Submission reconciled");
    Ok(())
}
