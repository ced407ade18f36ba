use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
///
/// The one exception is [`AppError::Provider`], which relays the provider's
/// own status code and body verbatim instead of wrapping them.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `NOT_AUTHENTICATED`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`,
    /// `STUDENT_REMOVED`, `NOT_FOUND`, `NICKNAME_TAKEN`,
    /// `PROVIDER_NOT_CONFIGURED`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Classroom code must be 8 digits")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotAuthenticated,
    InvalidCredentials,
    PermissionDenied,
    /// The student was removed from the session and may not rejoin.
    StudentRemoved,
    NotFound(String),
    NicknameTaken,
    /// The provider key pair is missing from the configuration.
    ProviderNotConfigured,
    /// Non-success response from the video provider, relayed as-is.
    Provider {
        status: u16,
        body: serde_json::Value,
    },
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "NOT_AUTHENTICATED",
                    message: "Not authenticated".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid credentials".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                },
            ),
            AppError::StudentRemoved => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "STUDENT_REMOVED",
                    message: "You have been removed from this session".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::NicknameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "NICKNAME_TAKEN",
                    message: "Nickname already taken".into(),
                },
            ),
            AppError::ProviderNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    code: "PROVIDER_NOT_CONFIGURED",
                    message: "Provider API keys are not configured".into(),
                },
            ),
            // Relayed verbatim by `into_response`; this arm only fires if the
            // variant is rendered through some other path.
            AppError::Provider { status, .. } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorBody {
                    code: "PROVIDER_ERROR",
                    message: "The video provider rejected the request".into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Provider { status, body } = self {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            return (status, Json(body)).into_response();
        }

        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Internal(format!("Upstream request failed: {err}"))
    }
}
