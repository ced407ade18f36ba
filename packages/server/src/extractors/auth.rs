use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use common::StudentStatus;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entity::{classroom_session, student, teacher};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::cookies;

/// The resolved identity behind a request.
#[derive(Debug)]
pub enum Identity {
    Teacher(teacher::Model),
    Student(student::Model),
}

/// Caller identity resolved from the identity cookies, attached to every
/// request that asks for it.
///
/// Resolution never rejects: a missing cookie, a dead session, a role
/// mismatch, or a removed student all silently yield an unauthenticated
/// caller. Routes that need a specific role enforce it themselves via
/// [`Caller::require_teacher`] / [`Caller::require_active_student`].
#[derive(Debug)]
pub struct Caller {
    /// The active session the cookie points at, if any.
    pub session: Option<classroom_session::Model>,
    pub identity: Option<Identity>,
}

impl Caller {
    fn unauthenticated() -> Self {
        Self {
            session: None,
            identity: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The caller's session and teacher identity, or `PermissionDenied`.
    pub fn require_teacher(
        &self,
    ) -> Result<(&classroom_session::Model, &teacher::Model), AppError> {
        match (&self.session, &self.identity) {
            (Some(session), Some(Identity::Teacher(teacher))) => Ok((session, teacher)),
            _ => Err(AppError::PermissionDenied),
        }
    }

    /// The caller's session and student identity, or `PermissionDenied`.
    ///
    /// The extractor only ever attaches `Active` students, so no status
    /// re-check is needed here.
    pub fn require_active_student(
        &self,
    ) -> Result<(&classroom_session::Model, &student::Model), AppError> {
        match (&self.session, &self.identity) {
            (Some(session), Some(Identity::Student(student))) => Ok((session, student)),
            _ => Err(AppError::PermissionDenied),
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(session_id) = jar
            .get(cookies::SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok())
        else {
            return Ok(Caller::unauthenticated());
        };

        let session = classroom_session::Entity::find_by_id(session_id)
            .one(&state.db)
            .await?;

        let Some(session) = session.filter(|s| s.is_active) else {
            return Ok(Caller::unauthenticated());
        };

        let identity = match jar.get(cookies::ROLE_COOKIE).map(|c| c.value()) {
            Some(cookies::TEACHER_ROLE) => teacher::Entity::find_by_id(session.teacher_id)
                .one(&state.db)
                .await?
                .map(Identity::Teacher),
            Some(cookies::STUDENT_ROLE) => {
                let student_id = jar
                    .get(cookies::STUDENT_COOKIE)
                    .and_then(|c| Uuid::parse_str(c.value()).ok());

                match student_id {
                    Some(id) => student::Entity::find_by_id(id)
                        .filter(student::Column::SessionId.eq(session.id))
                        .filter(student::Column::Status.eq(StudentStatus::Active))
                        .one(&state.db)
                        .await?
                        .map(Identity::Student),
                    None => None,
                }
            }
            _ => None,
        };

        Ok(Caller {
            session: Some(session),
            identity,
        })
    }
}
