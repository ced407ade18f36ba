use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use common::StudentStatus;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde_json::json;
use tracing::{info, instrument};

use crate::entity::{classroom_session, student, teacher, video_submission};
use crate::error::AppError;
use crate::extractors::auth::{Caller, Identity};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    ActivityResponse, CallerDto, SessionInfoResponse, StudentDto, StudentLoginRequest,
    StudentLoginResponse, SubmissionFeedItem, TeacherLoginRequest, TeacherLoginResponse,
    validate_student_login, validate_teacher_login,
};
use crate::state::AppState;
use crate::utils::{classroom_code, cookies};

/// Find a teacher by external username, creating the record on first login.
async fn find_or_create_teacher(
    db: &DatabaseConnection,
    username: &str,
) -> Result<teacher::Model, AppError> {
    if let Some(existing) = teacher::Entity::find()
        .filter(teacher::Column::Username.eq(username))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let new_teacher = teacher::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        username: Set(username.to_owned()),
        created_at: Set(Utc::now()),
    };

    match new_teacher.insert(db).await {
        Ok(created) => Ok(created),
        // Two first logins racing; the other insert won.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            teacher::Entity::find()
                .filter(teacher::Column::Username.eq(username))
                .one(db)
                .await?
                .ok_or_else(|| AppError::Internal("Teacher missing after insert conflict".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Insert an active session under `code`, or `None` if the code is taken.
///
/// The insert runs inside a savepoint so a unique-violation on the code
/// column does not poison the surrounding transaction; the caller can keep
/// trying with fresh codes.
pub async fn try_create_session(
    txn: &DatabaseTransaction,
    teacher_id: uuid::Uuid,
    code: String,
) -> Result<Option<classroom_session::Model>, AppError> {
    let savepoint = txn.begin().await?;

    let inserted = classroom_session::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        classroom_code: Set(code),
        teacher_id: Set(teacher_id),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ended_at: Set(None),
    }
    .insert(&savepoint)
    .await;

    match inserted {
        Ok(session) => {
            savepoint.commit().await?;
            Ok(Some(session))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            savepoint.rollback().await?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Open a session under a freshly generated code, retrying on collisions.
async fn create_session_with_fresh_code(
    txn: &DatabaseTransaction,
    teacher_id: uuid::Uuid,
) -> Result<classroom_session::Model, AppError> {
    for _ in 0..8 {
        if let Some(session) =
            try_create_session(txn, teacher_id, classroom_code::generate()).await?
        {
            return Ok(session);
        }
    }
    Err(AppError::Internal(
        "Could not allocate an unused classroom code".into(),
    ))
}

/// Handle teacher login: verify externally, then rotate the active session.
#[instrument(skip(state, jar, payload), fields(username = %payload.username))]
pub async fn teacher_login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<TeacherLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_teacher_login(&payload)?;

    let verified = state
        .verifier
        .verify(payload.username.trim(), &payload.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let teacher = find_or_create_teacher(&state.db, &verified.username).await?;

    // Deactivating the old session and creating the new one happens in one
    // transaction so the teacher never briefly owns two active sessions.
    let txn = state.db.begin().await?;

    classroom_session::Entity::update_many()
        .col_expr(classroom_session::Column::IsActive, Expr::value(false))
        .col_expr(classroom_session::Column::EndedAt, Expr::value(Utc::now()))
        .filter(classroom_session::Column::TeacherId.eq(teacher.id))
        .filter(classroom_session::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;

    let session = create_session_with_fresh_code(&txn, teacher.id).await?;

    txn.commit().await?;

    info!(classroom_code = %session.classroom_code, "Teacher session opened");

    let jar = cookies::grant_identity(
        jar,
        session.id,
        cookies::TEACHER_ROLE,
        None,
        state.config.cookie.max_age_hours,
    );

    Ok((
        jar,
        Json(TeacherLoginResponse {
            success: true,
            session: session.into(),
            teacher: teacher.into(),
        }),
    ))
}

/// Handle a student joining a classroom by code and nickname.
#[instrument(skip(state, jar, payload), fields(name = %payload.name))]
pub async fn student_login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<StudentLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_student_login(&payload)?;

    let name = payload.name.trim().to_owned();

    let session = classroom_session::Entity::find()
        .filter(classroom_session::Column::ClassroomCode.eq(&payload.classroom_code))
        .one(&state.db)
        .await?;

    let Some(session) = session.filter(|s| s.is_active) else {
        return Err(AppError::NotFound(
            "Invalid or inactive classroom code".into(),
        ));
    };

    let existing = student::Entity::find()
        .filter(student::Column::SessionId.eq(session.id))
        .filter(student::Column::Username.eq(&name))
        .one(&state.db)
        .await?;

    if let Some(existing) = existing {
        return Err(match existing.status {
            StudentStatus::Removed => AppError::StudentRemoved,
            StudentStatus::Active => AppError::NicknameTaken,
        });
    }

    let new_student = student::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        username: Set(name),
        session_id: Set(session.id),
        status: Set(StudentStatus::Active),
        created_at: Set(Utc::now()),
    };

    let student = new_student.insert(&state.db).await.map_err(|e| {
        match e.sql_err() {
            // Two students racing for the same nickname.
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::NicknameTaken,
            _ => AppError::from(e),
        }
    })?;

    let jar = cookies::grant_identity(
        jar,
        session.id,
        cookies::STUDENT_ROLE,
        Some(student.id),
        state.config.cookie.max_age_hours,
    );

    Ok((
        jar,
        Json(StudentLoginResponse {
            success: true,
            session: session.into(),
            student: student.into(),
        }),
    ))
}

/// Return the caller's identity and session, clearing stale cookies on 401.
pub async fn session_info(caller: Caller, jar: CookieJar) -> Response {
    let (Some(session), Some(identity)) = (caller.session, caller.identity) else {
        return (cookies::clear_identity(jar), AppError::NotAuthenticated).into_response();
    };

    let user = match identity {
        Identity::Teacher(t) => CallerDto::Teacher {
            id: t.id,
            username: t.username,
        },
        Identity::Student(s) => CallerDto::Student {
            id: s.id,
            username: s.username,
        },
    };

    Json(SessionInfoResponse {
        user,
        session: session.into(),
    })
    .into_response()
}

/// Deactivate the caller's session. Teachers only.
#[instrument(skip(state, caller, jar))]
pub async fn end_session(
    State(state): State<AppState>,
    caller: Caller,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (session, _) = caller.require_teacher()?;

    let mut active: classroom_session::ActiveModel = session.clone().into();
    active.is_active = Set(false);
    active.ended_at = Set(Some(Utc::now()));
    active.update(&state.db).await?;

    info!(session_id = %session.id, "Teacher session ended");

    Ok((
        cookies::clear_identity(jar),
        Json(json!({ "success": true })),
    ))
}

/// Live feed for the teacher dashboard: all submissions (newest first) joined
/// with their students, plus the active roster.
#[instrument(skip(state, caller))]
pub async fn activity(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ActivityResponse>, AppError> {
    let (session, _) = caller.require_teacher()?;

    let submissions = video_submission::Entity::find()
        .filter(video_submission::Column::SessionId.eq(session.id))
        .find_also_related(student::Entity)
        .order_by_desc(video_submission::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|(submission, student)| SubmissionFeedItem::from_joined(submission, student))
        .collect();

    let students = student::Entity::find()
        .filter(student::Column::SessionId.eq(session.id))
        .filter(student::Column::Status.eq(StudentStatus::Active))
        .order_by_asc(student::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(StudentDto::from)
        .collect();

    Ok(Json(ActivityResponse {
        submissions,
        students,
    }))
}
