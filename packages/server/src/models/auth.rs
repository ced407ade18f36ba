use chrono::{DateTime, Utc};
use common::{StudentStatus, SubmissionStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{classroom_session, student, teacher, video_submission};
use crate::error::AppError;
use crate::utils::classroom_code;

/// Request body for teacher login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct TeacherLoginRequest {
    /// Username known to the external credential service.
    #[schema(example = "ms_frizzle")]
    pub username: String,
    /// Password checked by the external credential service.
    pub password: String,
}

pub fn validate_teacher_login(payload: &TeacherLoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Request body for a student joining a classroom.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct StudentLoginRequest {
    /// 8-digit classroom code shown on the teacher dashboard.
    #[schema(example = "12345678")]
    pub classroom_code: String,
    /// Nickname, unique within the session.
    #[schema(example = "Alice")]
    pub name: String,
}

/// Shape checks that run before any store lookup.
pub fn validate_student_login(payload: &StudentLoginRequest) -> Result<(), AppError> {
    if !classroom_code::is_well_formed(&payload.classroom_code) {
        return Err(AppError::Validation(
            "Classroom code must be 8 digits".into(),
        ));
    }
    let name = payload.name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation(
            "Nickname must be 1-64 characters".into(),
        ));
    }
    Ok(())
}

/// A classroom session as exposed to clients.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionDto {
    pub id: Uuid,
    #[schema(example = "12345678")]
    pub classroom_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<classroom_session::Model> for SessionDto {
    fn from(session: classroom_session::Model) -> Self {
        Self {
            id: session.id,
            classroom_code: session.classroom_code,
            is_active: session.is_active,
            created_at: session.created_at,
            ended_at: session.ended_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeacherDto {
    pub id: Uuid,
    pub username: String,
}

impl From<teacher::Model> for TeacherDto {
    fn from(teacher: teacher::Model) -> Self {
        Self {
            id: teacher.id,
            username: teacher.username,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentDto {
    pub id: Uuid,
    pub username: String,
    pub status: StudentStatus,
}

impl From<student::Model> for StudentDto {
    fn from(student: student::Model) -> Self {
        Self {
            id: student.id,
            username: student.username,
            status: student.status,
        }
    }
}

/// Successful teacher login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TeacherLoginResponse {
    pub success: bool,
    pub session: SessionDto,
    pub teacher: TeacherDto,
}

/// Successful student login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentLoginResponse {
    pub success: bool,
    pub session: SessionDto,
    pub student: StudentDto,
}

/// The caller's identity, tagged by role.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum CallerDto {
    Teacher { id: Uuid, username: String },
    Student { id: Uuid, username: String },
}

/// Response of `GET /api/session`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionInfoResponse {
    pub user: CallerDto,
    pub session: SessionDto,
}

/// One submission in the teacher's activity feed, joined with its student.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionFeedItem {
    pub id: Uuid,
    pub task_id: String,
    pub prompt: String,
    pub status: SubmissionStatus,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub student: Option<StudentDto>,
}

impl SubmissionFeedItem {
    pub fn from_joined(
        submission: video_submission::Model,
        student: Option<student::Model>,
    ) -> Self {
        Self {
            id: submission.id,
            task_id: submission.task_id,
            prompt: submission.prompt,
            status: submission.status,
            video_url: submission.video_url,
            created_at: submission.created_at,
            student: student.map(StudentDto::from),
        }
    }
}

/// Response of `GET /api/teacher/activity`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ActivityResponse {
    /// All submissions of the session, most recent first.
    pub submissions: Vec<SubmissionFeedItem>,
    /// Currently active students.
    pub students: Vec<StudentDto>,
}
