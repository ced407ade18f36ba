pub mod classroom_session;
pub mod student;
pub mod teacher;
pub mod video_submission;
