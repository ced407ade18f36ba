pub mod generation;
pub mod poll;
pub mod student_status;
pub mod submission_status;
pub mod task_status;

pub use generation::GenerationKind;
pub use poll::PollPolicy;
pub use student_status::StudentStatus;
pub use submission_status::SubmissionStatus;
pub use task_status::TaskStatus;
