//! Student-side client for a Reelroom classroom server.
//!
//! Wraps the HTTP API behind [`ClassroomClient`] (join a classroom, submit a
//! generation, fetch one task status) and layers [`poll::poll_until_terminal`]
//! on top for the wait-for-my-video loop. Identity lives in the reqwest cookie
//! store, so one client value is one student seat.

pub mod api;
pub mod error;
pub mod poll;

pub use api::{ClassroomClient, TaskSnapshot};
pub use error::ClientError;
pub use poll::{PollOutcome, Sleeper, TokioSleeper, poll_until_terminal};
