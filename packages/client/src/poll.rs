use std::time::Duration;

use async_trait::async_trait;
use common::{GenerationKind, PollPolicy, TaskStatus};
use tracing::debug;

use crate::api::ClassroomClient;
use crate::error::ClientError;

/// Clock abstraction so the poll loop can be tested without real waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// The real thing.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How a watched task ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Succeeded { video_url: Option<String> },
    Failed { message: Option<String> },
    /// The policy's attempt budget ran out before the task settled.
    TimedOut,
}

/// Poll a task until it reaches a terminal state or the policy gives up.
///
/// Issues at most `policy.max_attempts` status requests, sleeping
/// `policy.interval` between consecutive ones. Unknown status strings count
/// as still-in-flight, matching how the server treats them.
pub async fn poll_until_terminal(
    client: &ClassroomClient,
    kind: GenerationKind,
    task_id: &str,
    policy: PollPolicy,
    sleeper: &dyn Sleeper,
) -> Result<PollOutcome, ClientError> {
    for attempt in 1..=policy.max_attempts {
        let snapshot = client.task_status(kind, task_id).await?;
        debug!(task_id, attempt, status = %snapshot.raw_status, "Polled task");

        match snapshot.status {
            Some(TaskStatus::Succeed) => {
                return Ok(PollOutcome::Succeeded {
                    video_url: snapshot.video_url,
                });
            }
            Some(TaskStatus::Failed) => {
                return Ok(PollOutcome::Failed {
                    message: snapshot.message,
                });
            }
            _ => {}
        }

        if attempt < policy.max_attempts {
            sleeper.sleep(policy.interval).await;
        }
    }

    Ok(PollOutcome::TimedOut)
}
