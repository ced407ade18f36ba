use std::time::Duration;

/// How often and how long a client polls a task before giving up.
///
/// The ceiling is attempt-count-bounded, not wall-clock-bounded: an in-flight
/// status request always completes before the counter is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between consecutive status requests.
    pub interval: Duration,
    /// Number of non-terminal responses tolerated before timing out.
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    /// 3 s between polls, 200 attempts: a ten-minute ceiling.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 200,
        }
    }
}
