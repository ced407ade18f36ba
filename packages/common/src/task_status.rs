use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status as reported by the video provider.
///
/// The provider's status field is a free-form string; anything it sends that
/// is not one of the known values is treated as "still in flight" by callers,
/// which is why parsing returns an `Option` rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Submitted,
    Processing,
    Succeed,
    Failed,
}

impl TaskStatus {
    /// Parse a provider status string. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(Self::Submitted),
            "processing" => Some(Self::Processing),
            "succeed" => Some(Self::Succeed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns true for states after which polling must stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Processing => "processing",
            Self::Succeed => "succeed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
