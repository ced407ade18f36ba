use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two generation modes offered by the video provider.
///
/// The provider exposes a separate submission and status endpoint per kind,
/// so the kind travels with the task handle through the whole polling flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Text2Video,
    Image2Video,
}

impl GenerationKind {
    /// URL path segment used by both the provider API and our own routes.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Text2Video => "text2video",
            Self::Image2Video => "image2video",
        }
    }

    /// Fallback prompt label recorded when a student submits an empty prompt.
    pub fn default_prompt(&self) -> &'static str {
        match self {
            Self::Text2Video => "Text to Video",
            Self::Image2Video => "Image to Video",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Error when parsing an unknown generation kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown generation kind '{invalid}'. Valid values: text2video, image2video")]
pub struct ParseKindError {
    invalid: String,
}

impl FromStr for GenerationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text2video" => Ok(Self::Text2Video),
            "image2video" => Ok(Self::Image2Video),
            _ => Err(ParseKindError {
                invalid: s.to_string(),
            }),
        }
    }
}
