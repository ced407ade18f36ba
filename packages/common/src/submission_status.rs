#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a recorded video submission.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// Accepted by the provider, video not ready yet.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PENDING"))]
    Pending,
    /// Generation finished; a video URL is available.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "SUCCESS"))]
    Success,
    /// The provider reported the task as failed.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ERROR"))]
    Error,
}

impl SubmissionStatus {
    /// Returns true once the submission will no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// All possible status values.
    pub const ALL: &'static [SubmissionStatus] = &[Self::Pending, Self::Success, Self::Error];

    /// Returns the string representation (SCREAMING_SNAKE_CASE).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid submission status '{invalid}'. Valid values: PENDING, SUCCESS, ERROR")]
pub struct ParseStatusError {
    invalid: String,
}

impl FromStr for SubmissionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SUCCESS" => Ok(Self::Success),
            "ERROR" => Ok(Self::Error),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
