#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a defect record.
///
/// The lifecycle is deliberately two-state with a single legal transition:
/// `OnProgress -> Finish`. There is no reopen.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in
/// SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum DefectStatus {
    /// Repair work has not been completed yet. Initial state.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "OnProgress"))]
    OnProgress,
    /// Repair is done and evidenced by an after-photo. Terminal state.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Finish"))]
    Finish,
}

impl DefectStatus {
    /// Returns true if this status ends the lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish)
    }

    /// Returns true if `next` is a legal move from this status.
    ///
    /// Self-transitions are legal: two racing finish requests both land in
    /// the same terminal state, so `Finish -> Finish` is an idempotent no-op
    /// rather than an error.
    pub fn can_transition_to(&self, next: DefectStatus) -> bool {
        match (self, next) {
            (Self::OnProgress, _) => true,
            (Self::Finish, Self::Finish) => true,
            (Self::Finish, Self::OnProgress) => false,
        }
    }

    /// All possible status values.
    pub const ALL: &'static [DefectStatus] = &[Self::OnProgress, Self::Finish];

    /// Returns the string representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnProgress => "OnProgress",
            Self::Finish => "Finish",
        }
    }
}

impl fmt::Display for DefectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for DefectStatus {
    fn default() -> Self {
        Self::OnProgress
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{invalid}'. Valid values: OnProgress, Finish")]
pub struct ParseStatusError {
    invalid: String,
}

impl FromStr for DefectStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OnProgress" => Ok(Self::OnProgress),
            "Finish" => Ok(Self::Finish),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
