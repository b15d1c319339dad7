//! Lifecycle stages.
//!
//! A [`Stage`] is a named point in an operation's lifecycle at which hooks
//! may run. The set of stages is fixed: hooks tagged with anything outside
//! this enumeration are rejected at resolution time with
//! [`InterlaceError::UnknownStage`](crate::InterlaceError::UnknownStage).

use crate::{InterlaceError, InterlaceResult};
use serde::{Deserialize, Serialize};

/// A lifecycle stage surrounding one of the external collaborator calls.
///
/// Stages come in pre/post pairs around the four collaborator operations:
/// fetch (query execution), load (input deserialization), save
/// (persistence), and dump (output serialization).
///
/// # Example
///
/// ```
/// use interlace_core::Stage;
///
/// assert_eq!(Stage::PreFetch.name(), "pre_fetch");
/// assert_eq!("post_save".parse::<Stage>().unwrap(), Stage::PostSave);
/// assert!("mid_save".parse::<Stage>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Runs before the query is executed; may replace the query outright.
    PreFetch,
    /// Runs after the fetched value is available.
    PostFetch,
    /// Runs before raw input is deserialized.
    PreLoad,
    /// Runs after deserialization produced a validated value.
    PostLoad,
    /// Runs before the value is persisted.
    PreSave,
    /// Runs after persistence. Never invoked for Delete operations.
    PostSave,
    /// Runs before the value is serialized for the response.
    PreDump,
    /// Runs after serialization produced the response payload.
    PostDump,
}

impl Stage {
    /// Returns the stage's snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PreFetch => "pre_fetch",
            Self::PostFetch => "post_fetch",
            Self::PreLoad => "pre_load",
            Self::PostLoad => "post_load",
            Self::PreSave => "pre_save",
            Self::PostSave => "post_save",
            Self::PreDump => "pre_dump",
            Self::PostDump => "post_dump",
        }
    }

    /// Parses a stage from its snake_case name.
    ///
    /// # Errors
    ///
    /// Returns [`InterlaceError::UnknownStage`] for any name outside the
    /// fixed enumeration. Registration surfaces route through this so that
    /// misconfiguration is caught at resolution time, not at run time.
    pub fn from_name(name: &str) -> InterlaceResult<Self> {
        Self::all()
            .into_iter()
            .find(|stage| stage.name() == name)
            .ok_or_else(|| InterlaceError::unknown_stage(name))
    }

    /// Returns all stages in lifecycle order.
    #[must_use]
    pub const fn all() -> [Stage; 8] {
        [
            Self::PreFetch,
            Self::PostFetch,
            Self::PreLoad,
            Self::PostLoad,
            Self::PreSave,
            Self::PostSave,
            Self::PreDump,
            Self::PostDump,
        ]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Stage {
    type Err = InterlaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
