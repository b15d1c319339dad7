//! Error types for Interlace.
//!
//! [`InterlaceError`] is the standard error type used throughout the
//! pipeline. The pipeline itself performs no recovery and no wrapping: a
//! hook or collaborator error halts the current stage sequence and
//! propagates to the caller exactly as produced.

use crate::Stage;
use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`InterlaceError`].
pub type InterlaceResult<T> = Result<T, InterlaceError>;

/// Standard error type for the Interlace pipeline.
///
/// # Example
///
/// ```
/// use interlace_core::{InterlaceError, Stage};
///
/// let err = InterlaceError::hook(Stage::PostFetch, "raise_if_not_first", "not the first user");
/// assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
/// ```
#[derive(Error, Debug)]
pub enum InterlaceError {
    /// A hook failed during a stage.
    ///
    /// Built by hook implementations themselves; the pipeline never wraps
    /// errors on their way out.
    #[error("Hook '{hook}' failed during {stage}: {message}")]
    Hook {
        /// The stage the hook was running in.
        stage: Stage,
        /// The declared hook name.
        hook: String,
        /// Human-readable failure message.
        message: String,
    },

    /// A hook was tagged with a stage name outside the fixed enumeration.
    ///
    /// Surfaced at registration/resolution time, not at run time.
    #[error("Unknown stage '{name}'")]
    UnknownStage {
        /// The offending stage name.
        name: String,
    },

    /// An external collaborator (fetch/load/save/dump) failed.
    ///
    /// Propagated exactly like a hook failure since both occur inside a
    /// stage from the pipeline's viewpoint.
    #[error("Collaborator '{operation}' failed: {source}")]
    Collaborator {
        /// The collaborator operation that failed.
        operation: &'static str,
        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },

    /// A single-object fetch yielded no result.
    ///
    /// Built by the operation drivers when `fetch_one` returns `None`;
    /// the pipeline itself treats absence as a normal outcome.
    #[error("{resource} with ID '{id}' not found")]
    NotFound {
        /// The resource type that was requested.
        resource: String,
        /// The identifier that had no match.
        id: String,
    },
}

impl InterlaceError {
    /// Creates a hook failure error.
    #[must_use]
    pub fn hook(stage: Stage, hook: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hook {
            stage,
            hook: hook.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown-stage error.
    #[must_use]
    pub fn unknown_stage(name: impl Into<String>) -> Self {
        Self::UnknownStage { name: name.into() }
    }

    /// Creates a collaborator failure error.
    pub fn collaborator(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Collaborator {
            operation,
            source: source.into(),
        }
    }

    /// Creates a not-found error for a resource and identifier.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Returns the HTTP status code this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Collaborator { .. } => StatusCode::BAD_GATEWAY,
            Self::Hook { .. } | Self::UnknownStage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_error_carries_stage_and_name() {
        let err = InterlaceError::hook(Stage::PreSave, "archive_model", "missing column");
        assert!(err.to_string().contains("pre_save"));
        assert!(err.to_string().contains("archive_model"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_stage_error() {
        let err = InterlaceError::unknown_stage("pre_flight");
        assert_eq!(err.to_string(), "Unknown stage 'pre_flight'");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_collaborator_error_keeps_source() {
        let err = InterlaceError::collaborator("save", anyhow::anyhow!("connection reset"));
        assert!(err.to_string().contains("save"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_found_error() {
        let err = InterlaceError::not_found("User", "42");
        assert_eq!(err.to_string(), "User with ID '42' not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
