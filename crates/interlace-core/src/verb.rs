//! Operation descriptors.
//!
//! Each resource verb carries a fixed HTTP method, status code, and hook
//! stage sequence. Descriptors are static data: route-binding glue
//! consumes them to pick the externally visible method/status and to
//! drive the correct stage sequence through the pipeline.

use crate::Stage;
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// A resource operation verb.
///
/// The six verbs form the states of the operation state machine. Note the
/// designed asymmetries: Delete runs `pre_save` but never `post_save`
/// (deletion is terminal), and Archive reuses Delete's external
/// DELETE/204 contract while mutating rather than removing.
///
/// # Example
///
/// ```
/// use interlace_core::{Stage, Verb};
///
/// assert_eq!(Verb::Create.http_method(), http::Method::POST);
/// assert_eq!(Verb::Archive.status_code(), http::StatusCode::NO_CONTENT);
/// assert_eq!(Verb::Delete.stage_sequence(), &[Stage::PreSave]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// Fetch and serialize one resource or a collection. GET/200.
    Read,
    /// Deserialize, persist, and serialize a new resource. POST/201.
    Create,
    /// Full update of an existing resource. PUT/202.
    Update,
    /// Partial update of an existing resource. PATCH/202.
    PartialUpdate,
    /// Remove an existing resource. DELETE/204, no response body.
    Delete,
    /// Mark an existing resource archived. DELETE/204, no response body.
    Archive,
}

/// Hook stages run by write-shaped verbs (Create, Update, PartialUpdate).
const WRITE_STAGES: &[Stage] = &[
    Stage::PreLoad,
    Stage::PostLoad,
    Stage::PreSave,
    Stage::PostSave,
    Stage::PreDump,
    Stage::PostDump,
];

/// Hook stages run by Read.
const READ_STAGES: &[Stage] = &[
    Stage::PreFetch,
    Stage::PostFetch,
    Stage::PreDump,
    Stage::PostDump,
];

/// Hook stages run by Delete and Archive. `post_save` is intentionally
/// absent: deletion is a terminal action and archival follows the same
/// external contract.
const TERMINAL_STAGES: &[Stage] = &[Stage::PreSave];

impl Verb {
    /// Returns the HTTP method this verb is bound to.
    #[must_use]
    pub fn http_method(self) -> Method {
        match self {
            Self::Read => Method::GET,
            Self::Create => Method::POST,
            Self::Update => Method::PUT,
            Self::PartialUpdate => Method::PATCH,
            Self::Delete | Self::Archive => Method::DELETE,
        }
    }

    /// Returns the HTTP status code a successful operation responds with.
    #[must_use]
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::Read => StatusCode::OK,
            Self::Create => StatusCode::CREATED,
            Self::Update | Self::PartialUpdate => StatusCode::ACCEPTED,
            Self::Delete | Self::Archive => StatusCode::NO_CONTENT,
        }
    }

    /// Returns the ordered hook stages this verb runs.
    ///
    /// The external collaborator calls (fetch, load, save, dump) are
    /// interleaved between these stages by the operation drivers.
    #[must_use]
    pub const fn stage_sequence(self) -> &'static [Stage] {
        match self {
            Self::Read => READ_STAGES,
            Self::Create | Self::Update | Self::PartialUpdate => WRITE_STAGES,
            Self::Delete | Self::Archive => TERMINAL_STAGES,
        }
    }

    /// Returns the verb's full descriptor.
    #[must_use]
    pub fn descriptor(self) -> OperationDescriptor {
        OperationDescriptor {
            verb: self,
            method: self.http_method(),
            status: self.status_code(),
            stages: self.stage_sequence(),
        }
    }

    /// Returns all verbs.
    #[must_use]
    pub const fn all() -> [Verb; 6] {
        [
            Self::Read,
            Self::Create,
            Self::Update,
            Self::PartialUpdate,
            Self::Delete,
            Self::Archive,
        ]
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::Delete => "delete",
            Self::Archive => "archive",
        };
        f.write_str(name)
    }
}

/// Static description of one operation, consumed by route-binding glue.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// The verb.
    pub verb: Verb,
    /// Externally visible HTTP method.
    pub method: Method,
    /// Externally visible HTTP status code on success.
    pub status: StatusCode,
    /// Ordered hook stages the verb executes.
    pub stages: &'static [Stage],
}
