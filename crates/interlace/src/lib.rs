//! # Interlace
//!
//! **Declarative, ordered hook pipeline for resource operations**
//!
//! Interlace composes cross-cutting behavior around generic resource
//! operations (read, create, update, partial-update, delete, archive) in
//! a serialization-facing API layer:
//!
//! - 🪝 **Priority-ordered hooks** – Declared per stage, resolved once,
//!   deterministic ordering with declaration-order tie-breaks
//! - 🧵 **Stage interleaving** – One evolving value threads through each
//!   stage's hooks; empty stages are the identity
//! - 📦 **Per-invocation context** – Scratch state shared across the
//!   stages of one operation, isolated between invocations by construction
//! - 🔌 **Pluggable collaborators** – Query building, fetching,
//!   (de)serialization, and persistence live behind the [`Adapter`] seam
//!
//! ## Quick Start
//!
//! ```
//! use interlace::prelude::*;
//! use interlace::fixtures::MemoryAdapter;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let adapter = MemoryAdapter::new();
//! adapter.seed(json!({"id": 1, "first_name": "Alice"}));
//!
//! let users = Endpoint::builder(adapter)
//!     .resource("User")
//!     .on(Stage::PreLoad, "set_first_name", |_, mut value, _, _| {
//!         value["first_name"] = json!("George");
//!         Ok(value)
//!     })
//!     .build()?;
//!
//! let created = users.create(json!({"last_name": "Micheal"}), &RequestArgs::new()).await?;
//! assert_eq!(created["data"]["first_name"], json!("George"));
//! # Ok::<_, InterlaceError>(())
//! # }).unwrap();
//! ```
//!
//! ## Architecture
//!
//! Each verb runs a fixed stage sequence through the pipeline, with the
//! external collaborator calls interleaved between hook stages:
//!
//! ```text
//! Read:   pre_fetch → fetch → post_fetch → pre_dump → dump → post_dump
//! Create: pre_load → load → post_load → pre_save → save → post_save
//!         → pre_dump → dump → post_dump
//! Delete: pre_save → delete            (post_save is never invoked)
//! Archive: pre_save → mark archived → save
//! ```

#![doc(html_root_url = "https://docs.rs/interlace/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use interlace_core as core;

// Re-export pipeline types
pub use interlace_pipeline as pipeline;

// Re-export test fixtures
pub use interlace_pipeline::fixtures;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use interlace::prelude::*;
/// ```
pub mod prelude {
    pub use interlace_core::{
        InterlaceError, InterlaceResult, OperationContext, OperationDescriptor, RequestArgs,
        RequestId, Stage, Verb,
    };

    pub use interlace_pipeline::{
        Adapter, ArchivePolicy, Endpoint, EndpointBuilder, Hook, HookSet, HookTable, Pipeline,
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_prelude_exposes_descriptors() {
        let descriptor = Verb::Archive.descriptor();
        assert_eq!(descriptor.method, http::Method::DELETE);
        assert_eq!(descriptor.stages, &[Stage::PreSave]);
    }
}
