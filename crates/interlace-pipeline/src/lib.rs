//! # Interlace Pipeline
//!
//! Hook registry, stage interleaver, and operation drivers for the
//! Interlace resource hook pipeline.
//!
//! This crate provides:
//!
//! - [`Hook`] - A priority-tagged function bound to one lifecycle stage
//! - [`HookSet`] / [`HookTable`] - Declarative registration and resolved,
//!   deterministic per-stage ordering
//! - [`Pipeline`] - The interleaver threading one evolving value through
//!   a stage's hooks
//! - [`Adapter`] - The external collaborator seam (query, fetch, load,
//!   save, dump)
//! - [`Endpoint`] - The handler base type composing state, hooks, and
//!   the per-verb operation drivers
//!
//! ## Example
//!
//! ```
//! use interlace_pipeline::fixtures::MemoryAdapter;
//! use interlace_pipeline::Endpoint;
//! use interlace_core::{RequestArgs, Stage};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let adapter = MemoryAdapter::new();
//! adapter.seed(json!({"id": 1, "first_name": "Alice"}));
//!
//! let endpoint = Endpoint::builder(adapter)
//!     .resource("User")
//!     .on(Stage::PreDump, "strip_nothing", |_, value, _, _| Ok(value))
//!     .build()
//!     .unwrap();
//!
//! let user = endpoint.read("1", &RequestArgs::new()).await.unwrap();
//! assert_eq!(user["data"]["first_name"], json!("Alice"));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/interlace-pipeline/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
mod endpoint;
pub mod fixtures;
mod hook;
mod operations;
mod pipeline;
mod registry;

pub use adapter::Adapter;
pub use endpoint::{ArchivePolicy, Endpoint, EndpointBuilder};
pub use hook::{Hook, HookAction};
pub use pipeline::Pipeline;
pub use registry::{HookSet, HookTable};
