//! # Interlace Core
//!
//! Core types for the Interlace resource hook pipeline.
//!
//! This crate provides the foundational types used throughout Interlace:
//!
//! - [`Stage`] - Fixed lifecycle stage enumeration
//! - [`Verb`] / [`OperationDescriptor`] - Per-verb method, status, and stage sequence
//! - [`OperationContext`] - Per-invocation scratch store shared across stages
//! - [`RequestArgs`] - Request arguments passed identically to every hook
//! - [`RequestId`] - UUID v7 invocation identifier
//! - [`InterlaceError`] - Standard error types

#![doc(html_root_url = "https://docs.rs/interlace-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod stage;
mod verb;

pub use context::{OperationContext, RequestArgs, RequestId};
pub use error::{InterlaceError, InterlaceResult};
pub use stage::Stage;
pub use verb::{OperationDescriptor, Verb};
