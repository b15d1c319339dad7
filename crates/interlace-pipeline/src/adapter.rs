//! External collaborator seam.
//!
//! The [`Adapter`] trait is the capability interface the pipeline invokes
//! *through*: query construction, fetching, deserialization, persistence,
//! and serialization all live behind it. The pipeline never constructs
//! queries, touches storage, or marshals schemas itself; those belong to
//! the surrounding framework and ORM.

use interlace_core::{InterlaceResult, RequestArgs};
use serde_json::Value;
use std::future::Future;

/// Capabilities an endpoint's external collaborators must supply.
///
/// Implementations typically wrap an ORM session plus a schema library.
/// Absence of an implementation is a compile-time error; there are no
/// silent no-op placeholders.
///
/// Failures should be reported as
/// [`InterlaceError::Collaborator`](interlace_core::InterlaceError::Collaborator);
/// they propagate exactly like hook failures since both occur inside a
/// stage from the pipeline's viewpoint. A missing single object is *not*
/// a failure: [`fetch_one`](Self::fetch_one) returns `Ok(None)` and the
/// operation drivers translate that into a user-visible not-found
/// response.
///
/// # Example
///
/// ```
/// use interlace_pipeline::fixtures::MemoryAdapter;
/// use interlace_pipeline::Adapter;
/// use interlace_core::RequestArgs;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let adapter = MemoryAdapter::new();
/// adapter.seed(json!({"id": 1, "first_name": "Alice"}));
///
/// let query = adapter.build_query(&RequestArgs::new()).await.unwrap();
/// let user = adapter.fetch_one(query, "1").await.unwrap();
/// assert!(user.is_some());
/// # });
/// ```
pub trait Adapter: Send + Sync {
    /// Builds a query representation from request arguments.
    fn build_query(
        &self,
        args: &RequestArgs,
    ) -> impl Future<Output = InterlaceResult<Value>> + Send;

    /// Executes a collection query and returns the matching values.
    fn fetch_all(&self, query: Value) -> impl Future<Output = InterlaceResult<Value>> + Send;

    /// Executes a single-object query.
    ///
    /// Returns `Ok(None)` when no object matches. This is a normal
    /// outcome, not an error.
    fn fetch_one(
        &self,
        query: Value,
        id: &str,
    ) -> impl Future<Output = InterlaceResult<Option<Value>>> + Send;

    /// Deserializes and validates raw input into a value.
    fn load(&self, raw: Value) -> impl Future<Output = InterlaceResult<Value>> + Send;

    /// Serializes a value (or collection of values) for the response.
    fn dump(&self, value: Value) -> impl Future<Output = InterlaceResult<Value>> + Send;

    /// Persists a value and returns the persisted representation.
    fn save(&self, value: Value) -> impl Future<Output = InterlaceResult<Value>> + Send;

    /// Removes a persisted value.
    fn delete(&self, value: Value) -> impl Future<Output = InterlaceResult<()>> + Send;
}
