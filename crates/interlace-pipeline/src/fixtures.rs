//! Test fixtures for Interlace development and testing.
//!
//! This module provides [`MemoryAdapter`], an in-memory [`Adapter`]
//! implementation that stands in for an ORM plus schema library in tests
//! and examples.
//!
//! # Example
//!
//! ```
//! use interlace_pipeline::fixtures::MemoryAdapter;
//! use interlace_pipeline::Adapter;
//! use interlace_core::RequestArgs;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let adapter = MemoryAdapter::new();
//! adapter.seed(json!({"id": 1, "first_name": "Alice"}));
//!
//! let saved = adapter.save(json!({"first_name": "Bob"})).await.unwrap();
//! assert_eq!(saved["id"], json!(2));
//! # });
//! ```

use crate::adapter::Adapter;
use indexmap::IndexMap;
use interlace_core::{InterlaceError, InterlaceResult, RequestArgs};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// In-memory adapter backed by an id-keyed JSON object store.
///
/// - `build_query` produces `{"filters": {...}}` from the request args.
/// - `fetch_all` applies the query's top-level equality filters.
/// - `fetch_one` looks up by id, ignoring the query representation, so
///   hooks may replace the query with any literal.
/// - `load` validates that raw input is a JSON object.
/// - `dump` wraps the value in a `{"data": ...}` envelope.
/// - `save` assigns a sequential numeric id when absent.
/// - `delete` removes the object and records it for inspection.
pub struct MemoryAdapter {
    store: Mutex<IndexMap<String, Value>>,
    deleted: Mutex<Vec<Value>>,
    next_id: AtomicU64,
}

impl MemoryAdapter {
    /// Creates an empty adapter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Mutex::new(IndexMap::new()),
            deleted: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Stores an object directly, bypassing the save path.
    ///
    /// Objects without an `id` field get a sequential one.
    pub fn seed(&self, value: Value) -> Value {
        let value = self.assign_id(value);
        let id = id_of(&value).expect("seeded objects carry an id");
        self.store.lock().unwrap().insert(id, value.clone());
        value
    }

    /// Returns the stored object with the given id, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Value> {
        self.store.lock().unwrap().get(id).cloned()
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.lock().unwrap().is_empty()
    }

    /// Returns the objects removed through [`Adapter::delete`].
    #[must_use]
    pub fn deleted(&self) -> Vec<Value> {
        self.deleted.lock().unwrap().clone()
    }

    fn assign_id(&self, mut value: Value) -> Value {
        if let Value::Object(map) = &mut value {
            if !map.contains_key("id") {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                map.insert("id".to_string(), json!(id));
            } else if let Some(n) = map.get("id").and_then(Value::as_u64) {
                // Keep the sequence ahead of explicit ids.
                self.next_id.fetch_max(n + 1, Ordering::SeqCst);
            }
        }
        value
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAdapter")
            .field("stored", &self.len())
            .finish_non_exhaustive()
    }
}

impl Adapter for MemoryAdapter {
    async fn build_query(&self, args: &RequestArgs) -> InterlaceResult<Value> {
        let filters = serde_json::to_value(args)
            .map_err(|err| InterlaceError::collaborator("build_query", err))?;
        Ok(json!({ "filters": filters }))
    }

    async fn fetch_all(&self, query: Value) -> InterlaceResult<Value> {
        let store = self.store.lock().unwrap();
        let matches: Vec<Value> = store
            .values()
            .filter(|value| matches_filters(value, query.get("filters")))
            .cloned()
            .collect();
        Ok(Value::Array(matches))
    }

    async fn fetch_one(&self, _query: Value, id: &str) -> InterlaceResult<Option<Value>> {
        Ok(self.store.lock().unwrap().get(id).cloned())
    }

    async fn load(&self, raw: Value) -> InterlaceResult<Value> {
        if raw.is_object() {
            Ok(raw)
        } else {
            Err(InterlaceError::collaborator(
                "load",
                anyhow::anyhow!("expected a JSON object, got {raw}"),
            ))
        }
    }

    async fn dump(&self, value: Value) -> InterlaceResult<Value> {
        Ok(json!({ "data": value }))
    }

    async fn save(&self, value: Value) -> InterlaceResult<Value> {
        let value = self.assign_id(value);
        let id = id_of(&value)
            .ok_or_else(|| InterlaceError::collaborator("save", anyhow::anyhow!("missing id")))?;
        self.store.lock().unwrap().insert(id, value.clone());
        Ok(value)
    }

    async fn delete(&self, value: Value) -> InterlaceResult<()> {
        let id = id_of(&value)
            .ok_or_else(|| InterlaceError::collaborator("delete", anyhow::anyhow!("missing id")))?;
        self.store.lock().unwrap().shift_remove(&id);
        self.deleted.lock().unwrap().push(value);
        Ok(())
    }
}

/// Extracts an object's id as a string key.
fn id_of(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Top-level equality filter match; a missing or empty filter set
/// matches everything.
fn matches_filters(value: &Value, filters: Option<&Value>) -> bool {
    let Some(Value::Object(filters)) = filters else {
        return true;
    };
    filters
        .iter()
        .all(|(key, expected)| value.get(key) == Some(expected))
}
