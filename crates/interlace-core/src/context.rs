//! Per-invocation context types.
//!
//! [`OperationContext`] is the scratch store shared across the stages of
//! one operation invocation, and [`RequestArgs`] carries the request
//! arguments passed identically to every hook of a stage.
//!
//! Both are created fresh per invocation and passed explicitly through the
//! pipeline call chain, never stored in ambient thread-local or global
//! state, so concurrent invocations cannot observe each other's state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

/// A unique identifier for each operation invocation, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for log correlation.
///
/// # Example
///
/// ```
/// use interlace_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Ephemeral key-value store scoped to one operation invocation.
///
/// Hooks use the context to pass auxiliary state between stages of the
/// *same* operation, for example a flag computed in `post_load` and
/// consumed in `post_save`. The context is dropped when the invocation
/// ends; it never leaks between invocations.
///
/// # Example
///
/// ```
/// use interlace_core::OperationContext;
/// use serde_json::json;
///
/// let mut ctx = OperationContext::new();
/// ctx.set("run_task", json!(true));
///
/// assert!(ctx.contains_key("run_task"));
/// assert_eq!(ctx.get("run_task"), Some(&json!(true)));
/// assert_eq!(ctx.len(), 1);
/// ```
#[derive(Debug)]
pub struct OperationContext {
    /// Unique identifier for this invocation.
    request_id: RequestId,

    /// When the invocation started.
    started_at: Instant,

    /// Scratch values, in insertion order.
    values: IndexMap<String, Value>,
}

impl OperationContext {
    /// Creates a fresh context with a new request ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            started_at: Instant::now(),
            values: IndexMap::new(),
        }
    }

    /// Creates a context with a specific request ID.
    ///
    /// Useful when the ID was provided by a client or upstream service.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            started_at: Instant::now(),
            values: IndexMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the elapsed time since the invocation started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Removes and returns the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Returns `true` if a value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the context holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Request arguments passed identically to every hook of a stage.
///
/// Unlike the [`OperationContext`], the arguments are not threaded or
/// mutated by hooks; only the pipeline value evolves. They typically
/// carry URI parameters and query filters extracted by transport glue.
///
/// # Example
///
/// ```
/// use interlace_core::RequestArgs;
/// use serde_json::json;
///
/// let args = RequestArgs::new().with("account_id", json!(7));
/// assert_eq!(args.get("account_id"), Some(&json!(7)));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestArgs {
    args: IndexMap<String, Value>,
}

impl RequestArgs {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    /// Returns the argument stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// Returns `true` if an argument is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.args.contains_key(key)
    }

    /// Iterates over the arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl FromIterator<(String, Value)> for RequestArgs {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            args: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_uniqueness() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_from_uuid() {
        let uuid = Uuid::now_v7();
        let id = RequestId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn test_context_get_set_contains_len() {
        let mut ctx = OperationContext::new();
        assert!(ctx.is_empty());
        assert!(!ctx.contains_key("flag"));

        ctx.set("flag", json!(true));
        ctx.set("count", json!(3));

        assert!(ctx.contains_key("flag"));
        assert_eq!(ctx.get("count"), Some(&json!(3)));
        assert_eq!(ctx.len(), 2);

        ctx.set("count", json!(4));
        assert_eq!(ctx.get("count"), Some(&json!(4)));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_context_remove() {
        let mut ctx = OperationContext::new();
        ctx.set("flag", json!("yes"));

        assert_eq!(ctx.remove("flag"), Some(json!("yes")));
        assert_eq!(ctx.remove("flag"), None);
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_fresh_contexts_are_independent() {
        let mut first = OperationContext::new();
        first.set("flag", json!(1));

        let second = OperationContext::new();
        assert!(!second.contains_key("flag"));
        assert_ne!(first.request_id(), second.request_id());
    }

    #[test]
    fn test_context_elapsed() {
        let ctx = OperationContext::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(ctx.elapsed() >= std::time::Duration::from_millis(5));
    }

    #[test]
    fn test_request_args_builder() {
        let args = RequestArgs::new()
            .with("user_id", json!(1))
            .with("include", json!("posts"));

        assert_eq!(args.len(), 2);
        assert_eq!(args.get("user_id"), Some(&json!(1)));
        assert!(args.contains_key("include"));

        let keys: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["user_id", "include"]);
    }

    #[test]
    fn test_request_args_from_iter() {
        let args: RequestArgs = vec![("page".to_string(), json!(2))].into_iter().collect();
        assert_eq!(args.get("page"), Some(&json!(2)));
    }
}
