//! Hook type and action signature.
//!
//! A [`Hook`] is a unit of cross-cutting logic bound to one lifecycle
//! [`Stage`] with a priority. Hooks are declared as part of an endpoint's
//! definition and are never invoked standalone, always through the
//! [`Pipeline`](crate::Pipeline).

use interlace_core::{InterlaceResult, OperationContext, RequestArgs, Stage};
use serde_json::Value;
use std::sync::Arc;

/// A hook action.
///
/// Actions receive the endpoint state, the running pipeline value, the
/// per-invocation context, and the request arguments. They return the
/// next value: hooks are general value-replacing functions, free to
/// substitute a different value outright rather than refine the input.
pub type HookAction<S> = Arc<
    dyn Fn(&S, Value, &mut OperationContext, &RequestArgs) -> InterlaceResult<Value> + Send + Sync,
>;

/// A priority-tagged function bound to one stage.
///
/// Within a stage, hooks execute in strictly non-increasing priority
/// order; ties keep declaration order. The default priority is `0`;
/// negative priorities run after the defaults, higher priorities before.
///
/// # Example
///
/// ```
/// use interlace_pipeline::Hook;
/// use interlace_core::Stage;
/// use serde_json::json;
///
/// let hook: Hook<()> = Hook::new(Stage::PreSave, "tag_account", |_state, mut value, _ctx, _args| {
///     value["account_id"] = json!(1);
///     Ok(value)
/// })
/// .with_priority(10);
///
/// assert_eq!(hook.stage(), Stage::PreSave);
/// assert_eq!(hook.priority(), 10);
/// ```
pub struct Hook<S> {
    name: &'static str,
    stage: Stage,
    priority: i32,
    action: HookAction<S>,
}

impl<S> Hook<S> {
    /// Creates a hook with the default priority of `0`.
    pub fn new<F>(stage: Stage, name: &'static str, action: F) -> Self
    where
        F: Fn(&S, Value, &mut OperationContext, &RequestArgs) -> InterlaceResult<Value>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            stage,
            priority: 0,
            action: Arc::new(action),
        }
    }

    /// Creates a hook from an already-shared action. Used by resolution.
    pub(crate) fn from_action(
        stage: Stage,
        name: &'static str,
        priority: i32,
        action: HookAction<S>,
    ) -> Self {
        Self {
            name,
            stage,
            priority,
            action,
        }
    }

    /// Sets the hook's priority. Higher priorities execute earlier.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the hook's declared name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the stage this hook is bound to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the hook's priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Runs the hook's action.
    pub(crate) fn invoke(
        &self,
        state: &S,
        value: Value,
        ctx: &mut OperationContext,
        args: &RequestArgs,
    ) -> InterlaceResult<Value> {
        (self.action)(state, value, ctx, args)
    }
}

impl<S> Clone for Hook<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            stage: self.stage,
            priority: self.priority,
            action: Arc::clone(&self.action),
        }
    }
}

impl<S> std::fmt::Debug for Hook<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("stage", &self.stage)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hook_defaults() {
        let hook: Hook<()> = Hook::new(Stage::PreFetch, "noop", |_, value, _, _| Ok(value));
        assert_eq!(hook.name(), "noop");
        assert_eq!(hook.stage(), Stage::PreFetch);
        assert_eq!(hook.priority(), 0);
    }

    #[test]
    fn test_with_priority() {
        let hook: Hook<()> =
            Hook::new(Stage::PostDump, "late", |_, value, _, _| Ok(value)).with_priority(-1);
        assert_eq!(hook.priority(), -1);
    }

    #[test]
    fn test_invoke_replaces_value() {
        let hook: Hook<()> = Hook::new(Stage::PreFetch, "replace", |_, _, _, _| {
            Ok(json!({"user_id": 1}))
        });

        let mut ctx = OperationContext::new();
        let args = RequestArgs::new();
        let out = hook.invoke(&(), json!(null), &mut ctx, &args).unwrap();
        assert_eq!(out, json!({"user_id": 1}));
    }

    #[test]
    fn test_invoke_reads_state_and_args() {
        let hook: Hook<i64> = Hook::new(Stage::PreLoad, "stamp", |state, mut value, _, args| {
            value["state"] = json!(*state);
            value["page"] = args.get("page").cloned().unwrap_or(Value::Null);
            Ok(value)
        });

        let mut ctx = OperationContext::new();
        let args = RequestArgs::new().with("page", json!(3));
        let out = hook.invoke(&7, json!({}), &mut ctx, &args).unwrap();
        assert_eq!(out, json!({"state": 7, "page": 3}));
    }

    #[test]
    fn test_clone_shares_action() {
        let hook: Hook<()> = Hook::new(Stage::PreSave, "shared", |_, value, _, _| Ok(value));
        let copy = hook.clone();
        assert_eq!(copy.name(), hook.name());
        assert_eq!(copy.stage(), hook.stage());
    }
}
