//! Hook declaration and resolution.
//!
//! [`HookSet`] is the declarative registration surface: hooks are tagged
//! with a stage name and a priority, mirroring how route glue tags
//! handler members. [`HookSet::resolve`] validates every tag, groups
//! hooks by stage, and produces an immutable [`HookTable`] with a
//! deterministic, priority-ordered sequence per stage.
//!
//! Resolution is idempotent: resolving the same set repeatedly yields the
//! same ordering. Nothing is cached in global state, so redefining a set
//! in tests can never observe stale hooks.

use crate::hook::{Hook, HookAction};
use interlace_core::{InterlaceResult, OperationContext, RequestArgs, Stage};
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

/// A hook declaration awaiting resolution.
///
/// The stage is kept as a raw tag so that misspelled stage names fail at
/// resolution time with
/// [`InterlaceError::UnknownStage`](interlace_core::InterlaceError::UnknownStage),
/// never silently at run time.
struct Declaration<S> {
    stage: String,
    name: &'static str,
    priority: i32,
    action: HookAction<S>,
}

/// The declarative list of hooks attached to an endpoint definition.
///
/// # Example
///
/// ```
/// use interlace_pipeline::HookSet;
/// use interlace_core::Stage;
/// use serde_json::json;
///
/// let set: HookSet<()> = HookSet::new()
///     .on(Stage::PreLoad, "set_first_name", |_, mut value, _, _| {
///         value["first_name"] = json!("George");
///         Ok(value)
///     })
///     .on_with_priority(Stage::PreFetch, -1, "apply_query_args", |_, value, _, _| Ok(value));
///
/// let table = set.resolve().unwrap();
/// assert_eq!(table.stage(Stage::PreLoad).len(), 1);
/// assert!(table.stage(Stage::PostSave).is_empty());
/// ```
pub struct HookSet<S> {
    declared: Vec<Declaration<S>>,
}

impl<S> HookSet<S> {
    /// Creates an empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declared: Vec::new(),
        }
    }

    /// Declares a hook on a stage with the default priority of `0`.
    #[must_use]
    pub fn on<F>(self, stage: Stage, name: &'static str, action: F) -> Self
    where
        F: Fn(&S, Value, &mut OperationContext, &RequestArgs) -> InterlaceResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.tagged(stage.name(), 0, name, action)
    }

    /// Declares a hook on a stage with an explicit priority.
    ///
    /// Higher priorities execute earlier within the stage.
    #[must_use]
    pub fn on_with_priority<F>(
        self,
        stage: Stage,
        priority: i32,
        name: &'static str,
        action: F,
    ) -> Self
    where
        F: Fn(&S, Value, &mut OperationContext, &RequestArgs) -> InterlaceResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.tagged(stage.name(), priority, name, action)
    }

    /// Declares a hook tagged with a raw stage name.
    ///
    /// The tag is validated by [`resolve`](Self::resolve); unknown names
    /// are surfaced there, not here.
    #[must_use]
    pub fn tagged<F>(
        mut self,
        stage: impl Into<String>,
        priority: i32,
        name: &'static str,
        action: F,
    ) -> Self
    where
        F: Fn(&S, Value, &mut OperationContext, &RequestArgs) -> InterlaceResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.declared.push(Declaration {
            stage: stage.into(),
            name,
            priority,
            action: Arc::new(action),
        });
        self
    }

    /// Returns the number of declared hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    /// Returns `true` if no hooks are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Resolves the declarations into an immutable [`HookTable`].
    ///
    /// Hooks are grouped by stage and stable-sorted by descending
    /// priority, so equal priorities keep their declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`InterlaceError::UnknownStage`](interlace_core::InterlaceError::UnknownStage)
    /// if any declaration is tagged with a name outside the fixed stage
    /// enumeration.
    pub fn resolve(&self) -> InterlaceResult<HookTable<S>> {
        let mut by_stage: HashMap<Stage, Vec<Hook<S>>> = HashMap::new();
        for decl in &self.declared {
            let stage = Stage::from_name(&decl.stage)?;
            let hook = Hook::from_action(stage, decl.name, decl.priority, Arc::clone(&decl.action));
            by_stage.entry(stage).or_default().push(hook);
        }

        // Vec::sort_by_key is stable: declaration order survives ties.
        for hooks in by_stage.values_mut() {
            hooks.sort_by_key(|hook| Reverse(hook.priority()));
        }

        Ok(HookTable { by_stage })
    }
}

impl<S> Default for HookSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for HookSet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookSet")
            .field("declared", &self.declared.len())
            .finish()
    }
}

/// Resolved, immutable mapping from stage to ordered hook sequence.
///
/// Stages with no declared hooks yield an empty slice; absence of hooks
/// is valid, not an error.
pub struct HookTable<S> {
    by_stage: HashMap<Stage, Vec<Hook<S>>>,
}

impl<S> HookTable<S> {
    /// Returns the ordered hooks for a stage.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> &[Hook<S>] {
        self.by_stage.get(&stage).map_or(&[], Vec::as_slice)
    }

    /// Returns the total number of resolved hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_stage.values().map(Vec::len).sum()
    }

    /// Returns `true` if no hooks are resolved for any stage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_stage.values().all(Vec::is_empty)
    }
}

impl<S> std::fmt::Debug for HookTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookTable")
            .field("hooks", &self.len())
            .finish()
    }
}
