//! Stage interleaver.
//!
//! The [`Pipeline`] runs all hooks for one stage in resolved order,
//! threading a single evolving value through them. It is a pure
//! sequencing mechanism: no recovery, no retries, no partial results.

use crate::hook::Hook;
use crate::registry::{HookSet, HookTable};
use interlace_core::{InterlaceResult, OperationContext, RequestArgs, Stage};
use serde_json::Value;

/// The stage interleaver.
///
/// # Contract
///
/// - Hooks run in the [`HookTable`]'s resolved order; only the value is
///   threaded, the request arguments are passed identically to every
///   hook of the stage.
/// - A stage with zero hooks is the identity function.
/// - The first hook error halts the stage immediately and propagates to
///   the caller unchanged.
///
/// # Example
///
/// ```
/// use interlace_pipeline::{HookSet, Pipeline};
/// use interlace_core::{OperationContext, RequestArgs, Stage};
/// use serde_json::json;
///
/// let pipeline: Pipeline<()> = Pipeline::resolve(
///     &HookSet::new().on(Stage::PreFetch, "fix_query", |_, _, _, _| {
///         Ok(json!({"user_id": 1}))
///     }),
/// )
/// .unwrap();
///
/// let mut ctx = OperationContext::new();
/// let args = RequestArgs::new();
/// let query = pipeline
///     .interleave(&(), Stage::PreFetch, json!(null), &mut ctx, &args)
///     .unwrap();
/// assert_eq!(query, json!({"user_id": 1}));
/// ```
pub struct Pipeline<S> {
    table: HookTable<S>,
}

impl<S> Pipeline<S> {
    /// Creates a pipeline over an already-resolved hook table.
    #[must_use]
    pub fn new(table: HookTable<S>) -> Self {
        Self { table }
    }

    /// Resolves a hook set and wraps the result.
    ///
    /// # Errors
    ///
    /// Propagates [`InterlaceError::UnknownStage`](interlace_core::InterlaceError::UnknownStage)
    /// from resolution.
    pub fn resolve(set: &HookSet<S>) -> InterlaceResult<Self> {
        Ok(Self::new(set.resolve()?))
    }

    /// Returns the ordered hooks for a stage.
    #[must_use]
    pub fn hooks(&self, stage: Stage) -> &[Hook<S>] {
        self.table.stage(stage)
    }

    /// Runs a stage's hooks in order, threading `value` through them.
    ///
    /// # Errors
    ///
    /// Returns the first hook error verbatim; no later hook in the stage
    /// runs after a failure.
    pub fn interleave(
        &self,
        state: &S,
        stage: Stage,
        value: Value,
        ctx: &mut OperationContext,
        args: &RequestArgs,
    ) -> InterlaceResult<Value> {
        let mut value = value;
        for hook in self.table.stage(stage) {
            tracing::trace!(
                request_id = %ctx.request_id(),
                stage = %stage,
                hook = hook.name(),
                "running hook"
            );
            value = match hook.invoke(state, value, ctx, args) {
                Ok(next) => next,
                Err(err) => {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        stage = %stage,
                        hook = hook.name(),
                        error = %err,
                        "hook failed, halting stage"
                    );
                    return Err(err);
                }
            };
        }
        Ok(value)
    }
}

impl<S> std::fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("table", &self.table)
            .finish()
    }
}
