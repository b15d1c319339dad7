//! Endpoint handler base type.
//!
//! An [`Endpoint`] composes the resolved hook [`Pipeline`], the user's
//! state (usually an [`Adapter`](crate::Adapter) implementation), and the
//! archive policy. Concrete operation logic reaches the hooks through
//! [`interleave`](Endpoint::interleave); the per-verb drivers (`read`,
//! `create`, `delete`, ...) are implemented on [`Endpoint`] directly.

use crate::pipeline::Pipeline;
use crate::registry::HookSet;
use interlace_core::{InterlaceResult, OperationContext, RequestArgs, Stage};
use serde_json::Value;

/// How the Archive verb marks a resource archived.
///
/// The designated field is set to the designated value during the archive
/// operation, after `pre_save` hooks run and before `save` is invoked.
#[derive(Debug, Clone)]
pub struct ArchivePolicy {
    /// The field to mutate.
    pub field: String,
    /// The value marking the resource archived.
    pub value: Value,
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self {
            field: "is_archived".to_string(),
            value: Value::Bool(true),
        }
    }
}

/// A resource endpoint: state, resolved hooks, and archive policy.
///
/// Built once per handler type via [`Endpoint::builder`]; hook resolution
/// happens at build time, so stage misconfiguration surfaces before any
/// request is handled.
///
/// # Example
///
/// ```
/// use interlace_pipeline::Endpoint;
/// use interlace_core::{OperationContext, RequestArgs, Stage};
/// use serde_json::json;
///
/// let endpoint: Endpoint<()> = Endpoint::builder(())
///     .on(Stage::PreLoad, "set_first_name", |_, mut value, _, _| {
///         value["first_name"] = json!("George");
///         Ok(value)
///     })
///     .build()
///     .unwrap();
///
/// let mut ctx = OperationContext::new();
/// let args = RequestArgs::new();
/// let value = endpoint
///     .interleave(Stage::PreLoad, json!({}), &mut ctx, &args)
///     .unwrap();
/// assert_eq!(value["first_name"], json!("George"));
/// ```
pub struct Endpoint<S> {
    state: S,
    pipeline: Pipeline<S>,
    resource: String,
    archive: ArchivePolicy,
}

impl<S> Endpoint<S> {
    /// Creates a builder around the endpoint state.
    #[must_use]
    pub fn builder(state: S) -> EndpointBuilder<S> {
        EndpointBuilder {
            state,
            hooks: HookSet::new(),
            resource: "Resource".to_string(),
            archive: ArchivePolicy::default(),
        }
    }

    /// Returns the endpoint state.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Returns the resolved pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<S> {
        &self.pipeline
    }

    /// Returns the resource name used in not-found responses.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the archive policy.
    #[must_use]
    pub fn archive_policy(&self) -> &ArchivePolicy {
        &self.archive
    }

    /// Runs one stage's hooks over `value`.
    ///
    /// # Errors
    ///
    /// Propagates the first hook error unchanged.
    pub fn interleave(
        &self,
        stage: Stage,
        value: Value,
        ctx: &mut OperationContext,
        args: &RequestArgs,
    ) -> InterlaceResult<Value> {
        self.pipeline.interleave(&self.state, stage, value, ctx, args)
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Endpoint<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("state", &self.state)
            .field("resource", &self.resource)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Endpoint`]. Owns the hook declarations until `build`
/// resolves them.
pub struct EndpointBuilder<S> {
    state: S,
    hooks: HookSet<S>,
    resource: String,
    archive: ArchivePolicy,
}

impl<S> EndpointBuilder<S> {
    /// Declares a hook with the default priority of `0`.
    #[must_use]
    pub fn on<F>(mut self, stage: Stage, name: &'static str, action: F) -> Self
    where
        F: Fn(&S, Value, &mut OperationContext, &RequestArgs) -> InterlaceResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.hooks = self.hooks.on(stage, name, action);
        self
    }

    /// Declares a hook with an explicit priority.
    #[must_use]
    pub fn on_with_priority<F>(
        mut self,
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
        self.hooks = self.hooks.on_with_priority(stage, priority, name, action);
        self
    }

    /// Declares a hook tagged with a raw stage name.
    ///
    /// Unknown names fail in [`build`](Self::build), not at run time.
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
        self.hooks = self.hooks.tagged(stage, priority, name, action);
        self
    }

    /// Sets the resource name used in not-found responses.
    #[must_use]
    pub fn resource(mut self, name: impl Into<String>) -> Self {
        self.resource = name.into();
        self
    }

    /// Overrides the archive field and value.
    #[must_use]
    pub fn archive_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.archive = ArchivePolicy {
            field: field.into(),
            value,
        };
        self
    }

    /// Resolves the declared hooks and builds the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`InterlaceError::UnknownStage`](interlace_core::InterlaceError::UnknownStage)
    /// if any hook is tagged with an invalid stage name.
    pub fn build(self) -> InterlaceResult<Endpoint<S>> {
        Ok(Endpoint {
            pipeline: Pipeline::resolve(&self.hooks)?,
            state: self.state,
            resource: self.resource,
            archive: self.archive,
        })
    }
}
