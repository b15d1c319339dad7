//! Per-verb operation drivers.
//!
//! Each driver runs its verb's fixed stage sequence over the pipeline,
//! invoking the external collaborators between hook stages. Every
//! invocation creates its own [`OperationContext`], so isolation between
//! concurrent invocations holds by construction; there is no ambient or
//! pooled context state anywhere.

use crate::adapter::Adapter;
use crate::endpoint::Endpoint;
use interlace_core::{InterlaceError, InterlaceResult, OperationContext, RequestArgs, Stage, Verb};
use serde_json::Value;

impl<S: Adapter> Endpoint<S> {
    /// Reads a collection: `pre_fetch → fetch_all → post_fetch →
    /// pre_dump → dump → post_dump`.
    pub async fn read_all(&self, args: &RequestArgs) -> InterlaceResult<Value> {
        let mut ctx = OperationContext::new();
        tracing::debug!(request_id = %ctx.request_id(), verb = %Verb::Read, "handling operation");

        let query = self.state().build_query(args).await?;
        let query = self.interleave(Stage::PreFetch, query, &mut ctx, args)?;
        let models = self.state().fetch_all(query).await?;
        let models = self.interleave(Stage::PostFetch, models, &mut ctx, args)?;
        self.dump_stages(models, &mut ctx, args).await
    }

    /// Reads a single resource by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`InterlaceError::NotFound`] when the fetch yields no
    /// object, the explicit translation of the collaborator's `None`.
    pub async fn read(&self, id: &str, args: &RequestArgs) -> InterlaceResult<Value> {
        let mut ctx = OperationContext::new();
        tracing::debug!(request_id = %ctx.request_id(), verb = %Verb::Read, id, "handling operation");

        let query = self.state().build_query(args).await?;
        let query = self.interleave(Stage::PreFetch, query, &mut ctx, args)?;
        let model = self
            .state()
            .fetch_one(query, id)
            .await?
            .ok_or_else(|| InterlaceError::not_found(self.resource(), id))?;
        let model = self.interleave(Stage::PostFetch, model, &mut ctx, args)?;
        self.dump_stages(model, &mut ctx, args).await
    }

    /// Creates a resource: `pre_load → load → post_load → pre_save →
    /// save → post_save → pre_dump → dump → post_dump`.
    pub async fn create(&self, raw: Value, args: &RequestArgs) -> InterlaceResult<Value> {
        let mut ctx = OperationContext::new();
        tracing::debug!(request_id = %ctx.request_id(), verb = %Verb::Create, "handling operation");

        let model = self.write_stages(raw, None, &mut ctx, args).await?;
        self.dump_stages(model, &mut ctx, args).await
    }

    /// Updates an existing resource. Create's stage shape, operating on
    /// the fetched existing value.
    pub async fn update(&self, id: &str, raw: Value, args: &RequestArgs) -> InterlaceResult<Value> {
        self.update_inner(Verb::Update, id, raw, args).await
    }

    /// Partially updates an existing resource.
    ///
    /// Identical mechanics to [`update`](Self::update); the verbs differ
    /// only in their externally visible HTTP method.
    pub async fn partial_update(
        &self,
        id: &str,
        raw: Value,
        args: &RequestArgs,
    ) -> InterlaceResult<Value> {
        self.update_inner(Verb::PartialUpdate, id, raw, args).await
    }

    /// Deletes an existing resource: `pre_save → delete`.
    ///
    /// `post_save` hooks are never invoked; deletion is a terminal
    /// action with no response body.
    pub async fn delete(&self, id: &str, args: &RequestArgs) -> InterlaceResult<()> {
        let mut ctx = OperationContext::new();
        tracing::debug!(request_id = %ctx.request_id(), verb = %Verb::Delete, id, "handling operation");

        let model = self.fetch_existing(id, args).await?;
        let model = self.interleave(Stage::PreSave, model, &mut ctx, args)?;
        self.state().delete(model).await
    }

    /// Archives an existing resource: `pre_save`, then the archive field
    /// is set to the archive value, then `save`.
    ///
    /// Externally this follows Delete's contract (DELETE/204, no body)
    /// while persisting a mutation instead of removing the resource.
    ///
    /// # Errors
    ///
    /// Returns [`InterlaceError::Collaborator`] if the value reaching the
    /// archive mutation is not a JSON object; nothing is saved.
    pub async fn archive(&self, id: &str, args: &RequestArgs) -> InterlaceResult<()> {
        let mut ctx = OperationContext::new();
        tracing::debug!(request_id = %ctx.request_id(), verb = %Verb::Archive, id, "handling operation");

        let model = self.fetch_existing(id, args).await?;
        let mut model = self.interleave(Stage::PreSave, model, &mut ctx, args)?;
        let Value::Object(map) = &mut model else {
            return Err(InterlaceError::collaborator(
                "archive",
                anyhow::anyhow!("cannot set an archive field on a non-object value"),
            ));
        };
        let policy = self.archive_policy();
        map.insert(policy.field.clone(), policy.value.clone());
        self.state().save(model).await?;
        Ok(())
    }

    async fn update_inner(
        &self,
        verb: Verb,
        id: &str,
        raw: Value,
        args: &RequestArgs,
    ) -> InterlaceResult<Value> {
        let mut ctx = OperationContext::new();
        tracing::debug!(request_id = %ctx.request_id(), verb = %verb, id, "handling operation");

        let existing = self.fetch_existing(id, args).await?;
        let model = self.write_stages(raw, Some(existing), &mut ctx, args).await?;
        self.dump_stages(model, &mut ctx, args).await
    }

    /// The shared write shape: load stages, merge onto any existing
    /// value, save stages.
    async fn write_stages(
        &self,
        raw: Value,
        existing: Option<Value>,
        ctx: &mut OperationContext,
        args: &RequestArgs,
    ) -> InterlaceResult<Value> {
        let raw = self.interleave(Stage::PreLoad, raw, ctx, args)?;
        let loaded = self.state().load(raw).await?;
        let loaded = self.interleave(Stage::PostLoad, loaded, ctx, args)?;

        let model = match existing {
            Some(base) => merge(base, loaded),
            None => loaded,
        };

        let model = self.interleave(Stage::PreSave, model, ctx, args)?;
        let model = self.state().save(model).await?;
        self.interleave(Stage::PostSave, model, ctx, args)
    }

    /// The shared dump shape closing every value-returning verb.
    async fn dump_stages(
        &self,
        model: Value,
        ctx: &mut OperationContext,
        args: &RequestArgs,
    ) -> InterlaceResult<Value> {
        let model = self.interleave(Stage::PreDump, model, ctx, args)?;
        let out = self.state().dump(model).await?;
        self.interleave(Stage::PostDump, out, ctx, args)
    }

    /// Fetches the object a write-shaped verb operates on.
    ///
    /// This is a prologue, not part of the verb's stage sequence, so
    /// fetch hooks do not run here.
    async fn fetch_existing(&self, id: &str, args: &RequestArgs) -> InterlaceResult<Value> {
        let query = self.state().build_query(args).await?;
        self.state()
            .fetch_one(query, id)
            .await?
            .ok_or_else(|| InterlaceError::not_found(self.resource(), id))
    }
}

/// Overlays the loaded fields onto the existing object.
///
/// Non-object inputs replace the base outright, matching the pipeline's
/// value-replacing hook semantics.
fn merge(base: Value, loaded: Value) -> Value {
    match (base, loaded) {
        (Value::Object(mut base), Value::Object(loaded)) => {
            for (key, value) in loaded {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (_, loaded) => loaded,
    }
}
