//! Sequential pipeline execution.

use super::PipelineResult;
use crate::context::{Context, RunIdentity};
use crate::errors::{LyricflowError, MissingVariableError};
use crate::events::EventSink;
use crate::stages::Stage;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// A validated, ordered list of stages sharing one context.
///
/// Built by [`PipelineBuilder`](super::PipelineBuilder). Stages run strictly
/// in order and the first failure aborts the run.
#[derive(Clone)]
pub struct SequentialPipeline {
    name: String,
    input_variables: Vec<String>,
    output_variables: Vec<String>,
    stages: Vec<Arc<dyn Stage>>,
    sink: Arc<dyn EventSink>,
    verbose: bool,
}

impl fmt::Debug for SequentialPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialPipeline")
            .field("name", &self.name)
            .field("input_variables", &self.input_variables)
            .field("output_variables", &self.output_variables)
            .field("stages", &self.stages)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl SequentialPipeline {
    pub(super) fn new(
        name: String,
        input_variables: Vec<String>,
        output_variables: Vec<String>,
        stages: Vec<Arc<dyn Stage>>,
        sink: Arc<dyn EventSink>,
        verbose: bool,
    ) -> Self {
        Self {
            name,
            input_variables,
            output_variables,
            stages,
            sink,
            verbose,
        }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared input variables.
    #[must_use]
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Returns the declared output variables.
    #[must_use]
    pub fn output_variables(&self) -> &[String] {
        &self.output_variables
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs the pipeline with a fresh run identity.
    ///
    /// # Errors
    ///
    /// Returns `MissingVariable` if a declared input is absent, or the first
    /// stage error unchanged.
    pub async fn run<K, V>(
        &self,
        inputs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<PipelineResult, LyricflowError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.run_with_identity(&RunIdentity::new(), inputs).await
    }

    /// Runs the pipeline under the given run identity.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn run_with_identity<K, V>(
        &self,
        identity: &RunIdentity,
        inputs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<PipelineResult, LyricflowError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let ctx = Context::from_inputs(inputs);
        let span = tracing::info_span!("pipeline", name = %self.name, run_id = %identity.run_id);
        self.execute(identity, ctx).instrument(span).await
    }

    async fn execute(
        &self,
        identity: &RunIdentity,
        mut ctx: Context,
    ) -> Result<PipelineResult, LyricflowError> {
        let run_id = identity.run_id.to_string();

        if let Some(missing) = self.input_variables.iter().find(|k| !ctx.contains_key(k)) {
            let err = LyricflowError::from(MissingVariableError::new(&self.name, missing));
            self.emit_failure(&run_id, None, &err, identity.elapsed_ms()).await;
            return Err(err);
        }

        self.sink
            .emit(
                "pipeline.started",
                serde_json::json!({
                    "run_id": run_id,
                    "pipeline": self.name,
                    "stages": self.stage_names(),
                }),
            )
            .await;

        for stage in &self.stages {
            self.sink
                .emit(
                    "stage.started",
                    serde_json::json!({
                        "run_id": run_id,
                        "stage": stage.name(),
                    }),
                )
                .await;

            let stage_start = Instant::now();
            let output = match stage.run(&ctx).await {
                Ok(output) => output,
                Err(err) => {
                    tracing::warn!(stage = stage.name(), error = %err, "Stage failed");
                    self.emit_failure(&run_id, Some(stage.name()), &err, identity.elapsed_ms())
                        .await;
                    return Err(err);
                }
            };
            let duration_ms = stage_start.elapsed().as_secs_f64() * 1000.0;

            if self.verbose {
                tracing::info!(stage = stage.name(), output = %output.value, "Stage output");
            }

            self.sink
                .emit(
                    "stage.completed",
                    serde_json::json!({
                        "run_id": run_id,
                        "stage": stage.name(),
                        "duration_ms": duration_ms,
                    }),
                )
                .await;

            let (key, value) = output.into_pair();
            ctx.insert(key, value);
        }

        let result = PipelineResult::from_context(&self.name, &ctx, &self.output_variables)?;

        self.sink
            .emit(
                "pipeline.completed",
                serde_json::json!({
                    "run_id": run_id,
                    "pipeline": self.name,
                    "duration_ms": identity.elapsed_ms(),
                }),
            )
            .await;

        Ok(result)
    }

    async fn emit_failure(
        &self,
        run_id: &str,
        stage: Option<&str>,
        err: &LyricflowError,
        duration_ms: i64,
    ) {
        if let Some(stage) = stage {
            self.sink
                .emit(
                    "stage.failed",
                    serde_json::json!({
                        "run_id": run_id,
                        "stage": stage,
                        "error": err.to_string(),
                    }),
                )
                .await;
        }

        self.sink
            .emit(
                "pipeline.failed",
                serde_json::json!({
                    "run_id": run_id,
                    "pipeline": self.name,
                    "stage": stage,
                    "error": err.to_string(),
                    "duration_ms": duration_ms,
                }),
            )
            .await;
    }
}
