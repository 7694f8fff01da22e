//! Pipeline builder with validation.

use super::{SequentialPipeline, StageSpec};
use crate::errors::{ContractErrorInfo, ContractSuggestions, PipelineValidationError};
use crate::events::{EventSink, NoOpEventSink};
use crate::providers::GenerationProvider;
use crate::stages::{LlmStage, Stage};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Builder for creating validated sequential pipelines.
///
/// Validation happens in [`build`](Self::build), before any provider is
/// called: every template variable must be an input or an earlier output,
/// output keys must be unique, and declared outputs must be produced.
#[derive(Clone)]
pub struct PipelineBuilder {
    name: String,
    input_variables: Vec<String>,
    output_variables: Option<Vec<String>>,
    stages: Vec<Arc<dyn Stage>>,
    sink: Arc<dyn EventSink>,
    verbose: bool,
}

impl fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("name", &self.name)
            .field("input_variables", &self.input_variables)
            .field("output_variables", &self.output_variables)
            .field("stages", &self.stages)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_variables: Vec::new(),
            output_variables: None,
            stages: Vec::new(),
            sink: Arc::new(NoOpEventSink),
            verbose: false,
        }
    }

    /// Declares the variables callers must supply to `run`.
    #[must_use]
    pub fn input_variables(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.input_variables = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declares which context keys make up the result, in order.
    ///
    /// Defaults to every stage output key in stage order.
    #[must_use]
    pub fn output_variables(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.output_variables = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Appends a stage.
    #[must_use]
    pub fn stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Appends an [`LlmStage`] built from `spec` and `provider`.
    #[must_use]
    pub fn llm_stage(self, spec: StageSpec, provider: Arc<dyn GenerationProvider>) -> Self {
        self.stage(Arc::new(LlmStage::new(spec, provider)))
    }

    /// Sets the event sink.
    #[must_use]
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Logs every stage output at info level.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Validates the wiring and builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a `PipelineValidationError` whose contract code names the
    /// first problem found.
    pub fn build(self) -> Result<SequentialPipeline, PipelineValidationError> {
        self.validate_names()?;

        if self.stages.is_empty() {
            return Err(PipelineValidationError::new("Pipeline has no stages").with_error_info(
                contract_info("CONTRACT-EMPTY", "Cannot build an empty pipeline"),
            ));
        }

        let mut known: HashSet<&str> = self.input_variables.iter().map(String::as_str).collect();
        let mut produced: Vec<String> = Vec::new();

        for stage in &self.stages {
            for var in stage.input_keys() {
                if !known.contains(var.as_str()) {
                    return Err(PipelineValidationError::new(format!(
                        "Stage '{}' references '{}' which is not available before it runs",
                        stage.name(),
                        var
                    ))
                    .with_stages(vec![stage.name().to_string()])
                    .with_error_info(
                        contract_info(
                            "CONTRACT-MISSING_VAR",
                            format!("Variable '{var}' not available"),
                        )
                        .with_context_entry("stage", stage.name())
                        .with_context_entry("variable", var.as_str()),
                    ));
                }
            }

            let output = stage.output_key();
            if known.contains(output) {
                return Err(PipelineValidationError::new(format!(
                    "Stage '{}' writes '{}' which is already an input or an earlier output",
                    stage.name(),
                    output
                ))
                .with_stages(vec![stage.name().to_string()])
                .with_error_info(
                    contract_info(
                        "CONTRACT-OUTPUT_CONFLICT",
                        format!("Output key '{output}' is not unique"),
                    )
                    .with_context_entry("stage", stage.name()),
                ));
            }

            known.insert(output);
            produced.push(output.to_string());
        }

        let output_variables = match self.output_variables {
            Some(declared) => {
                if let Some(unknown) = declared.iter().find(|name| !known.contains(name.as_str())) {
                    return Err(PipelineValidationError::new(format!(
                        "Output variable '{unknown}' is never produced"
                    ))
                    .with_error_info(
                        contract_info(
                            "CONTRACT-UNKNOWN_OUTPUT",
                            format!("No stage produces '{unknown}'"),
                        ),
                    ));
                }
                declared
            }
            None => produced,
        };

        Ok(SequentialPipeline::new(
            self.name,
            self.input_variables,
            output_variables,
            self.stages,
            self.sink,
            self.verbose,
        ))
    }

    fn validate_names(&self) -> Result<(), PipelineValidationError> {
        let blank = |what: &str| {
            PipelineValidationError::new(format!("{what} cannot be empty or whitespace-only"))
                .with_error_info(contract_info("CONTRACT-EMPTY_NAME", format!("Empty {what}")))
        };

        if self.name.trim().is_empty() {
            return Err(blank("Pipeline name"));
        }
        if self.input_variables.iter().any(|v| v.trim().is_empty()) {
            return Err(blank("Input variable"));
        }
        if self.stages.iter().any(|s| s.output_key().trim().is_empty()) {
            return Err(blank("Stage output key"));
        }
        Ok(())
    }
}

fn contract_info(code: &str, summary: impl Into<String>) -> ContractErrorInfo {
    let info = ContractErrorInfo::new(code, summary);
    match ContractSuggestions::get(code) {
        Some(hint) => info.with_fix_hint(hint),
        None => info,
    }
}
