//! Template-render-then-generate stage.

use super::{Stage, StageOutput};
use crate::context::Context;
use crate::errors::LyricflowError;
use crate::pipeline::StageSpec;
use crate::providers::GenerationProvider;
use async_trait::async_trait;
use std::sync::Arc;

/// A stage that renders its prompt template and sends it to a generation
/// provider. The response text becomes the stage output.
#[derive(Clone)]
pub struct LlmStage {
    spec: StageSpec,
    provider: Arc<dyn GenerationProvider>,
}

impl std::fmt::Debug for LlmStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmStage")
            .field("output_key", &self.spec.output_key())
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl LlmStage {
    /// Creates a new LLM stage.
    #[must_use]
    pub fn new(spec: StageSpec, provider: Arc<dyn GenerationProvider>) -> Self {
        Self { spec, provider }
    }

    /// Returns the stage specification.
    #[must_use]
    pub fn spec(&self) -> &StageSpec {
        &self.spec
    }
}

#[async_trait]
impl Stage for LlmStage {
    fn name(&self) -> &str {
        self.spec.output_key()
    }

    fn input_keys(&self) -> &[String] {
        self.spec.template().variables()
    }

    fn output_key(&self) -> &str {
        self.spec.output_key()
    }

    async fn run(&self, ctx: &Context) -> Result<StageOutput, LyricflowError> {
        let prompt = self.spec.template().render(self.name(), ctx)?;
        tracing::debug!(stage = self.name(), prompt = %prompt, "Rendered prompt");

        let text = self.provider.generate(&prompt).await?;
        Ok(StageOutput::new(self.spec.output_key(), text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::testing::ScriptedGenerationProvider;

    fn summary_spec() -> StageSpec {
        StageSpec::parse("Summarize the following lyrics:\n\n{lyrics}", "summary").unwrap()
    }

    #[tokio::test]
    async fn test_run_renders_and_generates() {
        let provider = Arc::new(ScriptedGenerationProvider::new(["A short summary"]));
        let stage = LlmStage::new(summary_spec(), provider.clone());
        let ctx = Context::from_inputs([("lyrics", "la la la")]);

        let output = stage.run(&ctx).await.unwrap();

        assert_eq!(output, StageOutput::new("summary", "A short summary"));
        assert_eq!(
            provider.prompts(),
            vec!["Summarize the following lyrics:\n\nla la la".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_variable_skips_provider() {
        let provider = Arc::new(ScriptedGenerationProvider::new(["unused"]));
        let stage = LlmStage::new(summary_spec(), provider.clone());

        let err = stage.run(&Context::new()).await.unwrap_err();

        assert!(matches!(err, LyricflowError::MissingVariable(ref e) if e.key == "lyrics"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_propagates_unchanged() {
        let failure = ProviderError::rate_limited("stub", "429");
        let provider = Arc::new(ScriptedGenerationProvider::from_results(vec![Err(failure.clone())]));
        let stage = LlmStage::new(summary_spec(), provider);
        let ctx = Context::from_inputs([("lyrics", "x")]);

        let err = stage.run(&ctx).await.unwrap_err();

        assert_eq!(err.as_provider_error(), Some(&failure));
    }

    #[test]
    fn test_keys() {
        let stage = LlmStage::new(
            summary_spec(),
            Arc::new(ScriptedGenerationProvider::new(Vec::<String>::new())),
        );
        assert_eq!(stage.name(), "summary");
        assert_eq!(stage.input_keys(), &["lyrics".to_string()]);
        assert_eq!(stage.output_key(), "summary");
    }
}
