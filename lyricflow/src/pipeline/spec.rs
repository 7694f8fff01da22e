//! Stage specifications.

use crate::errors::TemplateError;
use crate::prompt::PromptTemplate;

/// A prompt template paired with the context key its response is stored
/// under. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSpec {
    template: PromptTemplate,
    output_key: String,
}

impl StageSpec {
    /// Creates a new stage specification.
    #[must_use]
    pub fn new(template: PromptTemplate, output_key: impl Into<String>) -> Self {
        Self {
            template,
            output_key: output_key.into(),
        }
    }

    /// Parses `template` and creates a stage specification.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed.
    pub fn parse(template: &str, output_key: impl Into<String>) -> Result<Self, TemplateError> {
        Ok(Self::new(PromptTemplate::from_template(template)?, output_key))
    }

    /// Returns the prompt template.
    #[must_use]
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Returns the output key.
    #[must_use]
    pub fn output_key(&self) -> &str {
        &self.output_key
    }
}
