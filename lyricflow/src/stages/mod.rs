//! Stage trait and implementations.
//!
//! Stages are the units of work in a pipeline. Each one reads from the
//! shared [`Context`] and produces exactly one named value.

mod llm;

pub use llm::LlmStage;

use crate::context::Context;
use crate::errors::LyricflowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The `(key, value)` pair a stage produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutput {
    /// The context key to write.
    pub key: String,
    /// The produced value.
    pub value: String,
}

impl StageOutput {
    /// Creates a new stage output.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Splits into `(key, value)`.
    #[must_use]
    pub fn into_pair(self) -> (String, String) {
        (self.key, self.value)
    }
}

/// Trait for pipeline stages.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> &str;

    /// Context keys this stage reads.
    fn input_keys(&self) -> &[String];

    /// Context key this stage writes.
    fn output_key(&self) -> &str;

    /// Runs the stage against the current context.
    ///
    /// # Errors
    ///
    /// Returns `MissingVariable` if a required key is absent, or whatever
    /// error the stage's provider raised.
    async fn run(&self, ctx: &Context) -> Result<StageOutput, LyricflowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_output_pair() {
        let output = StageOutput::new("summary", "text");
        assert_eq!(output.into_pair(), ("summary".to_string(), "text".to_string()));
    }
}
