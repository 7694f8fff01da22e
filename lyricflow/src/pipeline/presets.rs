//! The lyrics analysis pipeline: summarize, then classify genre.

use super::{PipelineBuilder, StageSpec};
use crate::errors::TemplateError;
use crate::providers::GenerationProvider;
use std::sync::Arc;

/// Context key holding the song lyrics.
pub const LYRICS_KEY: &str = "lyrics";

/// Context key holding the generated summary.
pub const SUMMARY_KEY: &str = "summary";

/// Context key holding the predicted genre.
pub const GENRE_KEY: &str = "genre";

/// Prompt for the summary stage.
pub const SUMMARY_TEMPLATE: &str = "Summarize the following lyrics:\n\n{lyrics}";

/// Prompt for the genre stage.
pub const GENRE_TEMPLATE: &str =
    "Identify the genre of the song based on this summary. Give a single word output:\n\n{summary}";

/// Returns a builder for the two-stage lyrics analysis pipeline.
///
/// Input `lyrics`, outputs `summary` and `genre`. Both stages share
/// `provider`. Callers may still attach a sink or toggle verbosity before
/// building.
///
/// # Errors
///
/// Returns an error if a built-in template fails to parse.
pub fn lyrics_analysis_builder(
    provider: Arc<dyn GenerationProvider>,
) -> Result<PipelineBuilder, TemplateError> {
    Ok(PipelineBuilder::new("lyrics_analysis")
        .input_variables([LYRICS_KEY])
        .llm_stage(StageSpec::parse(SUMMARY_TEMPLATE, SUMMARY_KEY)?, provider.clone())
        .llm_stage(StageSpec::parse(GENRE_TEMPLATE, GENRE_KEY)?, provider)
        .output_variables([SUMMARY_KEY, GENRE_KEY]))
}
