//! Pipeline building and execution.
//!
//! This module provides:
//! - Stage specifications
//! - Pipeline builder with validation
//! - The sequential execution engine
//! - The built-in lyrics analysis pipeline

mod builder;
mod integration_tests;
mod presets;
mod result;
mod sequential;
mod spec;

pub use builder::PipelineBuilder;
pub use presets::{
    lyrics_analysis_builder, GENRE_KEY, GENRE_TEMPLATE, LYRICS_KEY, SUMMARY_KEY, SUMMARY_TEMPLATE,
};
pub use result::PipelineResult;
pub use sequential::SequentialPipeline;
pub use spec::StageSpec;
