//! # Lyricflow
//!
//! Fetches song lyrics, summarizes them with a language model, then asks the
//! model for the genre based on that summary.
//!
//! Lyricflow provides:
//!
//! - **Sequential prompt pipelines**: stages render a template from a shared
//!   context and store the model response under their output key
//! - **Build-time validation**: every placeholder must be an input or the
//!   output of an earlier stage
//! - **Provider clients**: Genius for lyrics, OpenAI chat completions for
//!   generation (feature `http`)
//! - **A web front end** with an HTML form and a JSON API (feature `server`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lyricflow::prelude::*;
//!
//! let pipeline = PipelineBuilder::new("lyrics_analysis")
//!     .input_variables(["lyrics"])
//!     .llm_stage(StageSpec::parse("Summarize the following lyrics:\n\n{lyrics}", "summary")?, provider.clone())
//!     .llm_stage(StageSpec::parse("Identify the genre:\n\n{summary}", "genre")?, provider)
//!     .build()?;
//!
//! let result = pipeline.run([("lyrics", "la la la")]).await?;
//! println!("{}", result.get("genre").unwrap_or_default());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod app;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod stages;
pub mod testing;

#[cfg(feature = "server")]
pub mod server;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::{Analysis, AnalysisView, Application, SongQuery, LYRICS_NOT_FOUND};
    pub use crate::context::{Context, RunIdentity};
    pub use crate::errors::{
        ContractErrorInfo, LyricflowError, MissingVariableError, PipelineValidationError,
        ProviderError, ProviderErrorKind, TemplateError,
    };
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{
        lyrics_analysis_builder, PipelineBuilder, PipelineResult, SequentialPipeline, StageSpec,
    };
    pub use crate::prompt::PromptTemplate;
    pub use crate::providers::{
        GenerationProvider, GenerationSettings, LyricsLookup, LyricsProvider,
    };
    pub use crate::stages::{LlmStage, Stage, StageOutput};

    #[cfg(feature = "http")]
    pub use crate::providers::{GeniusClient, OpenAiClient};
}
