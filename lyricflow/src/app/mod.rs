//! The lyrics analysis application.
//!
//! [`Application`] fetches lyrics for a song, runs them through the
//! analysis pipeline and shapes the outcome for display.

mod query;

pub use query::{SongQuery, DEFAULT_ARTIST, DEFAULT_SONG};

use crate::errors::LyricflowError;
use crate::pipeline::{SequentialPipeline, GENRE_KEY, LYRICS_KEY, SUMMARY_KEY};
use crate::providers::LyricsProvider;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Shown in place of lyrics when no usable match exists.
pub const LYRICS_NOT_FOUND: &str = "Lyrics not found.";

/// Lyrics plus the generated summary and genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Lyrics text, or [`LYRICS_NOT_FOUND`].
    pub lyrics: String,
    /// Generated summary.
    pub summary: String,
    /// Predicted genre.
    pub genre: String,
}

/// What the user sees after an analysis attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisView {
    /// Every section is available.
    Ready(Analysis),
    /// Something failed; only the message is shown.
    Failed {
        /// The generic error message.
        message: String,
    },
}

/// Wires the lyrics provider to the analysis pipeline.
#[derive(Clone)]
pub struct Application {
    lyrics: Arc<dyn LyricsProvider>,
    pipeline: SequentialPipeline,
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("lyrics", &self.lyrics.name())
            .field("pipeline", &self.pipeline.name())
            .finish()
    }
}

impl Application {
    /// Creates a new application.
    #[must_use]
    pub fn new(lyrics: Arc<dyn LyricsProvider>, pipeline: SequentialPipeline) -> Self {
        Self { lyrics, pipeline }
    }

    /// Returns the analysis pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &SequentialPipeline {
        &self.pipeline
    }

    /// Looks up lyrics, substituting [`LYRICS_NOT_FOUND`] when there is no
    /// usable match.
    ///
    /// # Errors
    ///
    /// Returns the provider error if the lookup itself fails.
    pub async fn fetch_lyrics(&self, query: &SongQuery) -> Result<String, LyricflowError> {
        let lookup = self.lyrics.search_song(query.song(), query.artist()).await?;
        if !lookup.is_found() {
            tracing::info!(song = query.song(), artist = query.artist(), "No lyrics found");
        }
        Ok(lookup.text_or(LYRICS_NOT_FOUND))
    }

    /// Validates the query, fetches lyrics and runs the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery`, a lyrics provider error, or the first
    /// pipeline failure.
    pub async fn analyze(&self, query: &SongQuery) -> Result<Analysis, LyricflowError> {
        query.validate()?;

        let lyrics = self.fetch_lyrics(query).await?;
        let result = self.pipeline.run([(LYRICS_KEY, lyrics.as_str())]).await?;

        let field = |key: &str| {
            result
                .get(key)
                .map(str::to_string)
                .ok_or_else(|| LyricflowError::Internal(format!("pipeline produced no '{key}'")))
        };

        Ok(Analysis {
            summary: field(SUMMARY_KEY)?,
            genre: field(GENRE_KEY)?,
            lyrics,
        })
    }

    /// Like [`analyze`](Self::analyze) but folds any error into a single
    /// user-facing message.
    pub async fn analyze_for_display(&self, query: &SongQuery) -> AnalysisView {
        match self.analyze(query).await {
            Ok(analysis) => AnalysisView::Ready(analysis),
            Err(err) => {
                tracing::error!(error = %err, "Analysis failed");
                AnalysisView::Failed {
                    message: format!("Something went wrong: {err}"),
                }
            }
        }
    }
}
