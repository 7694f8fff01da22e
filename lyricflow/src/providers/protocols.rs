//! Protocol traits for the external services.
//!
//! Both services are reached only through these traits so the pipeline and
//! the application can be driven by scripted providers in tests.

use crate::errors::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Fixed model parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationSettings {
    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Protocol for text generation.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Sends a prompt and returns the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Outcome of a lyrics search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsLookup {
    /// Lyrics for the best-matching song.
    Found(String),
    /// No song matched, or it had no usable lyrics.
    NotFound,
}

impl LyricsLookup {
    /// Returns the lyrics, or `fallback` when nothing usable was found.
    ///
    /// Whitespace-only lyrics count as not found.
    #[must_use]
    pub fn text_or(self, fallback: &str) -> String {
        match self {
            Self::Found(text) if !text.trim().is_empty() => text,
            _ => fallback.to_string(),
        }
    }

    /// Returns true if lyrics were found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Protocol for lyrics lookup.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Searches for the best match for `title` by `artist`.
    async fn search_song(&self, title: &str, artist: &str) -> Result<LyricsLookup, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.model, "gpt-4-1106-preview");
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_settings_builders() {
        let settings = GenerationSettings::default()
            .with_model("gpt-4o")
            .with_temperature(0.2);
        assert_eq!(settings.model, "gpt-4o");
        assert!((settings.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_lookup_text_or() {
        assert_eq!(LyricsLookup::Found("la".into()).text_or("none"), "la");
        assert_eq!(LyricsLookup::Found("  \n".into()).text_or("none"), "none");
        assert_eq!(LyricsLookup::NotFound.text_or("none"), "none");
        assert!(!LyricsLookup::NotFound.is_found());
    }
}
