//! Scripted providers for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::errors::ProviderError;
use crate::providers::{GenerationProvider, LyricsLookup, LyricsProvider};

/// A generation provider that replays scripted results in order and
/// records every prompt it receives.
#[derive(Debug, Default)]
pub struct ScriptedGenerationProvider {
    results: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerationProvider {
    /// Creates a provider that returns each response once, in order.
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::from_results(responses.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Creates a provider from explicit successes and failures.
    #[must_use]
    pub fn from_results(results: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns every prompt received so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedGenerationProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().push(prompt.to_string());
        self.results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::malformed("scripted", "no scripted response left")))
    }
}

/// A lyrics provider that always returns the same result.
#[derive(Debug)]
pub struct StaticLyricsProvider {
    result: Result<LyricsLookup, ProviderError>,
    queries: Mutex<Vec<(String, String)>>,
}

impl StaticLyricsProvider {
    /// Always finds the given lyrics.
    #[must_use]
    pub fn found(lyrics: impl Into<String>) -> Self {
        Self::with_result(Ok(LyricsLookup::Found(lyrics.into())))
    }

    /// Never finds anything.
    #[must_use]
    pub fn not_found() -> Self {
        Self::with_result(Ok(LyricsLookup::NotFound))
    }

    /// Always fails with the given error.
    #[must_use]
    pub fn failing(error: ProviderError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<LyricsLookup, ProviderError>) -> Self {
        Self {
            result,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Returns every `(title, artist)` searched so far.
    #[must_use]
    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl LyricsProvider for StaticLyricsProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn search_song(&self, title: &str, artist: &str) -> Result<LyricsLookup, ProviderError> {
        self.queries
            .lock()
            .push((title.to_string(), artist.to_string()));
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_in_order_then_exhausted() {
        let provider = ScriptedGenerationProvider::new(["one", "two"]);
        assert_eq!(provider.generate("a").await.unwrap(), "one");
        assert_eq!(provider.generate("b").await.unwrap(), "two");
        assert!(provider.generate("c").await.is_err());
        assert_eq!(provider.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_static_lyrics_records_queries() {
        let provider = StaticLyricsProvider::not_found();
        let lookup = provider.search_song("Song", "Artist").await.unwrap();
        assert_eq!(lookup, LyricsLookup::NotFound);
        assert_eq!(provider.queries(), vec![("Song".to_string(), "Artist".to_string())]);
    }
}
