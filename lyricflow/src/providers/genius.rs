//! Genius lyrics client.
//!
//! Search goes through the authenticated API; the lyrics themselves are
//! scraped from the song page because the API does not return them.

use super::http::{check_status, transport_error};
use super::protocols::{LyricsLookup, LyricsProvider};
use crate::errors::ProviderError;
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Node, Selector};
use serde::Deserialize;
use std::sync::OnceLock;

/// Default API base URL.
pub const GENIUS_API_URL: &str = "https://api.genius.com";

const PROVIDER: &str = "genius";
const LYRICS_SELECTOR: &str = r#"div[data-lyrics-container="true"]"#;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchHit {
    #[serde(rename = "type")]
    hit_type: String,
    result: SongHit,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SongHit {
    title: String,
    url: String,
    primary_artist: Artist,
    #[serde(default)]
    lyrics_state: Option<String>,
    #[serde(default)]
    instrumental: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Artist {
    name: String,
}

/// Lyrics provider backed by Genius.
#[derive(Clone)]
pub struct GeniusClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl std::fmt::Debug for GeniusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeniusClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GeniusClient {
    /// Creates a client sharing the given HTTP client.
    #[must_use]
    pub fn new(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            api_url: GENIUS_API_URL.to_string(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/search", self.api_url))
            .bearer_auth(&self.api_key)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;

        let body = check_status(PROVIDER, response)
            .await?
            .text()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(PROVIDER, format!("invalid search JSON: {e}")))?;
        Ok(parsed.response.hits)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;

        check_status(PROVIDER, response)
            .await?
            .text()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn search_song(&self, title: &str, artist: &str) -> Result<LyricsLookup, ProviderError> {
        let query = format!("{title} {artist}");
        let hits = self.search(query.trim()).await?;

        let Some(song) = best_match(&hits, title, artist) else {
            tracing::info!(title, artist, "No Genius search hits");
            return Ok(LyricsLookup::NotFound);
        };

        if song.instrumental || song.lyrics_state.as_deref().is_some_and(|s| s != "complete") {
            tracing::info!(title = %song.title, "Genius song has no complete lyrics");
            return Ok(LyricsLookup::NotFound);
        }

        tracing::debug!(url = %song.url, "Fetching lyrics page");
        let html = self.fetch_page(&song.url).await?;

        Ok(match extract_lyrics(&html)? {
            Some(lyrics) => LyricsLookup::Found(lyrics),
            None => LyricsLookup::NotFound,
        })
    }
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Picks the best song hit for a title and artist.
///
/// Preference: title and artist match, then title match, then the first
/// song hit.
pub(crate) fn best_match<'a>(hits: &'a [SearchHit], title: &str, artist: &str) -> Option<&'a SongHit> {
    let title = normalize(title);
    let artist = normalize(artist);
    let songs: Vec<&SongHit> = hits
        .iter()
        .filter(|hit| hit.hit_type == "song")
        .map(|hit| &hit.result)
        .collect();

    let title_matches = |song: &SongHit| normalize(&song.title) == title;
    let artist_matches = |song: &SongHit| normalize(&song.primary_artist.name) == artist;

    songs
        .iter()
        .copied()
        .find(|song| title_matches(song) && artist_matches(song))
        .or_else(|| songs.iter().copied().find(|song| title_matches(song)))
        .or_else(|| songs.first().copied())
}

fn section_header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^[ \t]*\[[^\]\n]*\][ \t]*\n?").expect("valid section header pattern"))
}

fn blank_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n{3,}").expect("valid blank run pattern"))
}

/// Removes `[Verse 1]`-style header lines and squeezes blank runs.
pub(crate) fn remove_section_headers(lyrics: &str) -> String {
    let without_headers = section_header_pattern().replace_all(lyrics, "");
    blank_run_pattern()
        .replace_all(&without_headers, "\n\n")
        .trim()
        .to_string()
}

/// Extracts lyrics text from a Genius song page.
///
/// Returns `None` if the page has no lyrics containers or they are empty.
pub(crate) fn extract_lyrics(html: &str) -> Result<Option<String>, ProviderError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(LYRICS_SELECTOR)
        .map_err(|e| ProviderError::malformed(PROVIDER, format!("invalid selector: {e:?}")))?;

    let mut raw = String::new();
    for container in document.select(&selector) {
        for node in container.descendants() {
            let excluded = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| el.attr("data-exclude-from-selection") == Some("true"))
            });
            if excluded {
                continue;
            }
            match node.value() {
                Node::Text(text) => raw.push_str(text),
                Node::Element(el) if el.name() == "br" => raw.push('\n'),
                _ => {}
            }
        }
        raw.push('\n');
    }

    let cleaned = remove_section_headers(&raw);
    Ok(if cleaned.is_empty() { None } else { Some(cleaned) })
}
