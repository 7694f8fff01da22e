//! Song queries.

use crate::errors::LyricflowError;
use serde::{Deserialize, Serialize};

/// Song name pre-filled in the form.
pub const DEFAULT_SONG: &str = "Bulleya";

/// Artist name pre-filled in the form.
pub const DEFAULT_ARTIST: &str = "Arijit Singh";

/// A song name and artist to look up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongQuery {
    song: String,
    artist: String,
}

impl Default for SongQuery {
    fn default() -> Self {
        Self::new(DEFAULT_SONG, DEFAULT_ARTIST)
    }
}

impl SongQuery {
    /// Creates a new query. Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(song: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            song: song.into().trim().to_string(),
            artist: artist.into().trim().to_string(),
        }
    }

    /// Returns the song name.
    #[must_use]
    pub fn song(&self) -> &str {
        &self.song
    }

    /// Returns the artist name.
    #[must_use]
    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Checks that both fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` naming the first blank field.
    pub fn validate(&self) -> Result<(), LyricflowError> {
        if self.song.trim().is_empty() {
            return Err(LyricflowError::InvalidQuery("song name is required".to_string()));
        }
        if self.artist.trim().is_empty() {
            return Err(LyricflowError::InvalidQuery("artist name is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query = SongQuery::default();
        assert_eq!(query.song(), "Bulleya");
        assert_eq!(query.artist(), "Arijit Singh");
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_validate_blank_fields() {
        assert!(SongQuery::new("  ", "Arijit Singh").validate().is_err());
        assert!(SongQuery::new("Bulleya", "").validate().is_err());
    }

    #[test]
    fn test_deserialized_query_is_validated() {
        let query: SongQuery =
            serde_json::from_str(r#"{"song": "Bulleya", "artist": " "}"#).unwrap();
        assert!(query.validate().is_err());
    }
}
