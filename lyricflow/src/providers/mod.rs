//! Lyrics and text-generation providers.
//!
//! This module provides:
//! - Protocol traits for the two external services
//! - A Genius lyrics client (feature `http`)
//! - An OpenAI chat-completions client (feature `http`)

mod protocols;

#[cfg(feature = "http")]
mod genius;
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
mod openai;

pub use protocols::{
    GenerationProvider, GenerationSettings, LyricsLookup, LyricsProvider, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};

#[cfg(feature = "http")]
pub use genius::{GeniusClient, GENIUS_API_URL};
#[cfg(feature = "http")]
pub use openai::{OpenAiClient, OPENAI_BASE_URL};
