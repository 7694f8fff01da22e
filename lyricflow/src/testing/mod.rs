//! Testing utilities for lyricflow pipelines.
//!
//! This module provides:
//! - Scripted generation and lyrics providers
//! - Local HTTP server helpers (feature `server`)

mod mocks;

pub use mocks::{ScriptedGenerationProvider, StaticLyricsProvider};

#[cfg(feature = "server")]
mod server;

#[cfg(feature = "server")]
pub use server::{local_listener, serve_on, spawn_router};
