//! Lyrics Genre Classifier web server.

use anyhow::{Context as _, Result};
use lyricflow::app::Application;
use lyricflow::config::AppConfig;
use lyricflow::events::LoggingEventSink;
use lyricflow::observability::init_logging;
use lyricflow::pipeline::lyrics_analysis_builder;
use lyricflow::providers::{GeniusClient, OpenAiClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_logging(config.verbose)?;

    tracing::info!(
        model = %config.generation.model,
        temperature = config.generation.temperature,
        "Starting lyricflow"
    );

    let mut http = reqwest::Client::builder()
        .user_agent(concat!("lyricflow/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = config.timeout {
        http = http.timeout(timeout);
    }
    let http = http.build().context("failed to build HTTP client")?;

    let mut openai = OpenAiClient::new(
        config.secrets.openai_api_key.clone(),
        config.generation.clone(),
        http.clone(),
    );
    if let Some(base_url) = &config.openai_base_url {
        openai = openai.with_base_url(base_url.clone());
    }
    let genius = GeniusClient::new(config.secrets.genius_api_key.clone(), http);

    let pipeline = lyrics_analysis_builder(Arc::new(openai))?
        .event_sink(Arc::new(LoggingEventSink::debug()))
        .verbose(config.verbose)
        .build()?;

    let app = Arc::new(Application::new(Arc::new(genius), pipeline));

    lyricflow::server::serve(config.bind, app)
        .await
        .context("server error")
}
