//! Web front end.
//!
//! - `GET /` renders the form with default values
//! - `POST /analyze` renders the form plus results or an error message
//! - `POST /api/analyze` returns the analysis as JSON
//! - `GET /health` returns `ok`

mod pages;
mod routes;

pub use pages::escape_html;
pub use routes::{router, AnalyzeRequest};

use crate::app::Application;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Binds `addr` and serves the router until the process exits.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, app: Arc<Application>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, router(app)).await
}
