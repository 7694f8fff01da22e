//! Loopback HTTP servers for exercising the provider clients.

use axum::Router;
use tokio::net::TcpListener;

/// Binds an ephemeral loopback port, returning the listener and its base URL.
pub async fn local_listener() -> std::io::Result<(TcpListener, String)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);
    Ok((listener, base))
}

/// Serves `router` on `listener` in a background task.
pub fn serve_on(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::warn!("Test server stopped: {}", e);
        }
    });
}

/// Serves `router` on a fresh loopback port and returns its base URL.
pub async fn spawn_router(router: Router) -> std::io::Result<String> {
    let (listener, base) = local_listener().await?;
    serve_on(listener, router);
    Ok(base)
}
