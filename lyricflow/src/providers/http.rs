//! Shared HTTP plumbing for the provider clients.

use crate::errors::{ProviderError, ProviderErrorKind};

/// Longest error body kept in a provider error message.
const MAX_ERROR_BODY: usize = 500;

/// Converts a transport failure into a provider error.
pub(crate) fn transport_error(provider: &str, err: &reqwest::Error) -> ProviderError {
    let kind = err
        .status()
        .map_or(ProviderErrorKind::Network, |status| {
            ProviderErrorKind::from_status(status.as_u16())
        });
    ProviderError::new(provider, kind, err.to_string())
}

/// Passes successful responses through and classifies the rest.
pub(crate) async fn check_status(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(MAX_ERROR_BODY).collect();
    Err(ProviderError::new(
        provider,
        ProviderErrorKind::from_status(status.as_u16()),
        if body.is_empty() { status.to_string() } else { body },
    ))
}
