//! JSON transport: request description, dispatcher and transport-level errors.

pub mod http;
pub mod request;

pub use http::HttpTransport;
pub use request::{Method, RequestSpec, DEFAULT_TIMEOUT};

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("malformed response body: {0}")]
    MalformedBody(String),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Wrap a reqwest failure, surfacing elapsed deadlines as [`TransportError::Timeout`].
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else {
            TransportError::Http(err)
        }
    }
}

/// Prefix a server-relative route with the base origin.
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
