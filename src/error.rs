use crate::envelope::ResponseEnvelope;
use crate::storage::StorageError;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Configuration key that caused the error (e.g., "base_url", "KB_HTTP_TIMEOUT_SECS")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected format, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "env", "yaml")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Coarse failure category callers branch on for UI treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network unreachable, timeout, unexpected status or undecodable JSON body.
    Transport,
    /// The backend answered 401; the session has already been torn down.
    AuthExpired,
    /// Well-formed envelope whose code signals an application-level rejection.
    Business,
    /// Upload response bytes were not JSON at all.
    ResponseParse,
    /// In-memory upload source handed to a host without browser upload support.
    UnsupportedSource,
    Configuration,
    Storage,
    Io,
    Serialization,
}

/// Unified error type for the client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Session expired")]
    AuthExpired,

    #[error("Request rejected (code {}): {message}", .envelope.code)]
    Business {
        message: String,
        envelope: ResponseEnvelope,
    },

    #[error("Response parse failure: {message}")]
    ResponseParse { message: String },

    #[error("Upload source '{source_kind}' is not supported on this host")]
    UnsupportedSource { source_kind: &'static str },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Business rejection whose message falls back to `fallback` when the
    /// envelope carries neither `message` nor `detail`.
    pub fn business(envelope: ResponseEnvelope, fallback: &str) -> Self {
        let message = envelope.user_message().unwrap_or(fallback).to_string();
        Error::Business { message, envelope }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) => ErrorKind::Transport,
            Error::AuthExpired => ErrorKind::AuthExpired,
            Error::Business { .. } => ErrorKind::Business,
            Error::ResponseParse { .. } => ErrorKind::ResponseParse,
            Error::UnsupportedSource { .. } => ErrorKind::UnsupportedSource,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Storage(_) => ErrorKind::Storage,
            Error::Io(_) => ErrorKind::Io,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// The rejected envelope, for business failures.
    pub fn envelope(&self) -> Option<&ResponseEnvelope> {
        match self {
            Error::Business { envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
