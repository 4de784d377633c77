//! Multipart uploads over two interchangeable strategies.
//!
//! A device-local file path is streamed from disk by [`NativeMultipart`];
//! an in-memory file or blob is posted by [`BrowserFetchMultipart`], which
//! only browser-capable hosts allow. The strategy is picked once per call by
//! [`select_strategy`] and never revisited mid-flight. Both converge on the
//! same rule: envelope code `0` resolves, anything else is rejected with the
//! server message (or the task's fallback text).

mod browser;
mod native;

pub use browser::BrowserFetchMultipart;
pub use native::NativeMultipart;

use crate::auth::AuthStore;
use crate::envelope::ResponseEnvelope;
use crate::host::HostCapabilities;
use crate::transport::join_url;
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Multipart field that carries the file itself.
pub const FILE_FIELD: &str = "file";

const UPLOAD_FAILED: &str = "Upload failed";

#[derive(Debug, Clone)]
pub enum UploadSource {
    /// File on the device's filesystem.
    FilePath(PathBuf),
    /// Named in-memory file.
    File {
        name: String,
        mime: Option<String>,
        bytes: Bytes,
    },
    /// Anonymous in-memory bytes.
    Blob { mime: Option<String>, bytes: Bytes },
}

impl UploadSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        UploadSource::FilePath(path.into())
    }

    pub fn file(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        UploadSource::File {
            name: name.into(),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn blob(bytes: impl Into<Bytes>) -> Self {
        UploadSource::Blob {
            mime: None,
            bytes: bytes.into(),
        }
    }

    /// Attach a MIME type to an in-memory source. No-op for paths.
    pub fn with_mime(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            UploadSource::File { mime, .. } | UploadSource::Blob { mime, .. } => {
                *mime = Some(value.into())
            }
            UploadSource::FilePath(_) => {}
        }
        self
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            UploadSource::FilePath(_) => "file_path",
            UploadSource::File { .. } => "file",
            UploadSource::Blob { .. } => "blob",
        }
    }

    pub fn is_in_memory(&self) -> bool {
        !matches!(self, UploadSource::FilePath(_))
    }
}

/// One upload call. Built per call and dropped once it settles.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub source: UploadSource,
    pub target_route: String,
    pub form_fields: Vec<(String, String)>,
    /// Rejection text when the server gives no message.
    pub fallback_message: String,
}

impl UploadTask {
    pub fn new(source: UploadSource, target_route: impl Into<String>) -> Self {
        Self {
            source,
            target_route: target_route.into(),
            form_fields: Vec::new(),
            fallback_message: UPLOAD_FAILED.to_string(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_fields.push((name.into(), value.into()));
        self
    }

    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStrategy {
    NativeMultipart,
    BrowserFetchMultipart,
}

/// Pick the strategy for `source`.
///
/// Source type decides first; only the browser strategy is additionally
/// gated on host capability. An in-memory source on a host without browser
/// uploads is an error, never coerced into a path upload.
pub fn select_strategy(source: &UploadSource, capabilities: HostCapabilities) -> Result<UploadStrategy> {
    match source {
        UploadSource::FilePath(_) => Ok(UploadStrategy::NativeMultipart),
        _ if capabilities.browser_uploads => Ok(UploadStrategy::BrowserFetchMultipart),
        other => Err(Error::UnsupportedSource {
            source_kind: other.kind_name(),
        }),
    }
}

/// One way of getting a multipart body to the server.
///
/// Implementations return whatever envelope the server sent, regardless of
/// its code; [`Uploader`] settles success versus rejection.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    fn strategy(&self) -> UploadStrategy;
    async fn send(&self, url: &str, token: Option<&str>, task: &UploadTask) -> Result<ResponseEnvelope>;
}

/// Resolve code `0`, reject everything else.
pub fn settle(envelope: ResponseEnvelope, fallback: &str) -> Result<ResponseEnvelope> {
    if envelope.is_strict_success() {
        Ok(envelope)
    } else {
        Err(Error::business(envelope, fallback))
    }
}

pub struct Uploader {
    auth: Arc<AuthStore>,
    base_url: String,
    native: Arc<dyn UploadTransport>,
    browser: Arc<dyn UploadTransport>,
}

impl Uploader {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration, auth: Arc<AuthStore>) -> Self {
        Self::with_transports(
            base_url,
            auth,
            Arc::new(NativeMultipart::new(client.clone(), timeout)),
            Arc::new(BrowserFetchMultipart::new(client, timeout)),
        )
    }

    pub fn with_transports(
        base_url: impl Into<String>,
        auth: Arc<AuthStore>,
        native: Arc<dyn UploadTransport>,
        browser: Arc<dyn UploadTransport>,
    ) -> Self {
        Self {
            auth,
            base_url: base_url.into(),
            native,
            browser,
        }
    }

    pub fn select(&self, source: &UploadSource) -> Result<UploadStrategy> {
        select_strategy(source, self.auth.host().capabilities())
    }

    pub async fn upload(&self, task: UploadTask) -> Result<ResponseEnvelope> {
        let strategy = self.select(&task.source)?;
        let transport = match strategy {
            UploadStrategy::NativeMultipart => &self.native,
            UploadStrategy::BrowserFetchMultipart => &self.browser,
        };
        debug_assert_eq!(transport.strategy(), strategy, "upload transport registered in the wrong slot");
        let url = join_url(&self.base_url, &task.target_route);
        let token = self.auth.token();
        debug!(
            ?strategy,
            transport = ?transport.strategy(),
            route = %task.target_route,
            source = task.source.kind_name(),
            "upload"
        );

        let envelope = transport
            .send(&url, token.as_deref(), &task)
            .await
            .map_err(|e| {
                warn!(?strategy, route = %task.target_route, error = %e, "upload failed");
                e
            })?;
        settle(envelope, &task.fallback_message)
    }
}
