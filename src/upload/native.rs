use super::{UploadSource, UploadStrategy, UploadTask, UploadTransport, FILE_FIELD};
use crate::envelope::ResponseEnvelope;
use crate::transport::TransportError;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::warn;

/// Streams a device-local file as the `file` part.
///
/// The response body is read as text and parsed as JSON here; bytes that are
/// not JSON are a [`Error::ResponseParse`], distinct from a business rejection.
pub struct NativeMultipart {
    client: reqwest::Client,
    timeout: Duration,
}

impl NativeMultipart {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn file_part(path: &Path) -> std::result::Result<Part, TransportError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| TransportError::Other(format!("cannot open {}: {}", path.display(), e)))?;
        let len = file
            .metadata()
            .await
            .map_err(|e| TransportError::Other(format!("cannot stat {}: {}", path.display(), e)))?
            .len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| FILE_FIELD.to_string());

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        Ok(Part::stream_with_length(body, len).file_name(name))
    }
}

/// Parse the raw text body of a native upload.
pub(crate) fn parse_text_body(text: &str) -> Result<ResponseEnvelope> {
    serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "upload response is not JSON");
        Error::ResponseParse {
            message: format!("response parse failure: {}", e),
        }
    })
}

#[async_trait]
impl UploadTransport for NativeMultipart {
    fn strategy(&self) -> UploadStrategy {
        UploadStrategy::NativeMultipart
    }

    async fn send(&self, url: &str, token: Option<&str>, task: &UploadTask) -> Result<ResponseEnvelope> {
        let path = match &task.source {
            UploadSource::FilePath(path) => path,
            other => {
                return Err(Error::UnsupportedSource {
                    source_kind: other.kind_name(),
                })
            }
        };

        let mut form = Form::new().part(FILE_FIELD, Self::file_part(path).await?);
        for (name, value) in &task.form_fields {
            form = form.text(name.clone(), value.clone());
        }

        let mut request = self.client.post(url).multipart(form).timeout(self.timeout);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;
        parse_text_body(&text)
    }
}
