use super::{UploadSource, UploadStrategy, UploadTask, UploadTransport, FILE_FIELD};
use crate::envelope::ResponseEnvelope;
use crate::transport::TransportError;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// Default part name for anonymous blobs.
const BLOB_NAME: &str = "blob";

/// Posts an in-memory file or blob as a multipart form and decodes the JSON
/// body directly.
pub struct BrowserFetchMultipart {
    client: reqwest::Client,
    timeout: Duration,
}

impl BrowserFetchMultipart {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn file_part(source: &UploadSource) -> Result<Part> {
        let (name, mime, bytes) = match source {
            UploadSource::File { name, mime, bytes } => (name.clone(), mime, bytes.clone()),
            UploadSource::Blob { mime, bytes } => (BLOB_NAME.to_string(), mime, bytes.clone()),
            UploadSource::FilePath(_) => {
                return Err(Error::UnsupportedSource {
                    source_kind: source.kind_name(),
                })
            }
        };

        let len = bytes.len() as u64;
        let part = Part::stream_with_length(bytes, len).file_name(name);
        match mime {
            Some(mime) => part
                .mime_str(mime)
                .map_err(|e| Error::Transport(TransportError::Other(format!("invalid mime type: {}", e)))),
            None => Ok(part),
        }
    }
}

#[async_trait]
impl UploadTransport for BrowserFetchMultipart {
    fn strategy(&self) -> UploadStrategy {
        UploadStrategy::BrowserFetchMultipart
    }

    async fn send(&self, url: &str, token: Option<&str>, task: &UploadTask) -> Result<ResponseEnvelope> {
        let mut form = Form::new().part(FILE_FIELD, Self::file_part(&task.source)?);
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

        response.json::<ResponseEnvelope>().await.map_err(|e| {
            if e.is_decode() {
                Error::ResponseParse {
                    message: format!("response parse failure: {}", e),
                }
            } else {
                Error::Transport(TransportError::from_reqwest(e, self.timeout))
            }
        })
    }
}
