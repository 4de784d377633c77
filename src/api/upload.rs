use crate::client::KnowbaseClient;
use crate::envelope::ResponseEnvelope;
use crate::upload::{UploadSource, UploadTask};
use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use std::path::PathBuf;

pub const DEFAULT_FOLDER: &str = "avatar";
pub const DEFAULT_IMAGE_PROMPT: &str = "Describe the content of this image";
pub const DEFAULT_FILE_PROMPT: &str = "Describe the content of this file";

pub struct UploadApi<'a> {
    client: &'a KnowbaseClient,
}

impl<'a> UploadApi<'a> {
    pub(crate) fn new(client: &'a KnowbaseClient) -> Self {
        Self { client }
    }

    /// Store a device file in object storage (avatars and the like).
    pub async fn upload_file(&self, path: impl Into<PathBuf>, folder: Option<&str>) -> Result<ResponseEnvelope> {
        let task = UploadTask::new(UploadSource::path(path), "/api/upload/file-to-cos")
            .field("folder", folder.unwrap_or(DEFAULT_FOLDER))
            .fallback_message("Upload failed");
        self.client.uploader.upload(task).await
    }

    /// Have the server describe an image.
    pub async fn parse_image(&self, source: UploadSource, prompt: Option<&str>) -> Result<ResponseEnvelope> {
        let task = UploadTask::new(source, "/api/upload/image")
            .field("prompt", prompt.unwrap_or(DEFAULT_IMAGE_PROMPT))
            .fallback_message("Image parsing failed");
        self.client.uploader.upload(task).await
    }

    /// Have the server extract and describe a document.
    pub async fn parse_file(&self, source: UploadSource, prompt: Option<&str>) -> Result<ResponseEnvelope> {
        let task = UploadTask::new(source, "/api/upload/file")
            .field("prompt", prompt.unwrap_or(DEFAULT_FILE_PROMPT))
            .fallback_message("File parsing failed");
        self.client.uploader.upload(task).await
    }

    /// Upload raw bytes as base64 JSON. This endpoint is plain JSON, so it
    /// goes through the dispatcher rather than the multipart uploader.
    pub async fn upload_file_to_cos(
        &self,
        bytes: &[u8],
        filename: &str,
        file_type: &str,
        description: Option<&str>,
    ) -> Result<ResponseEnvelope> {
        let payload = json!({
            "file_data": STANDARD.encode(bytes),
            "filename": filename,
            "file_type": file_type,
            "description": description.unwrap_or(""),
        });
        self.client.transport.post("/api/upload/to-cos", payload).await
    }
}
