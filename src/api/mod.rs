//! Per-domain endpoint groups.
//!
//! Thin wrappers over [`crate::transport::HttpTransport::dispatch`] and
//! [`crate::upload::Uploader::upload`]. JSON calls resolve with the envelope's
//! `data`; uploads resolve with the whole envelope.

mod ai;
mod category;
mod chat;
mod knowledge;
mod monitor;
mod upload;
mod user;

pub use ai::AiApi;
pub use category::CategoryApi;
pub use chat::ChatApi;
pub use knowledge::KnowledgeApi;
pub use monitor::MonitorApi;
pub use upload::{UploadApi, DEFAULT_FILE_PROMPT, DEFAULT_FOLDER, DEFAULT_IMAGE_PROMPT};
pub use user::UserApi;
