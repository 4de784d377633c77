use crate::api::{AiApi, CategoryApi, ChatApi, KnowledgeApi, MonitorApi, UploadApi, UserApi};
use crate::auth::AuthStore;
use crate::config::ClientConfig;
use crate::envelope::ResponseEnvelope;
use crate::theme::BackgroundSettings;
use crate::transport::{HttpTransport, RequestSpec};
use crate::upload::{UploadTask, Uploader};
use crate::Result;
use std::sync::Arc;

/// Entry point for everything that talks to the backend.
///
/// Owns exactly one [`AuthStore`], shared by the dispatcher and the uploader.
/// Cloning is cheap and every clone sees the same session.
#[derive(Clone)]
pub struct KnowbaseClient {
    pub(crate) config: ClientConfig,
    pub(crate) auth: Arc<AuthStore>,
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) uploader: Arc<Uploader>,
}

impl KnowbaseClient {
    pub fn builder() -> crate::client::KnowbaseClientBuilder {
        crate::client::KnowbaseClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    pub fn transport(&self) -> &Arc<HttpTransport> {
        &self.transport
    }

    pub fn uploader(&self) -> &Arc<Uploader> {
        &self.uploader
    }

    /// Send one JSON request through the auth guard.
    pub async fn dispatch(&self, spec: RequestSpec) -> Result<ResponseEnvelope> {
        self.transport.dispatch(spec).await
    }

    /// Upload through whichever strategy fits the task's source.
    pub async fn upload(&self, task: UploadTask) -> Result<ResponseEnvelope> {
        self.uploader.upload(task).await
    }

    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    pub fn categories(&self) -> CategoryApi<'_> {
        CategoryApi::new(self)
    }

    pub fn knowledge(&self) -> KnowledgeApi<'_> {
        KnowledgeApi::new(self)
    }

    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi::new(self)
    }

    pub fn ai(&self) -> AiApi<'_> {
        AiApi::new(self)
    }

    pub fn monitor(&self) -> MonitorApi<'_> {
        MonitorApi::new(self)
    }

    pub fn uploads(&self) -> UploadApi<'_> {
        UploadApi::new(self)
    }

    /// Background preference stored next to the session.
    pub fn background(&self) -> BackgroundSettings {
        BackgroundSettings::new(Arc::clone(self.auth.store()))
    }
}
