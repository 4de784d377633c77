use crate::auth::AuthStore;
use crate::client::core::KnowbaseClient;
use crate::config::ClientConfig;
use crate::host::{log_host, Host};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::transport::http::build_http_client;
use crate::transport::HttpTransport;
use crate::upload::{UploadTransport, Uploader};
use crate::Result;
use std::sync::Arc;

/// Builder for [`KnowbaseClient`].
///
/// Defaults: configuration from the environment, an in-memory session store
/// and a host that only logs.
pub struct KnowbaseClientBuilder {
    config: Option<ClientConfig>,
    store: Option<Arc<dyn KeyValueStore>>,
    host: Option<Arc<dyn Host>>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
    upload_transports: Option<(Arc<dyn UploadTransport>, Arc<dyn UploadTransport>)>,
}

impl KnowbaseClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            store: None,
            host: None,
            base_url_override: None,
            upload_transports: None,
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Durable store holding the session. Use [`crate::storage::KeyringStore`]
    /// to survive restarts.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Override the configured base URL.
    ///
    /// This is primarily for testing with mock servers.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Replace both upload strategies (native, browser).
    pub fn upload_transports(
        mut self,
        native: Arc<dyn UploadTransport>,
        browser: Arc<dyn UploadTransport>,
    ) -> Self {
        self.upload_transports = Some((native, browser));
        self
    }

    pub fn build(self) -> Result<KnowbaseClient> {
        let mut config = match self.config {
            Some(config) => config,
            None => ClientConfig::from_env()?,
        };
        if let Some(url) = self.base_url_override {
            config.base_url = url;
        }
        config.validate()?;

        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::new()),
        };
        let host = self.host.unwrap_or_else(log_host);
        let auth = Arc::new(AuthStore::new(store, host));

        let http = build_http_client(&config)?;
        let transport = Arc::new(HttpTransport::with_client(
            http.clone(),
            &config,
            Arc::clone(&auth),
        ));
        let uploader = match self.upload_transports {
            Some((native, browser)) => {
                Uploader::with_transports(config.base_url.clone(), Arc::clone(&auth), native, browser)
            }
            None => Uploader::new(
                http,
                config.base_url.clone(),
                config.long_request_timeout,
                Arc::clone(&auth),
            ),
        };

        Ok(KnowbaseClient {
            config,
            auth,
            transport,
            uploader: Arc::new(uploader),
        })
    }
}

impl Default for KnowbaseClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
