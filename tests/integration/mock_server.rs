//! Mock HTTP server setup for integration tests

use knowbase_client::{
    ClientConfig, HostCapabilities, KnowbaseClient, MemoryStore, RecordingHost,
};
use mockito::{Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test fixture that manages a mock server and a client wired to it
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub store: Arc<MemoryStore>,
    pub host: RecordingHost,
    pub client: KnowbaseClient,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        Self::with_capabilities(HostCapabilities::native()).await
    }

    pub async fn browser() -> Self {
        Self::with_capabilities(HostCapabilities::browser()).await
    }

    pub async fn with_capabilities(capabilities: HostCapabilities) -> Self {
        let server = Server::new_async().await;
        let store = Arc::new(MemoryStore::new());
        let host = RecordingHost::new(capabilities);
        let client = client_for(&server.url(), store.clone(), host.clone());
        Self {
            server,
            store,
            host,
            client,
        }
    }

    /// Persist a session as a successful login would.
    pub fn sign_in(&self, token: &str) {
        self.client
            .auth()
            .save_session(token, Some(&json!({"id": 1, "username": "lin"})))
            .expect("save session");
    }

    pub fn token(&self) -> Option<String> {
        self.client.auth().token()
    }
}

pub fn client_for(base_url: &str, store: Arc<MemoryStore>, host: RecordingHost) -> KnowbaseClient {
    KnowbaseClient::builder()
        .config(ClientConfig::for_base_url(base_url))
        .store(store)
        .host(Arc::new(host))
        .build()
        .expect("Failed to build client")
}

/// A server that accepts connections and never answers.
pub async fn silent_server() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    (format!("http://{}", addr), handle)
}

/// An address nothing listens on.
pub async fn refused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn envelope(code: i64, message: &str, data: serde_json::Value) -> String {
    json!({"code": code, "message": message, "data": data}).to_string()
}
