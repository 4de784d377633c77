//! # knowbase-client
//!
//! Client SDK for the Knowbase backend: chat, knowledge entries, categories,
//! AI helpers and user management over one authenticated transport.
//!
//! ## Overview
//!
//! Every endpoint is a thin caller of two operations:
//!
//! - [`HttpTransport::dispatch`] sends a JSON request, attaches the bearer
//!   token, applies the per-call deadline and classifies the result.
//! - [`Uploader::upload`] sends a multipart body, streaming device files
//!   natively or posting in-memory files/blobs on browser-capable hosts.
//!
//! A 401 anywhere in dispatch tears the session down (clear storage, notify,
//! redirect to login 1.5 s later) before the error reaches the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use knowbase_client::{ClientConfig, Credentials, KnowbaseClient};
//!
//! #[tokio::main]
//! async fn main() -> knowbase_client::Result<()> {
//!     let client = KnowbaseClient::builder()
//!         .config(ClientConfig::default())
//!         .build()?;
//!
//!     client.user().login(&Credentials::new("lin", "secret")).await?;
//!     let categories = client.categories().list().await?;
//!     println!("{categories}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transport`] | JSON dispatcher, request description, transport errors |
//! | [`classify`] | Status/body to outcome decision table |
//! | [`auth`] | Persisted session, teardown, login |
//! | [`upload`] | Upload strategies and selector |
//! | [`api`] | Per-domain endpoint groups |
//! | [`storage`] | Key-value backends (memory, keyring) |
//! | [`host`] | Notices, navigation and host capabilities |
//! | [`config`] | Environment, timeouts, defaults |
//! | [`theme`] | Persisted background preference |

pub mod api;
pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod envelope;
pub mod host;
pub mod storage;
pub mod theme;
pub mod transport;
pub mod upload;

pub use auth::{AuthStore, Credentials};
pub use classify::{classify, ClassifiedOutcome};
pub use client::{KnowbaseClient, KnowbaseClientBuilder};
pub use config::{ClientConfig, Environment};
pub use envelope::ResponseEnvelope;
pub use host::{Host, HostCapabilities, LogHost, RecordingHost};
pub use storage::{KeyValueStore, KeyringStore, MemoryStore};
pub use transport::{HttpTransport, Method, RequestSpec, TransportError};
pub use upload::{UploadSource, UploadStrategy, UploadTask, UploadTransport, Uploader};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};
