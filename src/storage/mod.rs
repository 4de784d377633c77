//! Durable key-value storage backing the session and UI preferences.

mod backend;

pub use backend::{KeyValueStore, KeyringStore, MemoryStore};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("storage backend poisoned")]
    Poisoned,
}
