//! Session ownership: persisted token and profile, teardown on expiry, login.
//!
//! [`AuthStore`] is the only writer of the persisted session. The dispatcher
//! and the uploader hold an `Arc<AuthStore>` and read the token on every call
//! instead of caching it.

mod login;

pub use login::{Credentials, LOGIN_PATH};

use crate::host::Host;
use crate::storage::KeyValueStore;
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_INFO_KEY: &str = "userInfo";

/// Entry point the host navigates to after teardown.
pub const LOGIN_ROUTE: &str = "/pages/login/index";

/// Delay between the expiry notice and the redirect, so the notice is seen.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub const SESSION_EXPIRED_NOTICE: &str = "Session expired, please sign in again";

pub struct AuthStore {
    store: Arc<dyn KeyValueStore>,
    host: Arc<dyn Host>,
}

impl AuthStore {
    pub fn new(store: Arc<dyn KeyValueStore>, host: Arc<dyn Host>) -> Self {
        Self { store, host }
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Current token, read straight from storage. Empty values count as absent.
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "failed to read token");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Cached user profile. A corrupt value reads as absent.
    pub fn user_profile(&self) -> Option<Value> {
        let raw = self.store.get(USER_INFO_KEY).ok()??;
        serde_json::from_str(&raw).ok()
    }

    pub fn save_session(&self, token: &str, profile: Option<&Value>) -> Result<()> {
        self.store.set(TOKEN_KEY, token)?;
        match profile {
            Some(profile) => self.store.set(USER_INFO_KEY, &serde_json::to_string(profile)?)?,
            None => self.store.remove(USER_INFO_KEY)?,
        }
        Ok(())
    }

    /// Forget the session without notifying or navigating (explicit logout).
    pub fn clear_session(&self) {
        for key in [TOKEN_KEY, USER_INFO_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(store = self.store.name(), key, error = %e, "failed to clear session key");
            }
        }
    }

    /// Expired-session teardown: clear storage, notify, then relaunch to the
    /// login route after [`REDIRECT_DELAY`].
    ///
    /// Must be called inside a tokio runtime. The returned handle completes
    /// once the redirect has been issued.
    pub fn teardown(&self) -> JoinHandle<()> {
        info!("tearing down expired session");
        self.clear_session();
        self.host.notify(SESSION_EXPIRED_NOTICE);

        let host = Arc::clone(&self.host);
        tokio::spawn(async move {
            tokio::time::sleep(REDIRECT_DELAY).await;
            host.relaunch(LOGIN_ROUTE);
        })
    }
}
