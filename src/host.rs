//! Host runtime integration: user-facing notices, navigation and capabilities.
//!
//! The client never draws UI itself. Anything the user should see (a
//! transient notice, a jump back to the login page) goes through [`Host`], so
//! an embedding application decides how it is rendered.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Host`] | Trait implemented by the embedding application |
//! | [`LogHost`] | Default host that writes everything to `tracing` |
//! | [`RecordingHost`] | In-memory host for tests |

use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// What the current host runtime can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostCapabilities {
    /// In-memory file/blob objects can be posted as multipart forms.
    pub browser_uploads: bool,
}

impl HostCapabilities {
    pub fn native() -> Self {
        Self {
            browser_uploads: false,
        }
    }

    pub fn browser() -> Self {
        Self {
            browser_uploads: true,
        }
    }
}

pub trait Host: Send + Sync {
    /// Show a short-lived, non-blocking notice.
    fn notify(&self, message: &str);
    /// Reset navigation to `route`.
    fn relaunch(&self, route: &str);
    fn capabilities(&self) -> HostCapabilities;
}

/// Host that only logs.
#[derive(Debug, Clone, Default)]
pub struct LogHost {
    capabilities: HostCapabilities,
}

impl LogHost {
    pub fn new(capabilities: HostCapabilities) -> Self {
        Self { capabilities }
    }
}

impl Host for LogHost {
    fn notify(&self, message: &str) {
        tracing::info!(target: "knowbase::host", "notice: {}", message);
    }
    fn relaunch(&self, route: &str) {
        tracing::info!(target: "knowbase::host", "relaunch -> {}", route);
    }
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Notice(String),
    Relaunch(String),
}

/// In-memory host for tests. Every event is stamped with the tokio clock so
/// paused-time tests can assert intervals.
#[derive(Clone, Default)]
pub struct RecordingHost {
    events: Arc<Mutex<Vec<(Instant, HostEvent)>>>,
    capabilities: HostCapabilities,
}

impl RecordingHost {
    pub fn new(capabilities: HostCapabilities) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            capabilities,
        }
    }

    pub fn events(&self) -> Vec<(Instant, HostEvent)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|(_, e)| match e {
                HostEvent::Notice(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn relaunches(&self) -> Vec<(Instant, String)> {
        self.events()
            .into_iter()
            .filter_map(|(at, e)| match e {
                HostEvent::Relaunch(r) => Some((at, r)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: HostEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push((Instant::now(), event));
        }
    }
}

impl Host for RecordingHost {
    fn notify(&self, message: &str) {
        self.push(HostEvent::Notice(message.to_string()));
    }
    fn relaunch(&self, route: &str) {
        self.push(HostEvent::Relaunch(route.to_string()));
    }
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }
}

pub fn log_host() -> Arc<dyn Host> {
    Arc::new(LogHost::default())
}
