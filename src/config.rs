//! Client configuration.
//!
//! Defaults come from the selected [`Environment`]. They can be overridden
//! from environment variables ([`ClientConfig::from_env`]) or from a YAML
//! file ([`ClientConfig::from_yaml_file`]).
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `KB_ENV` | `development` or `production` |
//! | `KB_API_BASE_URL` | HTTP origin of the backend |
//! | `KB_WS_URL` | WebSocket origin |
//! | `KB_HTTP_TIMEOUT_SECS` | default JSON deadline (30) |
//! | `KB_HTTP_LONG_TIMEOUT_SECS` | deadline for slow endpoints and uploads (60) |
//! | `KB_PROXY_URL` | proxy for all traffic |

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:8080",
            Environment::Production => "https://z.arshop.top",
        }
    }

    pub fn ws_url(&self) -> &'static str {
        match self {
            Environment::Development => "ws://localhost:8080",
            Environment::Production => "wss://z.arshop.top",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// Model defaults sent with AI requests when the caller does not choose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDefaults {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl AiDefaults {
    /// Fill `model`, `max_tokens` and `temperature` into an object payload
    /// where the caller left them out or null. Other payloads pass through.
    pub fn apply_to(&self, payload: &mut serde_json::Value) {
        let Some(map) = payload.as_object_mut() else {
            return;
        };
        let defaults = [
            ("model", serde_json::Value::from(self.model.as_str())),
            ("max_tokens", serde_json::Value::from(self.max_tokens)),
            ("temperature", serde_json::Value::from(self.temperature)),
        ];
        for (key, value) in defaults {
            let slot = map.entry(key).or_insert(serde_json::Value::Null);
            if slot.is_null() {
                *slot = value;
            }
        }
    }
}

impl Default for AiDefaults {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

/// Knowledge-base limits mirrored from the backend. The client sends nothing
/// based on these; they are exported so embedders can size editors and
/// validate input before a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDefaults {
    pub max_content_length: usize,
    pub embedding_dimension: usize,
}

impl Default for KnowledgeDefaults {
    fn default() -> Self {
        Self {
            max_content_length: 10_000,
            embedding_dimension: 1536,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    pub base_url: String,
    /// WebSocket origin for embedders that open a live channel. This crate
    /// only speaks HTTP and never dials it.
    pub ws_url: String,
    /// Default deadline for JSON calls.
    pub request_timeout: Duration,
    /// Deadline for calls that fetch web pages server-side, and for uploads.
    pub long_request_timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub proxy_url: Option<String>,
    pub ai: AiDefaults,
    pub knowledge: KnowledgeDefaults,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// On-disk shape; every field is optional and layered over the environment defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    environment: Option<Environment>,
    base_url: Option<String>,
    ws_url: Option<String>,
    request_timeout_secs: Option<u64>,
    long_request_timeout_secs: Option<u64>,
    proxy_url: Option<String>,
    ai: Option<AiDefaults>,
    knowledge: Option<KnowledgeDefaults>,
}

impl ClientConfig {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            base_url: environment.base_url().to_string(),
            ws_url: environment.ws_url().to_string(),
            request_timeout: Duration::from_secs(30),
            long_request_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 32,
            proxy_url: None,
            ai: AiDefaults::default(),
            knowledge: KnowledgeDefaults::default(),
        }
    }

    /// Development defaults pointed at `base_url` (tests, local servers).
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::for_environment(Environment::Development)
        }
    }

    pub fn from_env() -> Result<Self> {
        let environment = match env::var("KB_ENV") {
            Ok(raw) => Environment::parse(&raw).ok_or_else(|| {
                Error::configuration_with_context(
                    format!("unknown environment '{}'", raw),
                    ErrorContext::new()
                        .with_field_path("KB_ENV")
                        .with_details("expected development or production")
                        .with_source("env"),
                )
            })?,
            Err(_) => Environment::default(),
        };

        let mut config = Self::for_environment(environment);
        if let Ok(url) = env::var("KB_API_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(url) = env::var("KB_WS_URL") {
            config.ws_url = url;
        }
        if let Some(secs) = env_secs("KB_HTTP_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_secs("KB_HTTP_LONG_TIMEOUT_SECS") {
            config.long_request_timeout = Duration::from_secs(secs);
        }
        config.proxy_url = env::var("KB_PROXY_URL").ok();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                "invalid configuration file",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("yaml"),
            )
        })?;

        let mut config = Self::for_environment(file.environment.unwrap_or_default());
        if let Some(url) = file.base_url {
            config.base_url = url;
        }
        if let Some(url) = file.ws_url {
            config.ws_url = url;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.long_request_timeout_secs {
            config.long_request_timeout = Duration::from_secs(secs);
        }
        config.proxy_url = file.proxy_url;
        if let Some(ai) = file.ai {
            config.ai = ai;
        }
        if let Some(knowledge) = file.knowledge {
            config.knowledge = knowledge;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Reject origins that are not absolute http(s) URLs and zero deadlines.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                "invalid base url",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string()),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                "base url must be http or https",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(url.scheme().to_string()),
            ));
        }
        if self.request_timeout.is_zero() || self.long_request_timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "timeouts must be positive",
                ErrorContext::new().with_field_path("request_timeout"),
            ));
        }
        Ok(())
    }
}

fn env_secs(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.parse::<u64>().ok())
}
