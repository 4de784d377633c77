//! Persisted page background preference.

use crate::storage::KeyValueStore;
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const BACKGROUND_KEY: &str = "user_background_setting";

const DEFAULT_COLOR: &str = "#ffffff";

static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSetting {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub value: String,
}

impl Default for BackgroundSetting {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Partial update; missing fields fall back to the default setting.
#[derive(Debug, Clone, Default)]
pub struct BackgroundUpdate {
    pub kind: Option<BackgroundKind>,
    pub value: Option<String>,
}

/// Resolved style properties for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundStyle {
    Image {
        image: String,
        size: &'static str,
        position: &'static str,
        repeat: &'static str,
        color: &'static str,
    },
    /// Plain colour or gradient.
    Plain { background: String },
}

/// Whether a background value points at an image rather than a colour.
pub fn is_image_value(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    HTTP_URL.is_match(value)
        || ["data:", "file:", "/", "blob:"]
            .iter()
            .any(|p| value.starts_with(p))
        || value.contains("tmp/")
        || value.contains("temp/")
}

pub struct BackgroundSettings {
    store: Arc<dyn KeyValueStore>,
}

impl BackgroundSettings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored setting, or the default when missing or unreadable.
    pub fn get(&self) -> BackgroundSetting {
        self.store
            .get(BACKGROUND_KEY)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn set(&self, update: BackgroundUpdate) -> Result<BackgroundSetting> {
        let value = update.value.unwrap_or_else(|| DEFAULT_COLOR.to_string());
        let kind = update.kind.unwrap_or_else(|| {
            if is_image_value(&value) {
                BackgroundKind::Image
            } else {
                BackgroundKind::Color
            }
        });
        let setting = BackgroundSetting { kind, value };
        self.store
            .set(BACKGROUND_KEY, &serde_json::to_string(&setting)?)?;
        Ok(setting)
    }

    pub fn style(&self) -> BackgroundStyle {
        let setting = self.get();
        let value = if setting.value.is_empty() {
            DEFAULT_COLOR.to_string()
        } else {
            setting.value
        };
        if setting.kind == BackgroundKind::Image || is_image_value(&value) {
            BackgroundStyle::Image {
                image: format!("url({})", value),
                size: "cover",
                position: "center",
                repeat: "no-repeat",
                color: DEFAULT_COLOR,
            }
        } else {
            BackgroundStyle::Plain { background: value }
        }
    }
}
