//! The `{code, message, data}` body every JSON endpoint answers with.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Business codes the backend uses for success on JSON endpoints.
///
/// Both values are emitted upstream, so both are kept.
pub const SUCCESS_CODES: [i64; 2] = [0, 200];

/// Code assumed when the body has no `code` field (e.g. framework errors
/// shaped like `{"detail": "..."}`).
pub const MISSING_CODE: i64 = -1;

fn missing_code() -> i64 {
    MISSING_CODE
}

/// `"message": null` reads as an empty message.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default = "missing_code")]
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default)]
    pub data: Value,
    /// Framework error payload: a string, or a list of validation errors
    /// each carrying a `msg`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ResponseEnvelope {
    pub fn new(code: i64, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data,
            detail: None,
        }
    }

    /// True for the two-valued success set used by JSON dispatch.
    pub fn is_success(&self) -> bool {
        is_success_code(self.code)
    }

    /// Uploads and login only accept `0`.
    pub fn is_strict_success(&self) -> bool {
        self.code == 0
    }

    /// Human-readable failure text: `message`, then a string `detail`, then
    /// the first `msg` of a validation-error list.
    pub fn user_message(&self) -> Option<&str> {
        if !self.message.is_empty() {
            return Some(&self.message);
        }
        let text = match self.detail.as_ref()? {
            Value::String(detail) => detail.as_str(),
            Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(Value::as_str))?,
            _ => return None,
        };
        Some(text).filter(|t| !t.is_empty())
    }

    pub fn detail_text(&self) -> Option<&str> {
        self.detail.as_ref().and_then(Value::as_str)
    }

    pub fn into_data(self) -> Value {
        self.data
    }
}

pub fn is_success_code(code: i64) -> bool {
    SUCCESS_CODES.contains(&code)
}
