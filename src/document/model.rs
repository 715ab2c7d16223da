use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Backend of a history store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    SessionBuffer,
    File,
    Sqlite,
    Postgresql,
    Redis,
}

impl StoreType {
    /// Parses a store tag, accepting exported class names such as `SQLiteHistoryStore`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.to_lowercase().replace("historystore", "");
        match normalized.trim_matches('_') {
            "session_buffer" | "sessionbuffer" | "session" => Some(StoreType::SessionBuffer),
            "file" => Some(StoreType::File),
            "sqlite" => Some(StoreType::Sqlite),
            "postgresql" | "postgres" => Some(StoreType::Postgresql),
            "redis" => Some(StoreType::Redis),
            _ => None,
        }
    }

    /// Reads `store_type` (or the legacy `type`) from a history payload.
    pub fn of_payload(history: &Value) -> Option<Self> {
        history
            .get("store_type")
            .or_else(|| history.get("type"))
            .and_then(Value::as_str)
            .and_then(Self::from_tag)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StoreType::SessionBuffer => "Session Buffer",
            StoreType::File => "File",
            StoreType::Sqlite => "SQLite",
            StoreType::Postgresql => "PostgreSQL",
            StoreType::Redis => "Redis",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The model an agent or router is bound to: a provider class plus a model name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelBinding {
    #[serde(rename = "type", default)]
    pub provider: String,
    #[serde(default)]
    pub model_name: String,
}

impl ModelBinding {
    pub fn of_payload(payload: &Value) -> Option<Self> {
        payload
            .get("model")
            .filter(|m| m.is_object())
            .and_then(|m| serde_json::from_value(m.clone()).ok())
    }

    /// Provider name without the `Model` class suffix, e.g. `GroqModel` -> `Groq`.
    pub fn provider_short(&self) -> &str {
        self.provider
            .strip_suffix("Model")
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.provider)
    }
}

impl fmt::Display for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.provider.is_empty(), self.model_name.is_empty()) {
            (false, false) => write!(f, "{}/{}", self.provider_short(), self.model_name),
            (true, false) => f.write_str(&self.model_name),
            _ => f.write_str(self.provider_short()),
        }
    }
}
