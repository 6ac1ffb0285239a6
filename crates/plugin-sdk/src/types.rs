//! Core types shared between plugins and the kernel.
//!
//! All tap functions use full serialization (JSON in, JSON out), so every
//! type here round-trips through serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Identifier of a content item (UUIDv7, time-sortable).
pub type ItemId = Uuid;

/// A reference to another record (item, user, category term, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub target_id: Uuid,
    pub target_type: String,
}

impl RecordRef {
    pub fn new(target_id: Uuid, target_type: impl Into<String>) -> Self {
        Self {
            target_id,
            target_type: target_type.into(),
        }
    }
}

/// Decode a stored reference value into an ordered list of item IDs.
///
/// Relation fields come back from the kernel in whatever shape they were
/// saved in: a single ID, a list of IDs, a list of [`RecordRef`]s, or a
/// "nothing" marker (`null`, `false`, `""`, `[]`). Entries that are not
/// IDs are skipped.
pub fn ids_from_value(value: &Value) -> Vec<ItemId> {
    match value {
        Value::Array(entries) => entries.iter().filter_map(id_from_entry).collect(),
        other => id_from_entry(other).into_iter().collect(),
    }
}

fn id_from_entry(entry: &Value) -> Option<ItemId> {
    let raw = match entry {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("target_id").or_else(|| map.get("id"))?.as_str()?,
        _ => return None,
    };
    Uuid::parse_str(raw.trim()).ok()
}

/// Log levels for structured logging from plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Level name as understood by the kernel logging import.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}
