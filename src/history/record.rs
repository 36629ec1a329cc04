//! # Change Records
//!
//! One logged mutation of a resource, as the backend serves it from its
//! history table.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::detail::Detail;
use super::errors::HistoryResult;

/// Kind of mutation a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudAction {
    /// Resource created; detail holds the full object
    Created,
    /// Resource updated; detail holds the field diff
    Updated,
    /// Resource deleted; detail is empty
    Deleted,
}

impl CrudAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrudAction::Created => "created",
            CrudAction::Updated => "updated",
            CrudAction::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for CrudAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single history entry
///
/// Records are immutable and append-only. The `sequence` (the backend's
/// row id) is monotonic per resource, and timelines are ordered by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Monotonic sequence index
    #[serde(rename = "ID")]
    pub sequence: u64,

    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "UpdatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,

    /// Actor (the user's email)
    #[serde(default)]
    pub username: String,

    pub action: CrudAction,

    #[serde(default)]
    pub resource_name: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub resource_id: String,

    /// Time of the mutation as sent by the backend
    #[serde(default)]
    pub timestamp: String,

    /// JSON-encoded detail; empty for deletions
    #[serde(default)]
    pub detail: String,

    #[serde(default)]
    pub request_id: String,
}

impl ChangeRecord {
    /// Parse this record's detail
    pub fn parse_detail(&self) -> HistoryResult<Detail> {
        Detail::parse(self.sequence, &self.detail)
    }

    /// Mutation time, falling back to the row's update time
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp).or(self.updated_at)
    }

    /// One-line description, e.g. `ana@x.io updated Post (12)`
    pub fn label(&self) -> String {
        format!(
            "{} {} {} ({})",
            self.username, self.action, self.resource_name, self.resource_id
        )
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and the bare `YYYY-MM-DD HH:MM:SS[.f]` form some
/// database drivers emit (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Ids are strings on some backend versions and integers on others.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
