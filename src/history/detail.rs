//! # Detail Diffs
//!
//! A record's detail maps field names to one of three shapes:
//!
//! - `[before, after]`: a two-element array, the field changed
//! - `{ ... }`: a nested diff, emitted when both sides were objects
//! - anything else: a literal value
//!
//! A `created` record's detail is the whole resource. Its values are all
//! literals, whatever their shape.

use serde_json::{Map, Value};

use super::errors::{HistoryError, HistoryResult};

/// Parsed detail of one record
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    /// Empty indicator. The state at this step cannot be rebuilt.
    Empty,
    /// JSON `null`: nothing changed
    Unchanged,
    /// Field-level changes
    Changes(Map<String, Value>),
}

impl Detail {
    /// Parse a raw detail string.
    ///
    /// Only the exact empty string is the empty indicator. Anything else
    /// must be JSON `null` or a JSON object.
    pub fn parse(sequence: u64, raw: &str) -> HistoryResult<Self> {
        if raw.is_empty() {
            return Ok(Detail::Empty);
        }

        let value: Value =
            serde_json::from_str(raw).map_err(|e| HistoryError::parse(sequence, e.to_string()))?;

        match value {
            Value::Null => Ok(Detail::Unchanged),
            Value::Object(changes) => Ok(Detail::Changes(changes)),
            other => Err(HistoryError::parse(
                sequence,
                format!("expected an object, found {}", kind_of(&other)),
            )),
        }
    }

    pub fn into_changes(self) -> Option<Map<String, Value>> {
        match self {
            Detail::Empty | Detail::Unchanged => None,
            Detail::Changes(changes) => Some(changes),
        }
    }
}

/// Shape of a single field entry in a detail
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldChange<'a> {
    Pair { before: &'a Value, after: &'a Value },
    Nested(&'a Map<String, Value>),
    Literal(&'a Value),
}

impl<'a> FieldChange<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) if items.len() == 2 => FieldChange::Pair {
                before: &items[0],
                after: &items[1],
            },
            Value::Object(nested) => FieldChange::Nested(nested),
            other => FieldChange::Literal(other),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
