//! # Request Log Types
//!
//! Payloads of the request-log and request-stats endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::history::record::string_or_number;
use crate::history::ChangeRecord;

/// One logged HTTP request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    #[serde(rename = "ID", default)]
    pub id: u64,
    #[serde(default)]
    pub timestamp: String,
    /// Milliseconds
    #[serde(default, deserialize_with = "integer_or_string")]
    pub duration: i64,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub origin: String,
    #[serde(rename = "referrer", default)]
    pub referer: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default)]
    pub roles: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub status_code: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub request_identifier: String,
}

/// A request with the history entries it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLogDetail {
    pub request_log: RequestLog,
    #[serde(default)]
    pub history_entries: Vec<ChangeRecord>,
}

/// Compact request row of the stats endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    #[serde(default)]
    pub request_identifier: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub status_code: String,
    #[serde(default)]
    pub method: String,
    /// Milliseconds
    #[serde(default, deserialize_with = "integer_or_string")]
    pub duration: i64,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCount {
    pub path: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCount {
    pub method: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(deserialize_with = "string_or_number")]
    pub status_code: String,
    pub count: u64,
}

/// Requests attributed to one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCount {
    pub email: String,
    pub count: u64,
}

/// Last-day request statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestStats {
    #[serde(default)]
    pub endpoints: Vec<PathCount>,
    #[serde(default)]
    pub method_groups: Vec<MethodCount>,
    #[serde(default)]
    pub status_groups: Vec<StatusCount>,
    #[serde(default)]
    pub users: Vec<UserCount>,
    #[serde(default)]
    pub requests: Vec<RequestSummary>,
}

fn integer_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| D::Error::custom(format!("invalid duration {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid duration '{}'", s))),
        other => Err(D::Error::custom(format!("invalid duration {}", other))),
    }
}
