//! # Response Envelope
//!
//! Every backend response is wrapped as
//! `{success, data, message, pagination}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ClientError, ClientResult};

/// Pagination block of list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Number of pages needed for `total` records
    pub fn page_count(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit)) as u32
    }
}

/// Raw envelope with undecoded data
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl Envelope {
    /// Decode a response body
    pub fn from_body(body: &str) -> ClientResult<Self> {
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Fail on `success: false`, otherwise decode `data`
    pub fn into_data<T: DeserializeOwned>(self) -> ClientResult<T> {
        if !self.success {
            return Err(ClientError::Rejected(self.message));
        }
        Ok(serde_json::from_value(self.data)?)
    }
}
