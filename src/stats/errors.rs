//! Stats errors

use thiserror::Error;

pub type StatsResult<T> = Result<T, StatsError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// Bucket width must be at least one minute
    #[error("Aggregation interval must be at least one minute")]
    InvalidInterval,
}

impl StatsError {
    pub fn code(&self) -> &'static str {
        match self {
            StatsError::InvalidInterval => "CMS_STATS_INVALID_INTERVAL",
        }
    }
}
