//! # Request-Log Analytics
//!
//! Turns the backend's request statistics into chart-ready data:
//! status codes over time, grouped counts, the slowest paths and the
//! most active users.

pub mod errors;
pub mod ranking;
pub mod series;

use serde::Serialize;

use crate::client::{RequestStats, UserCount};
use crate::config::ConsoleConfig;

pub use errors::{StatsError, StatsResult};
pub use ranking::{
    latency_ranking, most_active_users, pie_slices, request_actions, Group, PathLatency,
    PieSlice,
};
pub use series::{status_time_series, SeriesLine, StatusSeries};

/// Everything the activity view charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityReport {
    pub status_over_time: StatusSeries,
    pub methods: Vec<PieSlice>,
    pub status_codes: Vec<PieSlice>,
    pub endpoints: Vec<PieSlice>,
    pub slowest_paths: Vec<PathLatency>,
    pub most_active_users: Vec<UserCount>,
}

impl ActivityReport {
    /// Build every chart from one stats payload
    pub fn build(stats: &RequestStats, config: &ConsoleConfig) -> StatsResult<Self> {
        Ok(Self {
            status_over_time: status_time_series(
                &stats.requests,
                config.aggregation_interval_minutes,
            )?,
            methods: pie_slices(&stats.method_groups),
            status_codes: pie_slices(&stats.status_groups),
            endpoints: pie_slices(&stats.endpoints),
            slowest_paths: latency_ranking(&stats.requests, config.latency_top_n),
            most_active_users: most_active_users(&stats.users, config.active_users_top_n),
        })
    }
}
