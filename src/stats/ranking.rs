//! Grouped and ranked activity views

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::{MethodCount, PathCount, RequestSummary, StatusCount, UserCount};
use crate::history::ChangeRecord;

/// One pie-chart slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub id: usize,
    pub value: u64,
    pub label: String,
}

/// Average latency of one path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLatency {
    pub path: String,
    pub average_duration_secs: f64,
    pub requests: u64,
}

/// Anything the stats endpoint groups and counts
pub trait Group {
    fn label(&self) -> &str;
    fn count(&self) -> u64;
}

impl Group for PathCount {
    fn label(&self) -> &str {
        &self.path
    }
    fn count(&self) -> u64 {
        self.count
    }
}

impl Group for MethodCount {
    fn label(&self) -> &str {
        &self.method
    }
    fn count(&self) -> u64 {
        self.count
    }
}

impl Group for UserCount {
    fn label(&self) -> &str {
        &self.email
    }
    fn count(&self) -> u64 {
        self.count
    }
}

impl Group for StatusCount {
    fn label(&self) -> &str {
        &self.status_code
    }
    fn count(&self) -> u64 {
        self.count
    }
}

/// Pie slices in input order
pub fn pie_slices<G: Group>(groups: &[G]) -> Vec<PieSlice> {
    groups
        .iter()
        .enumerate()
        .map(|(id, group)| PieSlice {
            id,
            value: group.count(),
            label: group.label().to_string(),
        })
        .collect()
}

/// Slowest paths by average duration, at most `top_n`.
///
/// Durations arrive in milliseconds. Ties keep path order.
pub fn latency_ranking(requests: &[RequestSummary], top_n: usize) -> Vec<PathLatency> {
    let mut totals: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for request in requests {
        let entry = totals.entry(request.path.as_str()).or_insert((0.0, 0));
        entry.0 += request.duration as f64 / 1000.0;
        entry.1 += 1;
    }

    let mut ranking: Vec<PathLatency> = totals
        .into_iter()
        .map(|(path, (seconds, requests))| PathLatency {
            path: path.to_string(),
            average_duration_secs: seconds / requests as f64,
            requests,
        })
        .collect();

    ranking.sort_by(|a, b| b.average_duration_secs.total_cmp(&a.average_duration_secs));
    ranking.truncate(top_n);
    ranking
}

/// Users with the most requests, at most `top_n`.
///
/// Ordered by count, busiest first, then by email.
pub fn most_active_users(users: &[UserCount], top_n: usize) -> Vec<UserCount> {
    let mut ranking = users.to_vec();
    ranking.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.email.cmp(&b.email)));
    ranking.truncate(top_n);
    ranking
}

/// Labels for the actions a request performed
pub fn request_actions(entries: &[ChangeRecord]) -> Vec<String> {
    entries.iter().map(ChangeRecord::label).collect()
}
