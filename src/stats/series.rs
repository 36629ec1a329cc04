//! Status-code time series
//!
//! Requests are counted per status code in fixed-width time buckets.
//! Bucket keys run from the earliest request (floored to the interval) to
//! the latest (ceiled), with zero counts filled in.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::client::RequestSummary;
use crate::history::parse_timestamp;
use crate::observability::{Event, Logger};

use super::errors::{StatsError, StatsResult};

/// One line of the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesLine {
    /// Status code
    pub label: String,
    /// Count per bucket, aligned with `x_labels`
    pub data: Vec<u64>,
}

/// Line-chart data for status codes over time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSeries {
    /// Bucket start times (RFC 3339, UTC, millisecond precision)
    pub x_labels: Vec<String>,
    pub series: Vec<SeriesLine>,
}

/// Bucket requests by status code.
///
/// Requests whose timestamp cannot be read are skipped.
pub fn status_time_series(
    requests: &[RequestSummary],
    interval_minutes: u32,
) -> StatsResult<StatusSeries> {
    if interval_minutes == 0 {
        return Err(StatsError::InvalidInterval);
    }
    let block = i64::from(interval_minutes) * 60_000;

    let mut points: Vec<(&str, i64)> = Vec::with_capacity(requests.len());
    for request in requests {
        match parse_timestamp(&request.timestamp) {
            Some(ts) => points.push((request.status_code.as_str(), ts.timestamp_millis())),
            None => Logger::warn(
                Event::StatsTimestampSkipped.as_str(),
                &[
                    ("request_identifier", request.request_identifier.as_str()),
                    ("timestamp", request.timestamp.as_str()),
                ],
            ),
        }
    }

    let (Some(min), Some(max)) = (
        points.iter().map(|(_, t)| *t).min(),
        points.iter().map(|(_, t)| *t).max(),
    ) else {
        return Ok(StatusSeries::default());
    };

    let start = min.div_euclid(block) * block;
    let end = ceil_to(max, block);
    let bucket_count = ((end - start) / block) as usize + 1;

    let mut counts: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    for (status, ts) in points {
        // Nearest bucket; halves round up
        let rounded = (ts + block / 2).div_euclid(block) * block;
        let index = ((rounded - start) / block) as usize;
        let line = counts
            .entry(status)
            .or_insert_with(|| vec![0; bucket_count]);
        line[index] += 1;
    }

    let x_labels = (0..bucket_count)
        .map(|i| bucket_label(start + i as i64 * block))
        .collect();
    let series = counts
        .into_iter()
        .map(|(label, data)| SeriesLine {
            label: label.to_string(),
            data,
        })
        .collect();

    Ok(StatusSeries { x_labels, series })
}

fn ceil_to(value: i64, block: i64) -> i64 {
    let floored = value.div_euclid(block) * block;
    if floored == value {
        floored
    } else {
        floored + block
    }
}

fn bucket_label(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
