//! Observable events
//!
//! Every log line names one of these.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    ConfigLoaded,

    // Timeline
    TimelineFetch,
    TimelinePageLoaded,
    ReconstructComplete,
    ReconstructFailed,

    // Request log
    RequestLogFetch,
    StatsFetch,
    /// A request timestamp could not be read and was skipped
    StatsTimestampSkipped,

    // Backend
    /// Backend answered with a non-2xx status
    BackendError,

    // Commands
    CommandFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::TimelineFetch => "TIMELINE_FETCH",
            Event::TimelinePageLoaded => "TIMELINE_PAGE_LOADED",
            Event::ReconstructComplete => "RECONSTRUCT_COMPLETE",
            Event::ReconstructFailed => "RECONSTRUCT_FAILED",
            Event::RequestLogFetch => "REQUEST_LOG_FETCH",
            Event::StatsFetch => "STATS_FETCH",
            Event::StatsTimestampSkipped => "STATS_TIMESTAMP_SKIPPED",
            Event::BackendError => "BACKEND_ERROR",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Whether the event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::ReconstructFailed | Event::BackendError | Event::CommandFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
