//! Observability
//!
//! Structured logging for the console:
//! - one JSON object per line on stderr
//! - typed events instead of free-form messages
//! - scopes that bracket long operations
//!
//! Logging never affects results. Write failures are ignored.
//!
//! # Usage
//!
//! ```ignore
//! use cms_timeline::observability::{Event, Logger, ObservationScope};
//!
//! Logger::info(Event::TimelineFetch.as_str(), &[("page", "2")]);
//!
//! let scope = ObservationScope::new("TIMELINE");
//! // ... do work ...
//! scope.complete(&[("steps", "12")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity, LOG_LEVEL_ENV_VAR};
pub use scope::ObservationScope;

/// Log a typed event at the severity it implies
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
