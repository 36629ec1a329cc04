//! # CMS Backend Client
//!
//! REST access to the backend's history and request-log endpoints, and a
//! cursor that pages through a resource's timeline on demand.
//!
//! All calls are read-only `GET`s. Nothing is retried.

pub mod api;
pub mod cursor;
pub mod envelope;
pub mod errors;
pub mod request_log;

pub use api::{ApiClient, ResourceTimeline};
pub use cursor::{PageSource, TimelineCursor, TimelinePage};
pub use envelope::{Envelope, Pagination};
pub use errors::{ClientError, ClientResult};
pub use request_log::{
    MethodCount, PathCount, RequestLog, RequestLogDetail, RequestStats, RequestSummary,
    StatusCount, UserCount,
};
