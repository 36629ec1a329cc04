//! cms-timeline - resource history and request activity for a CMS admin backend
//!
//! - `history`: rebuild a resource's state at any step of its change log
//! - `client`: paginated REST access to the backend
//! - `stats`: chart data from request logs
//! - `cli`: the `cms-timeline` binary

pub mod cli;
pub mod client;
pub mod config;
pub mod history;
pub mod observability;
pub mod stats;
