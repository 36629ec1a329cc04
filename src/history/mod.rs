//! # Resource History
//!
//! Change records for a resource and the reconstruction of its state at
//! any step of the timeline.
//!
//! ## Replay invariant
//!
//! Replaying every record of a resource in ascending sequence order,
//! starting from the first record's detail, reproduces the resource's
//! current stored state.

pub mod detail;
pub mod diff;
pub mod errors;
pub mod format;
pub mod reconstruct;
pub mod record;

pub use detail::{Detail, FieldChange};
pub use diff::compare;
pub use errors::{HistoryError, HistoryResult};
pub use format::format_changes;
pub use reconstruct::{forward_changes, initial_snapshot, reconstruct, replay_all, Snapshot};
pub use record::{parse_timestamp, ChangeRecord, CrudAction};
