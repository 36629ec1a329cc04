//! # Timeline State Reconstruction
//!
//! Folds record details onto an initial snapshot to rebuild a resource as
//! of any step of its timeline.
//!
//! Reconstruction is pure: inputs are only borrowed, and the same inputs
//! always produce the same snapshot.

use serde_json::{Map, Value};

use super::detail::{Detail, FieldChange};
use super::errors::{HistoryError, HistoryResult};
use super::record::{ChangeRecord, CrudAction};

/// Materialized state of a resource at one point in time
pub type Snapshot = Map<String, Value>;

/// Initial snapshot for a timeline: the first record's detail as stored.
///
/// Returns `None` when the first detail is the empty indicator.
pub fn initial_snapshot(records: &[ChangeRecord]) -> HistoryResult<Option<Snapshot>> {
    let first = records.first().ok_or(HistoryError::EmptyTimeline)?;
    Ok(first.parse_detail()?.into_changes())
}

/// Rebuild the state after applying records `0..=upto`.
///
/// `Ok(None)` means a record in range has an empty detail (a deletion),
/// so no state exists at that step. A `created` record replaces the state
/// with its detail; every other record is applied as a diff. Records past
/// `upto` are never parsed.
pub fn reconstruct(
    initial: Option<&Snapshot>,
    records: &[ChangeRecord],
    upto: usize,
) -> HistoryResult<Option<Snapshot>> {
    if records.is_empty() {
        return Err(HistoryError::EmptyTimeline);
    }
    if upto >= records.len() {
        return Err(HistoryError::StepOutOfRange {
            step: upto,
            len: records.len(),
        });
    }

    let mut state = initial.cloned();
    for record in &records[..=upto] {
        match record.parse_detail()? {
            Detail::Empty => return Ok(None),
            Detail::Unchanged => state = Some(state.take().unwrap_or_default()),
            // A creation carries the whole resource, not a diff
            Detail::Changes(resource) if record.action == CrudAction::Created => {
                state = Some(resource);
            }
            Detail::Changes(changes) => {
                let mut next = state.take().unwrap_or_default();
                forward_changes(&mut next, &changes);
                state = Some(next);
            }
        }
    }

    Ok(state)
}

/// Rebuild the latest state of a full timeline.
pub fn replay_all(records: &[ChangeRecord]) -> HistoryResult<Option<Snapshot>> {
    let initial = initial_snapshot(records)?;
    reconstruct(initial.as_ref(), records, records.len() - 1)
}

/// Apply one detail to `state` in place.
pub fn forward_changes(state: &mut Snapshot, changes: &Map<String, Value>) {
    for (field, change) in changes {
        match FieldChange::classify(change) {
            FieldChange::Pair { after, .. } => match (state.get_mut(field), after) {
                (Some(Value::Object(current)), Value::Object(incoming)) => {
                    merge_objects(current, incoming);
                }
                _ => {
                    state.insert(field.clone(), after.clone());
                }
            },
            FieldChange::Nested(nested) => match state.get_mut(field) {
                Some(Value::Object(current)) => forward_changes(current, nested),
                _ => {
                    state.insert(field.clone(), change.clone());
                }
            },
            FieldChange::Literal(value) => {
                state.insert(field.clone(), value.clone());
            }
        }
    }
}

/// Deep-merge `incoming` into `target`; keys absent from `incoming` survive.
fn merge_objects(target: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for (key, value) in incoming {
        match (target.get_mut(key), value) {
            (Some(Value::Object(current)), Value::Object(nested)) => merge_objects(current, nested),
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(sequence: u64, action: CrudAction, detail: Value) -> ChangeRecord {
        let detail = match detail {
            Value::Null => String::new(),
            other => other.to_string(),
        };
        ChangeRecord {
            sequence,
            created_at: None,
            updated_at: None,
            user_id: "1".to_string(),
            username: "ana@example.com".to_string(),
            action,
            resource_name: "Person".to_string(),
            resource_id: "5".to_string(),
            timestamp: String::new(),
            detail,
            request_id: String::new(),
        }
    }

    fn snapshot(value: Value) -> Snapshot {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_pairs_resolve_to_after_values() {
        let records = vec![
            record(1, CrudAction::Updated, json!({"name": ["", "Alice"]})),
            record(2, CrudAction::Updated, json!({"age": [null, 30]})),
        ];
        let initial = initial_snapshot(&records).unwrap();

        let state = reconstruct(initial.as_ref(), &records, 1).unwrap().unwrap();
        assert_eq!(Value::Object(state), json!({"name": "Alice", "age": 30}));
    }

    #[test]
    fn test_intermediate_step() {
        let records = vec![
            record(1, CrudAction::Created, json!({"name": "Alice", "age": 29})),
            record(2, CrudAction::Updated, json!({"age": [29, 30]})),
            record(3, CrudAction::Updated, json!({"name": ["Alice", "Alicia"]})),
        ];
        let initial = initial_snapshot(&records).unwrap();

        let state = reconstruct(initial.as_ref(), &records, 1).unwrap().unwrap();
        assert_eq!(Value::Object(state), json!({"name": "Alice", "age": 30}));
    }

    #[test]
    fn test_nested_diff_preserves_untouched_keys() {
        let initial = snapshot(json!({"address": {"city": "NY", "zip": "10001"}}));
        let records = vec![record(
            2,
            CrudAction::Updated,
            json!({"address": {"city": ["NY", "LA"]}}),
        )];

        let state = reconstruct(Some(&initial), &records, 0).unwrap().unwrap();
        assert_eq!(state["address"], json!({"city": "LA", "zip": "10001"}));
    }

    #[test]
    fn test_pair_with_object_after_merges() {
        let initial = snapshot(json!({"meta": {"a": 1, "b": {"c": 2, "d": 3}}}));
        let records = vec![record(
            2,
            CrudAction::Updated,
            json!({"meta": [{"a": 1}, {"a": 5, "b": {"c": 4}}]}),
        )];

        let state = reconstruct(Some(&initial), &records, 0).unwrap().unwrap();
        assert_eq!(state["meta"], json!({"a": 5, "b": {"c": 4, "d": 3}}));
    }

    #[test]
    fn test_pair_with_array_after_replaces() {
        let initial = snapshot(json!({"tags": {"x": 1}}));
        let records = vec![record(
            2,
            CrudAction::Updated,
            json!({"tags": [{"x": 1}, ["a", "b", "c"]]}),
        )];

        let state = reconstruct(Some(&initial), &records, 0).unwrap().unwrap();
        assert_eq!(state["tags"], json!(["a", "b", "c"]));
    }

    #[test]
    fn test_nested_diff_on_missing_field_is_literal() {
        let initial = snapshot(json!({"name": "Alice"}));
        let records = vec![record(2, CrudAction::Updated, json!({"address": {"city": "LA"}}))];

        let state = reconstruct(Some(&initial), &records, 0).unwrap().unwrap();
        assert_eq!(state["address"], json!({"city": "LA"}));
    }

    #[test]
    fn test_deleted_record_yields_none() {
        let records = vec![
            record(1, CrudAction::Created, json!({"name": "Alice"})),
            record(2, CrudAction::Deleted, Value::Null),
        ];
        let initial = initial_snapshot(&records).unwrap();

        assert!(reconstruct(initial.as_ref(), &records, 0).unwrap().is_some());
        assert!(reconstruct(initial.as_ref(), &records, 1).unwrap().is_none());
    }

    #[test]
    fn test_step_out_of_range() {
        let records = vec![record(1, CrudAction::Created, json!({"name": "Alice"}))];
        let err = reconstruct(None, &records, 1).unwrap_err();
        assert_eq!(err, HistoryError::StepOutOfRange { step: 1, len: 1 });
    }

    #[test]
    fn test_empty_timeline() {
        assert_eq!(reconstruct(None, &[], 0).unwrap_err(), HistoryError::EmptyTimeline);
        assert_eq!(initial_snapshot(&[]).unwrap_err(), HistoryError::EmptyTimeline);
    }

    #[test]
    fn test_malformed_detail_fails() {
        let mut bad = record(2, CrudAction::Updated, json!({}));
        bad.detail = "{\"name\": [".to_string();
        let records = vec![record(1, CrudAction::Created, json!({"name": "Alice"})), bad];

        let err = reconstruct(None, &records, 1).unwrap_err();
        assert!(matches!(err, HistoryError::Parse { sequence: 2, .. }));
    }

    #[test]
    fn test_malformed_detail_after_target_is_ignored() {
        let mut bad = record(2, CrudAction::Updated, json!({}));
        bad.detail = "garbage".to_string();
        let records = vec![record(1, CrudAction::Created, json!({"name": "Alice"})), bad];

        assert!(reconstruct(None, &records, 0).is_ok());
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let initial = snapshot(json!({"name": "Alice"}));
        let records = vec![record(2, CrudAction::Updated, json!({"name": ["Alice", "Bob"]}))];
        let records_before = records.clone();

        let first = reconstruct(Some(&initial), &records, 0).unwrap();
        let second = reconstruct(Some(&initial), &records, 0).unwrap();

        assert_eq!(first, second);
        assert_eq!(initial, snapshot(json!({"name": "Alice"})));
        assert_eq!(records, records_before);
    }

    #[test]
    fn test_replay_all() {
        let records = vec![
            record(1, CrudAction::Created, json!({"title": "Draft", "views": 0})),
            record(2, CrudAction::Updated, json!({"views": [0, 10]})),
        ];
        let state = replay_all(&records).unwrap().unwrap();
        assert_eq!(Value::Object(state), json!({"title": "Draft", "views": 10}));
    }

    #[test]
    fn test_created_arrays_stay_literal() {
        let records = vec![record(
            1,
            CrudAction::Created,
            json!({"name": "A", "coords": [40.7, -74.0]}),
        )];

        let state = replay_all(&records).unwrap().unwrap();
        assert_eq!(state["coords"], json!([40.7, -74.0]));
    }

    #[test]
    fn test_created_nested_arrays_stay_literal() {
        let records = vec![
            record(
                1,
                CrudAction::Created,
                json!({"geo": {"coords": [40.7, -74.0], "label": "x"}}),
            ),
            record(2, CrudAction::Updated, json!({"geo": {"label": ["x", "y"]}})),
        ];
        let initial = initial_snapshot(&records).unwrap();

        let step0 = reconstruct(initial.as_ref(), &records, 0).unwrap().unwrap();
        assert_eq!(step0["geo"], json!({"coords": [40.7, -74.0], "label": "x"}));

        let step1 = reconstruct(initial.as_ref(), &records, 1).unwrap().unwrap();
        assert_eq!(step1["geo"], json!({"coords": [40.7, -74.0], "label": "y"}));
    }

    #[test]
    fn test_null_detail_keeps_state() {
        let mut unchanged = record(2, CrudAction::Updated, json!({}));
        unchanged.detail = "null".to_string();
        let records = vec![record(1, CrudAction::Created, json!({"name": "A"})), unchanged];
        let initial = initial_snapshot(&records).unwrap();

        let state = reconstruct(initial.as_ref(), &records, 1).unwrap();
        assert_eq!(state, Some(snapshot(json!({"name": "A"}))));
    }

    #[test]
    fn test_whitespace_detail_fails() {
        let mut blank = record(2, CrudAction::Updated, json!({}));
        blank.detail = "  ".to_string();
        let records = vec![record(1, CrudAction::Created, json!({"name": "A"})), blank];

        let err = reconstruct(None, &records, 1).unwrap_err();
        assert!(matches!(err, HistoryError::Parse { sequence: 2, .. }));
    }
}
