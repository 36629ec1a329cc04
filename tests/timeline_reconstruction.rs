//! Timeline Reconstruction Tests
//!
//! Tests for properties of diff folding:
//! - replaying every record reproduces the final state
//! - each step depends only on the records up to it
//! - deletions yield no state
//! - malformed records fail loudly

use serde_json::{json, Map, Value};

use cms_timeline::history::{
    compare, initial_snapshot, reconstruct, replay_all, ChangeRecord, CrudAction, HistoryError,
    Snapshot,
};

// =============================================================================
// Test Utilities
// =============================================================================

fn record(sequence: u64, action: CrudAction, detail: &str) -> ChangeRecord {
    ChangeRecord {
        sequence,
        created_at: None,
        updated_at: None,
        user_id: "1".to_string(),
        username: "ana@example.com".to_string(),
        action,
        resource_name: "Customer".to_string(),
        resource_id: "42".to_string(),
        timestamp: "2024-05-01T10:00:00Z".to_string(),
        detail: detail.to_string(),
        request_id: format!("req-{}", sequence),
    }
}

fn object(value: Value) -> Snapshot {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

/// Build a timeline the way the backend records one: a creation with the
/// full document, then one diff per successive version.
fn timeline_from_versions(versions: &[Value]) -> Vec<ChangeRecord> {
    let mut records = vec![record(1, CrudAction::Created, &versions[0].to_string())];
    for (i, pair) in versions.windows(2).enumerate() {
        let diff: Map<String, Value> = compare(&pair[0], &pair[1]);
        records.push(record(
            i as u64 + 2,
            CrudAction::Updated,
            &Value::Object(diff).to_string(),
        ));
    }
    records
}

fn customer_versions() -> Vec<Value> {
    vec![
        json!({"name": "Alice", "age": 29, "coords": [40.7, -74.0], "address": {"city": "NY", "zip": "10001", "coords": [40.7, -74.0]}}),
        json!({"name": "Alice", "age": 30, "coords": [40.7, -74.0], "address": {"city": "NY", "zip": "10001", "coords": [40.7, -74.0]}}),
        json!({"name": "Alice", "age": 30, "coords": [34.0, -118.2], "address": {"city": "LA", "zip": "10001", "coords": [34.0, -118.2]}}),
        json!({"name": "Alice B.", "age": 30, "coords": [34.0, -118.2], "address": {"city": "LA", "zip": "90001", "coords": [34.0, -118.2]}, "vip": true}),
        json!({"name": "Alice B.", "age": 31, "coords": [34.0, -118.2], "address": {"city": "LA", "zip": "90001", "coords": [34.0, -118.2]}, "vip": false}),
    ]
}

// =============================================================================
// Replay Reproduces Every Version
// =============================================================================

/// Test: reconstructing step k yields version k for every k
#[test]
fn test_every_step_matches_its_version() {
    let versions = customer_versions();
    let records = timeline_from_versions(&versions);
    let initial = initial_snapshot(&records).unwrap();

    for (step, version) in versions.iter().enumerate() {
        let state = reconstruct(initial.as_ref(), &records, step).unwrap();
        assert_eq!(
            state,
            Some(object(version.clone())),
            "step {} diverged",
            step
        );
    }
}

/// Test: replaying the whole timeline gives the latest version
#[test]
fn test_replay_all_matches_final_version() {
    let versions = customer_versions();
    let records = timeline_from_versions(&versions);

    let last = versions.last().cloned().unwrap();
    assert_eq!(replay_all(&records).unwrap(), Some(object(last)));
}

/// Test: the same step reconstructed twice is identical
#[test]
fn test_reconstruction_is_repeatable() {
    let records = timeline_from_versions(&customer_versions());
    let initial = initial_snapshot(&records).unwrap();

    let first = reconstruct(initial.as_ref(), &records, 3).unwrap();
    let second = reconstruct(initial.as_ref(), &records, 3).unwrap();
    assert_eq!(first, second);
}

/// Test: records after the target step do not affect it
#[test]
fn test_later_records_are_ignored() {
    let mut records = timeline_from_versions(&customer_versions());
    let initial = initial_snapshot(&records).unwrap();
    let before = reconstruct(initial.as_ref(), &records, 2).unwrap();

    records.push(record(99, CrudAction::Updated, "not json at all"));
    let after = reconstruct(initial.as_ref(), &records, 2).unwrap();
    assert_eq!(before, after);
}

// =============================================================================
// Backend Detail Shapes
// =============================================================================

/// Test: two-element arrays in a created resource are values, not changes
#[test]
fn test_created_pairs_are_literal() {
    let records = vec![record(
        1,
        CrudAction::Created,
        r#"{"name":"A","coords":[40.7,-74.0],"geo":{"coords":[40.7,-74.0],"label":"x"}}"#,
    )];

    let state = replay_all(&records).unwrap().unwrap();
    assert_eq!(
        Value::Object(state),
        json!({"name": "A", "coords": [40.7, -74.0], "geo": {"coords": [40.7, -74.0], "label": "x"}})
    );
}

/// Test: a null detail changes nothing
#[test]
fn test_null_detail_is_no_op() {
    let records = vec![
        record(1, CrudAction::Created, r#"{"name":"A"}"#),
        record(2, CrudAction::Updated, "null"),
    ];

    assert_eq!(
        replay_all(&records).unwrap(),
        Some(object(json!({"name": "A"})))
    );
}

/// Test: nested diff updates one field and keeps its siblings
#[test]
fn test_nested_diff_keeps_siblings() {
    let records = vec![
        record(
            1,
            CrudAction::Created,
            r#"{"name":"Alice","address":{"city":"NY","zip":"10001"}}"#,
        ),
        record(
            2,
            CrudAction::Updated,
            r#"{"address":{"city":["NY","LA"]}}"#,
        ),
    ];

    let state = replay_all(&records).unwrap().unwrap();
    assert_eq!(
        Value::Object(state),
        json!({"name": "Alice", "address": {"city": "LA", "zip": "10001"}})
    );
}

/// Test: a field added by an update appears from that step on
#[test]
fn test_added_field() {
    let records = vec![
        record(1, CrudAction::Created, r#"{"title":"Draft"}"#),
        record(2, CrudAction::Updated, r#"{"tags":[null,["news"]]}"#),
    ];
    let initial = initial_snapshot(&records).unwrap();

    let step0 = reconstruct(initial.as_ref(), &records, 0).unwrap().unwrap();
    assert!(!step0.contains_key("tags"));

    let step1 = reconstruct(initial.as_ref(), &records, 1).unwrap().unwrap();
    assert_eq!(step1["tags"], json!(["news"]));
}

/// Test: a removed field is set to null, not dropped
#[test]
fn test_removed_field_becomes_null() {
    let records = vec![
        record(1, CrudAction::Created, r#"{"title":"Draft","subtitle":"x"}"#),
        record(2, CrudAction::Updated, r#"{"subtitle":["x",null]}"#),
    ];

    let state = replay_all(&records).unwrap().unwrap();
    assert_eq!(state["subtitle"], Value::Null);
}

// =============================================================================
// Deletion and Errors
// =============================================================================

/// Test: a deletion yields no state at its step, earlier steps remain
#[test]
fn test_deletion_step_has_no_state() {
    let records = vec![
        record(1, CrudAction::Created, r#"{"title":"Draft"}"#),
        record(2, CrudAction::Updated, r#"{"title":["Draft","Final"]}"#),
        record(3, CrudAction::Deleted, ""),
    ];
    let initial = initial_snapshot(&records).unwrap();

    assert_eq!(reconstruct(initial.as_ref(), &records, 2).unwrap(), None);
    assert_eq!(
        reconstruct(initial.as_ref(), &records, 1).unwrap(),
        Some(object(json!({"title": "Final"})))
    );
}

/// Test: steps past the end are rejected
#[test]
fn test_step_out_of_range() {
    let records = timeline_from_versions(&customer_versions());
    let initial = initial_snapshot(&records).unwrap();

    let err = reconstruct(initial.as_ref(), &records, records.len()).unwrap_err();
    assert_eq!(
        err,
        HistoryError::StepOutOfRange {
            step: records.len(),
            len: records.len()
        }
    );
}

/// Test: an empty timeline is an error, not an empty state
#[test]
fn test_empty_timeline() {
    assert_eq!(
        reconstruct(None, &[], 0).unwrap_err(),
        HistoryError::EmptyTimeline
    );
}

/// Test: malformed detail inside the range names the record
#[test]
fn test_malformed_detail_is_reported() {
    let records = vec![
        record(1, CrudAction::Created, r#"{"title":"Draft"}"#),
        record(7, CrudAction::Updated, "{broken"),
    ];
    let initial = initial_snapshot(&records).unwrap();

    match reconstruct(initial.as_ref(), &records, 1) {
        Err(HistoryError::Parse { sequence, .. }) => assert_eq!(sequence, 7),
        other => panic!("expected parse error, got {:?}", other),
    }
}
