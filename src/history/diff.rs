//! # Snapshot Diffing
//!
//! Produces details in the same shape the backend writes for updates, so
//! that a state can be diffed locally and the result replayed.

use chrono::DateTime;
use serde_json::{json, Map, Value};

/// Diff two snapshots.
///
/// - equal values are omitted
/// - strings that parse as the same RFC 3339 instant are omitted
/// - two objects produce a nested diff (omitted when empty)
/// - anything else becomes `[before, after]`
/// - keys on one side only become `[value, null]` / `[null, value]`
///
/// `Null` on both sides yields an empty diff. When only one side is
/// present, or either side is not an object, the diff is
/// `{"value": [before, after]}` (empty if they are equal).
pub fn compare(before: &Value, after: &Value) -> Map<String, Value> {
    match (before, after) {
        (Value::Null, Value::Null) => Map::new(),
        (Value::Object(a), Value::Object(b)) => compare_objects(a, b),
        (a, b) if a == b => Map::new(),
        (a, b) => {
            let mut diff = Map::new();
            diff.insert("value".to_string(), json!([a, b]));
            diff
        }
    }
}

/// Diff two object snapshots field by field.
pub fn compare_objects(a: &Map<String, Value>, b: &Map<String, Value>) -> Map<String, Value> {
    let mut diff = Map::new();

    for (key, va) in a {
        match b.get(key) {
            Some(vb) => {
                if va == vb || same_instant(va, vb) {
                    continue;
                }
                match (va, vb) {
                    (Value::Object(na), Value::Object(nb)) => {
                        let nested = compare_objects(na, nb);
                        if !nested.is_empty() {
                            diff.insert(key.clone(), Value::Object(nested));
                        }
                    }
                    _ => {
                        diff.insert(key.clone(), json!([va, vb]));
                    }
                }
            }
            None => {
                diff.insert(key.clone(), json!([va, Value::Null]));
            }
        }
    }

    for (key, vb) in b {
        if !a.contains_key(key) {
            diff.insert(key.clone(), json!([Value::Null, vb]));
        }
    }

    diff
}

fn same_instant(a: &Value, b: &Value) -> bool {
    let (Value::String(a), Value::String(b)) = (a, b) else {
        return false;
    };
    match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        (Ok(ta), Ok(tb)) => ta == tb,
        _ => false,
    }
}
