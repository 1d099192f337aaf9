//! Load-time schema migration.
//!
//! Older snapshots lack collections and fields added later. Migration runs
//! on the raw JSON before typed decoding as an ordered list of steps; every
//! step only fills in what is missing, so the whole pass is idempotent.
//! After decoding, each group's `available` is recomputed from its enrolled
//! rows.

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::models::{Database, Settings};

/// Snapshot decoding errors.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot is not a JSON object")]
    NotAnObject,
}

type Step = fn(&mut Map<String, Value>) -> bool;

const STEPS: &[(&str, Step)] = &[
    ("ensure-attendance", ensure_attendance),
    ("ensure-payments", ensure_payments),
    ("ensure-settings", ensure_settings),
    ("backfill-enrolled", backfill_enrolled),
    ("backfill-makeup", backfill_makeup),
];

/// Names of the steps that changed something, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<&'static str>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Migrate raw snapshot JSON in place.
pub fn migrate_value(value: &mut Value) -> Result<MigrationReport, SnapshotError> {
    let root = value.as_object_mut().ok_or(SnapshotError::NotAnObject)?;
    let mut report = MigrationReport::default();
    for &(name, step) in STEPS {
        if step(root) {
            report.applied.push(name);
        }
    }
    Ok(report)
}

/// Decode a raw snapshot string into a migrated, self-healed [`Database`].
pub fn decode_snapshot(raw: &str) -> Result<(Database, MigrationReport), SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;
    decode_value(value)
}

/// Decode snapshot JSON into a migrated, self-healed [`Database`].
pub fn decode_value(mut value: Value) -> Result<(Database, MigrationReport), SnapshotError> {
    let mut report = migrate_value(&mut value)?;
    let mut db: Database = serde_json::from_value(value)?;
    if heal_available(&mut db) {
        report.applied.push("recompute-available");
    }
    if !report.is_empty() {
        tracing::debug!(steps = ?report.applied, "migrated snapshot");
    }
    Ok((db, report))
}

/// Set every group's `available` to `capacity - enrolled rows`.
///
/// Unlike an explicit recalculation this leaves `updated_at` alone, so a
/// consistent snapshot passes through unchanged.
pub fn heal_available(db: &mut Database) -> bool {
    let counts: Vec<usize> = db.groups.iter().map(|g| db.enrolled_count(&g.id)).collect();
    let mut changed = false;
    for (group, enrolled) in db.groups.iter_mut().zip(counts) {
        let expected = group.free_slots(enrolled);
        if group.available != expected {
            group.available = expected;
            changed = true;
        }
    }
    changed
}

fn ensure_array(root: &mut Map<String, Value>, key: &str) -> bool {
    if root.get(key).is_some_and(Value::is_array) {
        return false;
    }
    root.insert(key.to_string(), Value::Array(Vec::new()));
    true
}

fn ensure_attendance(root: &mut Map<String, Value>) -> bool {
    ensure_array(root, "attendance")
}

fn ensure_payments(root: &mut Map<String, Value>) -> bool {
    ensure_array(root, "patientPayments")
}

fn ensure_settings(root: &mut Map<String, Value>) -> bool {
    if root.get("settings").is_some_and(Value::is_array) {
        return false;
    }
    let row = serde_json::to_value(Settings::default()).unwrap_or_else(|_| json!({}));
    root.insert("settings".to_string(), Value::Array(vec![row]));
    true
}

/// Fill `field` with `default` on every object row of `collection` lacking it.
fn backfill(root: &mut Map<String, Value>, collection: &str, field: &str, default: Value) -> bool {
    let Some(rows) = root.get_mut(collection).and_then(Value::as_array_mut) else {
        return false;
    };
    let mut changed = false;
    for row in rows.iter_mut().filter_map(Value::as_object_mut) {
        if !row.contains_key(field) {
            row.insert(field.to_string(), default.clone());
            changed = true;
        }
    }
    changed
}

fn backfill_enrolled(root: &mut Map<String, Value>) -> bool {
    // Rows predating the waitlist were all occupying slots.
    backfill(root, "patientsInGroups", "enrolled", json!(1))
}

fn backfill_makeup(root: &mut Map<String, Value>) -> bool {
    backfill(root, "attendance", "isMakeup", json!(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_snapshot() -> Value {
        json!({
            "statuses": [
                {"id": "s1", "code": "active"},
                {"id": "s2", "code": "inactive"}
            ],
            "therapists": [],
            "patients": [
                {"id": "p1", "nationalId": "1", "phone": "", "firstName": "A", "lastName": "B",
                 "createdAt": 1, "updatedAt": 1, "statusId": "s1"}
            ],
            "groups": [
                {"id": "g1", "name": "Backs", "capacity": 15, "available": 15, "when": "open",
                 "createdAt": 1, "updatedAt": 1}
            ],
            "patientsInGroups": [
                {"id": "m1", "patientId": "p1", "groupId": "g1",
                 "createdAt": 2, "updatedAt": 2, "statusId": "s1"}
            ],
            "therapistsInGroups": []
        })
    }

    #[test]
    fn test_legacy_snapshot_is_upgraded() {
        let (db, report) = decode_value(legacy_snapshot()).unwrap();

        assert_eq!(
            report.applied,
            vec![
                "ensure-attendance",
                "ensure-payments",
                "ensure-settings",
                "backfill-enrolled",
                "recompute-available"
            ]
        );
        assert!(db.patients_in_groups[0].is_enrolled());
        assert_eq!(db.groups[0].available, 14);
        assert_eq!(db.groups[0].updated_at, 1);
        assert_eq!(db.settings.len(), 1);
    }

    #[test]
    fn test_backfill_makeup() {
        let mut value = legacy_snapshot();
        value["attendance"] = json!([
            {"id": "a1", "patientId": "p1", "groupId": "g1", "therapistId": "t1",
             "date": "2025-07-01", "createdAt": 3}
        ]);
        let (db, report) = decode_value(value).unwrap();
        assert!(report.applied.contains(&"backfill-makeup"));
        assert!(!db.attendance[0].is_makeup);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let (db, _) = decode_value(legacy_snapshot()).unwrap();
        let raw = serde_json::to_string(&db).unwrap();

        let (again, report) = decode_snapshot(&raw).unwrap();
        assert!(report.is_empty(), "unexpected steps: {:?}", report.applied);
        assert_eq!(again, db);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(
            decode_snapshot("[1, 2, 3]"),
            Err(SnapshotError::NotAnObject)
        ));
        assert!(matches!(
            decode_snapshot("{not json"),
            Err(SnapshotError::Json(_))
        ));
    }
}
