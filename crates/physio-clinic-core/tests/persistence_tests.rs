//! Store, migration and backup integration tests against on-disk files.

use physio_clinic_core::clinic::Clinic;
use physio_clinic_core::db::{Keyspace, Store, AUTO_BACKUP_KEY, SNAPSHOT_KEY};
use physio_clinic_core::models::{Enrollment, NewGroup, NewPatient};
use serde_json::json;
use tempfile::TempDir;

fn db_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("clinic.sqlite3")
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let (group, patient) = {
        let mut clinic = Clinic::open(&path).unwrap();
        let group = clinic.add_group(NewGroup::named("Back school")).unwrap();
        let patient = clinic
            .add_patient(NewPatient::from_full_name("Rina Katz", "42".into(), "".into()))
            .unwrap();
        clinic.add_patient_to_group(&group, &patient, Some("R-1".into())).unwrap();
        (group, patient)
    };

    let clinic = Clinic::open(&path).unwrap();
    let membership = clinic.db().membership(&group, &patient).unwrap();
    assert_eq!(membership.enrolled, Enrollment::Enrolled);
    assert_eq!(membership.receipt.as_deref(), Some("R-1"));
    assert_eq!(clinic.db().group(&group).unwrap().available, 14);
}

#[test]
fn test_corrupt_primary_recovers_previous_state() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    {
        let mut clinic = Clinic::open(&path).unwrap();
        clinic.add_group(NewGroup::named("One")).unwrap();
        clinic.add_group(NewGroup::named("Two")).unwrap();
    }
    {
        let store = Store::open(&path).unwrap();
        store.set(Keyspace::Local, SNAPSHOT_KEY, "\u{0}garbage").unwrap();
    }

    // The auto-backup holds the state before the last save.
    let clinic = Clinic::open(&path).unwrap();
    let names: Vec<&str> = clinic.db().groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["One"]);
}

#[test]
fn test_everything_corrupt_reseeds() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    {
        let store = Store::open(&path).unwrap();
        store.set(Keyspace::Local, SNAPSHOT_KEY, "{").unwrap();
        store.set(Keyspace::Local, AUTO_BACKUP_KEY, "{\"timestamp\": 1}").unwrap();
    }

    let clinic = Clinic::open(&path).unwrap();
    assert_eq!(clinic.db().statuses.len(), 2);
    assert!(clinic.db().groups.is_empty());
    assert!(clinic.db().settings().is_some());
}

#[test]
fn test_legacy_backup_import_is_migrated_on_load() {
    let legacy = json!({
        "statuses": [{"id": "s1", "code": "active"}, {"id": "s2", "code": "inactive"}],
        "therapists": [],
        "patients": [{"id": "p1", "nationalId": "7", "phone": "", "firstName": "Old",
                      "lastName": "Timer", "createdAt": 1, "updatedAt": 1, "statusId": "s1"}],
        "groups": [{"id": "g1", "name": "Legacy", "capacity": 3, "available": 3, "when": "open",
                    "createdAt": 1, "updatedAt": 1}],
        "patientsInGroups": [{"id": "m1", "patientId": "p1", "groupId": "g1",
                              "createdAt": 2, "updatedAt": 2, "statusId": "s1"}],
        "therapistsInGroups": [],
        "attendance": [],
        "patientPayments": []
    });
    let text = serde_json::to_string(&legacy).unwrap();

    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    {
        let mut clinic = Clinic::open(&path).unwrap();
        clinic.import_backup(&text).unwrap();
        assert!(clinic.db().patients_in_groups[0].is_enrolled());
        assert_eq!(clinic.db().group("g1").unwrap().available, 2);
    }

    // Stored verbatim; migration only happens in memory on load.
    let store = Store::open(&path).unwrap();
    assert_eq!(store.raw_snapshot().unwrap().as_deref(), Some(text.as_str()));

    let clinic = Clinic::open(&path).unwrap();
    assert_eq!(clinic.db().settings.len(), 1);
}

#[test]
fn test_backup_round_trip_between_stores() {
    let dir = TempDir::new().unwrap();
    let mut source = Clinic::open(dir.path().join("a.sqlite3")).unwrap();
    let group = source.add_group(NewGroup::named("Shoulders")).unwrap();
    let patient = source
        .add_patient(NewPatient::from_full_name("Eli", "9".into(), "".into()))
        .unwrap();
    source.add_patient_to_group(&group, &patient, None).unwrap();
    source.mark_attendance(&group, &patient, "t1", "2025-12-01", false).unwrap();
    let text = source.export_backup(true).unwrap();

    let mut target = Clinic::open(dir.path().join("b.sqlite3")).unwrap();
    target.import_backup(&text).unwrap();
    assert_eq!(target.db(), source.db());
}

/// Two sessions on one file: the last save wins and the overwritten
/// state is what lands in the auto-backup.
#[test]
fn test_concurrent_sessions_last_write_wins() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let mut first = Clinic::open(&path).unwrap();
    let mut second = Clinic::open(&path).unwrap();

    first.add_group(NewGroup::named("From first")).unwrap();
    second.add_group(NewGroup::named("From second")).unwrap();

    let reopened = Clinic::open(&path).unwrap();
    let names: Vec<&str> = reopened.db().groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["From second"]);

    let backup = reopened.store().auto_backup().unwrap().unwrap();
    assert_eq!(backup.data["groups"][0]["name"], "From first");
}
