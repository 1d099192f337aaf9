//! Whole-database backup files.
//!
//! Export is the pretty-printed snapshot, optionally BOM-prefixed so
//! spreadsheet tools detect UTF-8. Import validates the document shape and
//! hands back the text to store verbatim; migration happens on the next load.

mod csv;

pub use csv::*;

use serde_json::Value;
use thiserror::Error;

use crate::db::SnapshotError;
use crate::models::Database;

/// UTF-8 byte order mark.
pub const BOM: char = '\u{FEFF}';

/// Collections a backup must carry as arrays.
pub const REQUIRED_COLLECTIONS: [&str; 8] = [
    "statuses",
    "therapists",
    "patients",
    "groups",
    "patientsInGroups",
    "therapistsInGroups",
    "attendance",
    "patientPayments",
];

/// Backup validation errors.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("backup is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("backup is not a JSON object")]
    NotAnObject,

    #[error("backup is missing the `{0}` collection")]
    MissingCollection(&'static str),

    #[error("backup has {0} statuses, at least 2 are required")]
    TooFewStatuses(usize),

    #[error("patient #{index} is missing id, firstName or lastName")]
    InvalidPatient { index: usize },

    #[error("backup does not fit the clinic schema: {0}")]
    Schema(SnapshotError),
}

pub type BackupResult<T> = Result<T, BackupError>;

/// Serialize the database as a backup document.
pub fn export_backup(db: &Database, with_bom: bool) -> BackupResult<String> {
    let json = serde_json::to_string_pretty(db)?;
    Ok(if with_bom {
        format!("{}{}", BOM, json)
    } else {
        json
    })
}

/// Validate a backup document and return the text to store.
///
/// A leading BOM is stripped; everything else is returned untouched.
pub fn prepare_import(text: &str) -> BackupResult<&str> {
    let text = strip_bom(text);
    let value: Value = serde_json::from_str(text)?;
    validate_backup(&value)?;
    Ok(text)
}

/// Check the structural requirements of a backup document.
pub fn validate_backup(value: &Value) -> BackupResult<()> {
    let root = value.as_object().ok_or(BackupError::NotAnObject)?;

    for name in REQUIRED_COLLECTIONS {
        if !root.get(name).is_some_and(Value::is_array) {
            return Err(BackupError::MissingCollection(name));
        }
    }

    let statuses = root["statuses"].as_array().map_or(0, Vec::len);
    if statuses < 2 {
        return Err(BackupError::TooFewStatuses(statuses));
    }

    let patients = root["patients"].as_array().map(Vec::as_slice).unwrap_or_default();
    for (index, patient) in patients.iter().enumerate() {
        if !is_valid_patient(patient) {
            return Err(BackupError::InvalidPatient { index });
        }
    }

    Ok(())
}

// A one-word name legitimately has an empty last name, so only presence is
// required there.
fn is_valid_patient(patient: &Value) -> bool {
    let non_empty = |key: &str| {
        patient
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };
    non_empty("id")
        && non_empty("firstName")
        && patient.get("lastName").is_some_and(Value::is_string)
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}
