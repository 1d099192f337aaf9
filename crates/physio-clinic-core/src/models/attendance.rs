//! Attendance records.

use serde::{Deserialize, Serialize};

use super::{new_id, now_millis, Id, Timestamp};

/// One patient present at one group session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Id,
    pub patient_id: Id,
    pub group_id: Id,
    #[serde(default)]
    pub therapist_id: Id,
    /// Session date as entered by the UI (opaque string key)
    pub date: String,
    /// Attended as a makeup for a missed session
    #[serde(default)]
    pub is_makeup: bool,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl Attendance {
    pub fn new(
        group_id: Id,
        patient_id: Id,
        therapist_id: Id,
        date: String,
        is_makeup: bool,
    ) -> Self {
        Self {
            id: new_id(),
            patient_id,
            group_id,
            therapist_id,
            date,
            is_makeup,
            created_at: now_millis(),
        }
    }

    pub fn matches(&self, group_id: &str, patient_id: &str, date: &str) -> bool {
        self.group_id == group_id && self.patient_id == patient_id && self.date == date
    }
}
