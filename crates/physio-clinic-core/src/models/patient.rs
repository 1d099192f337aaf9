//! Patient models.

use serde::{Deserialize, Serialize};

use super::{new_id, now_millis, Id, Timestamp};

/// A patient record.
///
/// `national_id` is the identity used when matching imported rows against
/// existing patients; `id` is the internal key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Internal UUID
    pub id: Id,
    /// Government-issued identity number
    #[serde(default)]
    pub national_id: String,
    /// Contact phone (may be empty)
    #[serde(default)]
    pub phone: String,
    /// Given name
    pub first_name: String,
    /// Family name (may be empty)
    #[serde(default)]
    pub last_name: String,
    /// Creation timestamp (ms)
    #[serde(default)]
    pub created_at: Timestamp,
    /// Last update timestamp (ms)
    #[serde(default)]
    pub updated_at: Timestamp,
    /// Status row reference
    #[serde(default)]
    pub status_id: Id,
}

/// Fields supplied when registering a patient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPatient {
    pub national_id: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewPatient {
    /// Build from a single "first last..." name; everything after the first
    /// whitespace-separated token becomes the last name.
    pub fn from_full_name(full_name: &str, national_id: String, phone: String) -> Self {
        let mut parts = full_name.split_whitespace();
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");
        Self {
            national_id,
            phone,
            first_name,
            last_name,
        }
    }
}

impl Patient {
    pub fn new(fields: NewPatient, status_id: Id) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            national_id: fields.national_id,
            phone: fields.phone,
            first_name: fields.first_name,
            last_name: fields.last_name,
            created_at: now,
            updated_at: now,
            status_id,
        }
    }

    /// Display name, "first last".
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Partial update for a patient. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PatientPatch {
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status_id: Option<Id>,
}

impl PatientPatch {
    pub fn apply(self, patient: &mut Patient) {
        if let Some(national_id) = self.national_id {
            patient.national_id = national_id;
        }
        if let Some(phone) = self.phone {
            patient.phone = phone;
        }
        if let Some(first_name) = self.first_name {
            patient.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            patient.last_name = last_name;
        }
        if let Some(status_id) = self.status_id {
            patient.status_id = status_id;
        }
        patient.updated_at = now_millis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_full_name_splits_on_first_token() {
        let fields = NewPatient::from_full_name("  Miriam  Cohen Levi ", "987".into(), "".into());
        assert_eq!(fields.first_name, "Miriam");
        assert_eq!(fields.last_name, "Cohen Levi");
    }

    #[test]
    fn test_from_full_name_single_token() {
        let fields = NewPatient::from_full_name("Dana", "1".into(), "".into());
        assert_eq!(fields.first_name, "Dana");
        assert_eq!(fields.last_name, "");
    }

    #[test]
    fn test_patient_wire_format_is_camel_case() {
        let patient = Patient::new(
            NewPatient {
                national_id: "123456789".into(),
                phone: "050".into(),
                first_name: "Israel".into(),
                last_name: "Israeli".into(),
            },
            "status-active".into(),
        );
        let value = serde_json::to_value(&patient).unwrap();
        assert_eq!(value["nationalId"], "123456789");
        assert_eq!(value["firstName"], "Israel");
        assert_eq!(value["statusId"], "status-active");
        assert_eq!(patient.full_name(), "Israel Israeli");
        assert_eq!(patient.id.len(), 36); // UUID format
    }
}
