//! The aggregate that owns every entity collection.

use serde::{Deserialize, Serialize};

use super::{
    Attendance, Group, Membership, Patient, Payment, Settings, Status, StatusCode, Therapist,
    TherapistAssignment,
};

/// All clinic state, persisted and restored as one snapshot.
///
/// No entity exists outside this value. Every mutation goes through
/// `&mut Database`, either via the registry CRUD methods or the
/// [`CapacityEngine`](crate::capacity::CapacityEngine).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub statuses: Vec<Status>,
    pub therapists: Vec<Therapist>,
    pub patients: Vec<Patient>,
    pub groups: Vec<Group>,
    pub patients_in_groups: Vec<Membership>,
    pub therapists_in_groups: Vec<TherapistAssignment>,
    pub attendance: Vec<Attendance>,
    pub patient_payments: Vec<Payment>,
    pub settings: Vec<Settings>,
}

impl Database {
    /// A fresh database: the two status rows and default settings.
    pub fn seed() -> Self {
        Self {
            statuses: vec![
                Status::new(StatusCode::Active),
                Status::new(StatusCode::Inactive),
            ],
            settings: vec![Settings::default()],
            ..Default::default()
        }
    }

    /// Id of the status row with the given code.
    pub fn status_id(&self, code: StatusCode) -> Option<&str> {
        self.statuses
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.id.as_str())
    }

    /// Id stamped on newly created rows. Empty if the active status is missing.
    pub(crate) fn active_status_id(&self) -> String {
        self.status_id(StatusCode::Active)
            .map(str::to_string)
            .unwrap_or_default()
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub(crate) fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn patient_by_national_id(&self, national_id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.national_id == national_id)
    }

    pub fn therapist(&self, id: &str) -> Option<&Therapist> {
        self.therapists.iter().find(|t| t.id == id)
    }

    pub fn membership(&self, group_id: &str, patient_id: &str) -> Option<&Membership> {
        self.patients_in_groups
            .iter()
            .find(|m| m.matches(group_id, patient_id))
    }

    /// All membership rows of a group, enrolled and waitlisted.
    pub fn memberships_in_group<'a>(
        &'a self,
        group_id: &str,
    ) -> impl Iterator<Item = &'a Membership> + 'a {
        let group_id = group_id.to_string();
        self.patients_in_groups
            .iter()
            .filter(move |m| m.group_id == group_id)
    }

    /// Raw count of `enrolled = 1` rows in a group.
    pub fn enrolled_count(&self, group_id: &str) -> usize {
        self.memberships_in_group(group_id)
            .filter(|m| m.is_enrolled())
            .count()
    }

    /// Current settings row, if any.
    pub fn settings(&self) -> Option<&Settings> {
        self.settings.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_two_statuses_and_settings() {
        let db = Database::seed();
        assert_eq!(db.statuses.len(), 2);
        assert!(db.status_id(StatusCode::Active).is_some());
        assert!(db.status_id(StatusCode::Inactive).is_some());
        assert_eq!(db.settings.len(), 1);
        assert!(db.patients.is_empty());
    }

    #[test]
    fn test_wire_collection_names() {
        let value = serde_json::to_value(Database::seed()).unwrap();
        for key in [
            "statuses",
            "therapists",
            "patients",
            "groups",
            "patientsInGroups",
            "therapistsInGroups",
            "attendance",
            "patientPayments",
            "settings",
        ] {
            assert!(value[key].is_array(), "missing collection {}", key);
        }
    }
}
