//! Patient operations.

use crate::capacity::CapacityEngine;
use crate::models::{Database, Id, NewPatient, Patient, PatientPatch};

impl Database {
    /// Register a patient with active status.
    pub fn add_patient(&mut self, fields: NewPatient) -> Id {
        let patient = Patient::new(fields, self.active_status_id());
        let id = patient.id.clone();
        self.patients.push(patient);
        id
    }

    /// Existing patient with this national id, or a newly registered one.
    pub fn find_or_add_patient(&mut self, fields: NewPatient) -> Id {
        match self.patient_by_national_id(&fields.national_id) {
            Some(existing) => existing.id.clone(),
            None => self.add_patient(fields),
        }
    }

    pub fn update_patient(&mut self, id: &str, patch: PatientPatch) -> bool {
        match self.patients.iter_mut().find(|p| p.id == id) {
            Some(patient) => {
                patch.apply(patient);
                true
            }
            None => false,
        }
    }

    /// Delete a patient with their memberships and attendance.
    ///
    /// Memberships are released through the capacity engine so enrolled
    /// slots pass to waitlisted patients. Payments are kept as history.
    pub fn remove_patient(&mut self, id: &str) -> bool {
        let Some(index) = self.patients.iter().position(|p| p.id == id) else {
            return false;
        };
        self.patients.remove(index);

        let groups: Vec<Id> = self
            .patients_in_groups
            .iter()
            .filter(|m| m.patient_id == id)
            .map(|m| m.group_id.clone())
            .collect();
        let mut engine = CapacityEngine::new(self);
        for group_id in &groups {
            engine.remove_membership(group_id, id);
        }

        self.attendance.retain(|a| a.patient_id != id);
        true
    }

    /// Patients whose name contains `query` (case-insensitive) or whose
    /// national id starts with it.
    pub fn search_patients(&self, query: &str) -> Vec<&Patient> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.patients.iter().collect();
        }
        self.patients
            .iter()
            .filter(|p| {
                p.first_name.to_lowercase().contains(&needle)
                    || p.last_name.to_lowercase().contains(&needle)
                    || p.national_id.starts_with(&needle)
            })
            .collect()
    }
}
