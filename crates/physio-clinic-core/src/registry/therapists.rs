//! Therapist operations.

use crate::models::{Database, Id, Therapist, TherapistPatch};

impl Database {
    /// Register a therapist with active status.
    pub fn add_therapist(&mut self, name: String) -> Id {
        let therapist = Therapist::new(name, self.active_status_id());
        let id = therapist.id.clone();
        self.therapists.push(therapist);
        id
    }

    pub fn update_therapist(&mut self, id: &str, patch: TherapistPatch) -> bool {
        match self.therapists.iter_mut().find(|t| t.id == id) {
            Some(therapist) => {
                patch.apply(therapist);
                true
            }
            None => false,
        }
    }

    /// Delete a therapist and every group assignment pointing at them.
    pub fn remove_therapist(&mut self, id: &str) -> bool {
        let before = self.therapists.len();
        self.therapists.retain(|t| t.id != id);
        self.therapists_in_groups.retain(|a| a.therapist_id != id);
        self.therapists.len() != before
    }
}
