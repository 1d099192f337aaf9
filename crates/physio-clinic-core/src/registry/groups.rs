//! Group, therapist-assignment and membership-receipt operations.

use crate::models::{
    now_millis, Database, Group, GroupPatch, Id, NewGroup, Therapist, TherapistAssignment,
};

impl Database {
    /// Create an empty group; `available` starts at `capacity`.
    pub fn add_group(&mut self, fields: NewGroup) -> Id {
        let group = Group::new(fields);
        let id = group.id.clone();
        self.groups.push(group);
        id
    }

    /// Patch a group. A capacity change recomputes `available` from the
    /// enrolled rows; it does not enroll or waitlist anyone.
    pub fn update_group(&mut self, id: &str, patch: GroupPatch) -> bool {
        let enrolled = self.enrolled_count(id);
        match self.group_mut(id) {
            Some(group) => {
                let capacity_changed = patch.capacity.is_some();
                patch.apply(group);
                if capacity_changed {
                    group.available = group.free_slots(enrolled);
                }
                true
            }
            None => false,
        }
    }

    /// Delete a group with its memberships, therapist assignment and attendance.
    pub fn remove_group(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        self.patients_in_groups.retain(|m| m.group_id != id);
        self.therapists_in_groups.retain(|a| a.group_id != id);
        self.attendance.retain(|a| a.group_id != id);
        self.groups.len() != before
    }

    /// Make `therapist_id` the group's only therapist, replacing any prior one.
    pub fn set_therapist_for_group(&mut self, group_id: &str, therapist_id: &str) -> bool {
        if self.group(group_id).is_none() || self.therapist(therapist_id).is_none() {
            return false;
        }
        self.therapists_in_groups.retain(|a| a.group_id != group_id);
        let status_id = self.active_status_id();
        self.therapists_in_groups.push(TherapistAssignment::new(
            group_id.to_string(),
            therapist_id.to_string(),
            status_id,
        ));
        true
    }

    pub fn therapist_for_group(&self, group_id: &str) -> Option<&Therapist> {
        self.therapists_in_groups
            .iter()
            .find(|a| a.group_id == group_id)
            .and_then(|a| self.therapist(&a.therapist_id))
    }

    /// Replace the receipt recorded on a membership.
    pub fn update_membership_receipt(
        &mut self,
        group_id: &str,
        patient_id: &str,
        receipt: String,
    ) -> bool {
        match self
            .patients_in_groups
            .iter_mut()
            .find(|m| m.matches(group_id, patient_id))
        {
            Some(membership) => {
                membership.receipt = Some(receipt);
                membership.updated_at = now_millis();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::CapacityEngine;
    use crate::models::NewPatient;

    fn setup_db() -> (Database, Id, Id) {
        let mut db = Database::seed();
        let group = db.add_group(NewGroup::named("Shoulders").with_capacity(4));
        let patient = db.add_patient(NewPatient {
            national_id: "1".into(),
            first_name: "Avi".into(),
            ..Default::default()
        });
        CapacityEngine::new(&mut db).add_membership(&group, &patient, Some("R-1".into()));
        (db, group, patient)
    }

    #[test]
    fn test_capacity_patch_recomputes_available() {
        let (mut db, group, _) = setup_db();
        assert_eq!(db.group(&group).unwrap().available, 3);

        assert!(db.update_group(
            &group,
            GroupPatch {
                capacity: Some(10),
                ..Default::default()
            }
        ));
        assert_eq!(db.group(&group).unwrap().available, 9);
    }

    #[test]
    fn test_capacity_raise_does_not_promote_waitlist() {
        let mut db = Database::seed();
        let group = db.add_group(NewGroup::named("Knees").with_capacity(1));
        let first = db.add_patient(NewPatient {
            national_id: "1".into(),
            first_name: "Avi".into(),
            ..Default::default()
        });
        let second = db.add_patient(NewPatient {
            national_id: "2".into(),
            first_name: "Ben".into(),
            ..Default::default()
        });
        let mut engine = CapacityEngine::new(&mut db);
        engine.add_membership(&group, &first, None);
        engine.add_membership(&group, &second, None);

        db.update_group(
            &group,
            GroupPatch {
                capacity: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(db.group(&group).unwrap().available, 2);
        assert!(db.membership(&group, &second).unwrap().is_waitlisted());

        // The waitlisted row moves up only when an enrolled member leaves.
        CapacityEngine::new(&mut db).remove_membership(&group, &first);
        assert!(db.membership(&group, &second).unwrap().is_enrolled());
        assert_eq!(db.group(&group).unwrap().available, 2);
    }

    #[test]
    fn test_rename_keeps_available() {
        let (mut db, group, _) = setup_db();
        db.group_mut(&group).unwrap().available = 3;
        db.update_group(
            &group,
            GroupPatch {
                name: Some("Upper body".into()),
                ..Default::default()
            },
        );
        let g = db.group(&group).unwrap();
        assert_eq!(g.name, "Upper body");
        assert_eq!(g.available, 3);
    }

    #[test]
    fn test_remove_group_cascades() {
        let (mut db, group, patient) = setup_db();
        let therapist = db.add_therapist("Noa".into());
        db.set_therapist_for_group(&group, &therapist);
        db.mark_attendance(&group, &patient, &therapist, "2025-11-03", false);

        assert!(db.remove_group(&group));
        assert!(db.patients_in_groups.is_empty());
        assert!(db.therapists_in_groups.is_empty());
        assert!(db.attendance.is_empty());
        assert!(db.patient(&patient).is_some());
    }

    #[test]
    fn test_single_therapist_per_group() {
        let (mut db, group, _) = setup_db();
        let first = db.add_therapist("Noa".into());
        let second = db.add_therapist("Eli".into());

        db.set_therapist_for_group(&group, &first);
        db.set_therapist_for_group(&group, &second);

        assert_eq!(db.therapists_in_groups.len(), 1);
        assert_eq!(db.therapist_for_group(&group).unwrap().id, second);
    }

    #[test]
    fn test_assign_unknown_ids_is_noop() {
        let (mut db, group, _) = setup_db();
        assert!(!db.set_therapist_for_group(&group, "ghost"));
        assert!(!db.set_therapist_for_group("ghost", "ghost"));
        assert!(db.therapists_in_groups.is_empty());
    }

    #[test]
    fn test_update_membership_receipt() {
        let (mut db, group, patient) = setup_db();
        assert!(db.update_membership_receipt(&group, &patient, "R-2".into()));
        assert_eq!(
            db.membership(&group, &patient).unwrap().receipt.as_deref(),
            Some("R-2")
        );
        assert!(!db.update_membership_receipt(&group, "ghost", "R-3".into()));
    }
}
