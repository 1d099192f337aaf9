//! Attendance marking, keyed by (group, patient, date).

use std::collections::HashSet;

use crate::models::{Attendance, Database, Id};

impl Database {
    /// Record that a patient attended a session.
    ///
    /// Re-marking the same (group, patient, date) updates the therapist and
    /// makeup flag in place instead of adding a second row.
    pub fn mark_attendance(
        &mut self,
        group_id: &str,
        patient_id: &str,
        therapist_id: &str,
        date: &str,
        is_makeup: bool,
    ) {
        match self
            .attendance
            .iter_mut()
            .find(|a| a.matches(group_id, patient_id, date))
        {
            Some(existing) => {
                existing.therapist_id = therapist_id.to_string();
                existing.is_makeup = is_makeup;
            }
            None => self.attendance.push(Attendance::new(
                group_id.to_string(),
                patient_id.to_string(),
                therapist_id.to_string(),
                date.to_string(),
                is_makeup,
            )),
        }
    }

    /// Remove an attendance mark. Returns `false` if there was none.
    pub fn unmark_attendance(&mut self, group_id: &str, patient_id: &str, date: &str) -> bool {
        let before = self.attendance.len();
        self.attendance
            .retain(|a| !a.matches(group_id, patient_id, date));
        self.attendance.len() != before
    }

    /// Patients marked present for a group session.
    pub fn attendance_set(&self, group_id: &str, date: &str) -> HashSet<Id> {
        self.attendance
            .iter()
            .filter(|a| a.group_id == group_id && a.date == date)
            .map(|a| a.patient_id.clone())
            .collect()
    }

    /// Attendance rows of one patient, oldest session first by creation.
    pub fn attendance_for_patient(&self, patient_id: &str) -> Vec<&Attendance> {
        let mut rows: Vec<&Attendance> = self
            .attendance
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .collect();
        rows.sort_by_key(|a| a.created_at);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_twice_keeps_one_row() {
        let mut db = Database::seed();
        db.mark_attendance("g1", "p1", "t1", "2025-11-03", false);
        db.mark_attendance("g1", "p1", "t2", "2025-11-03", true);

        assert_eq!(db.attendance.len(), 1);
        let row = &db.attendance[0];
        assert_eq!(row.therapist_id, "t2");
        assert!(row.is_makeup);
    }

    #[test]
    fn test_distinct_dates_are_distinct_rows() {
        let mut db = Database::seed();
        db.mark_attendance("g1", "p1", "t1", "2025-11-03", false);
        db.mark_attendance("g1", "p1", "t1", "2025-11-10", false);
        assert_eq!(db.attendance.len(), 2);
        assert_eq!(db.attendance_for_patient("p1").len(), 2);
    }

    #[test]
    fn test_unmark() {
        let mut db = Database::seed();
        db.mark_attendance("g1", "p1", "t1", "2025-11-03", false);
        assert!(db.unmark_attendance("g1", "p1", "2025-11-03"));
        assert!(!db.unmark_attendance("g1", "p1", "2025-11-03"));
        assert!(db.attendance.is_empty());
    }

    #[test]
    fn test_attendance_set() {
        let mut db = Database::seed();
        db.mark_attendance("g1", "p1", "t1", "2025-11-03", false);
        db.mark_attendance("g1", "p2", "t1", "2025-11-03", true);
        db.mark_attendance("g1", "p3", "t1", "2025-11-10", false);
        db.mark_attendance("g2", "p4", "t1", "2025-11-03", false);

        let present = db.attendance_set("g1", "2025-11-03");
        assert_eq!(present.len(), 2);
        assert!(present.contains("p1"));
        assert!(present.contains("p2"));
    }
}
