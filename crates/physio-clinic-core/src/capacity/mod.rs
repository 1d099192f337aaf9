//! Group capacity and waitlist reconciliation.
//!
//! Membership rows are either enrolled (occupying a slot) or waitlisted.
//! Every group carries a cached `available` counter that must equal
//! `capacity - enrolled rows` once an operation returns.
//!
//! Whether a new member is enrolled depends on the [`AdmissionPolicy`]:
//!
//! ```text
//! RawEnrollment         admit if capacity - enrolled rows > 0
//! ActiveSubscriptions   admit if capacity - enrolled rows WITH a payment
//!                       covering this month > 0
//! ```
//!
//! The cache is always maintained from raw enrolled rows. Under
//! `ActiveSubscriptions`, enrolled patients without a current payment do not
//! block admission, so a group can hold more enrolled rows than its
//! capacity and `available` can go negative.
//!
//! A waitlisted row only becomes enrolled when an enrolled row of the same
//! group is removed; the oldest waitlisted row by `created_at` takes the
//! freed slot. Rows with equal `created_at` are promoted in storage order,
//! which is not a guaranteed ordering.

mod availability;

pub use availability::*;

use crate::models::{now_millis, Database, Enrollment, Id, Membership, YearMonth};

/// How `add_membership` decides between enrolling and waitlisting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// Count every enrolled row against capacity.
    #[default]
    RawEnrollment,
    /// Count only enrolled rows whose patient has paid for the current month.
    ActiveSubscriptions,
}

impl std::str::FromStr for AdmissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "raw-enrollment" => Ok(AdmissionPolicy::RawEnrollment),
            "subscriptions" | "active-subscriptions" => Ok(AdmissionPolicy::ActiveSubscriptions),
            other => Err(format!("unknown admission policy: {}", other)),
        }
    }
}

/// What happened to a group when a membership was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipRemoval {
    /// The row was waitlisted; capacity is unaffected.
    WasWaitlisted,
    /// An enrolled row left and the oldest waitlisted row took its slot.
    Promoted { membership_id: Id, patient_id: Id },
    /// An enrolled row left and nobody was waiting; `available` grew by one.
    SlotFreed,
}

/// Applies membership mutations to a [`Database`] while keeping enrollment
/// flags and `available` counters consistent.
pub struct CapacityEngine<'a> {
    db: &'a mut Database,
    month: YearMonth,
    policy: AdmissionPolicy,
}

impl<'a> CapacityEngine<'a> {
    /// Engine evaluating subscriptions against the current calendar month.
    pub fn new(db: &'a mut Database) -> Self {
        Self::as_of(db, YearMonth::current())
    }

    /// Engine evaluating subscriptions against a fixed month.
    pub fn as_of(db: &'a mut Database, month: YearMonth) -> Self {
        Self {
            db,
            month,
            policy: AdmissionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Month used for subscription checks.
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Add a patient to a group, enrolling or waitlisting them.
    ///
    /// Returns `None` without touching anything if the pair is already a
    /// member or the group does not exist.
    pub fn add_membership(
        &mut self,
        group_id: &str,
        patient_id: &str,
        receipt: Option<String>,
    ) -> Option<Enrollment> {
        if self.db.membership(group_id, patient_id).is_some() {
            return None;
        }
        self.db.group(group_id)?;

        let open_slots = self.open_slots(group_id);
        let enrolled = if open_slots > 0 {
            Enrollment::Enrolled
        } else {
            Enrollment::Waitlisted
        };
        tracing::debug!(
            group_id,
            patient_id,
            open_slots,
            ?enrolled,
            "admitting patient to group"
        );

        let status_id = self.db.active_status_id();
        self.db.patients_in_groups.push(Membership::new(
            group_id.to_string(),
            patient_id.to_string(),
            receipt,
            enrolled,
            status_id,
        ));

        if enrolled.is_enrolled() {
            self.refresh_available(group_id);
        }

        Some(enrolled)
    }

    /// Remove a patient from a group, promoting from the waitlist if an
    /// enrolled slot was freed.
    ///
    /// Returns `None` if the patient was not a member.
    pub fn remove_membership(
        &mut self,
        group_id: &str,
        patient_id: &str,
    ) -> Option<MembershipRemoval> {
        let index = self
            .db
            .patients_in_groups
            .iter()
            .position(|m| m.matches(group_id, patient_id))?;
        let removed = self.db.patients_in_groups.remove(index);

        if removed.is_waitlisted() {
            return Some(MembershipRemoval::WasWaitlisted);
        }

        if self.db.group(group_id).is_none() {
            return Some(MembershipRemoval::SlotFreed);
        }

        let next = self
            .db
            .patients_in_groups
            .iter_mut()
            .filter(|m| m.group_id == group_id && m.is_waitlisted())
            .min_by_key(|m| m.created_at);

        match next {
            Some(waiting) => {
                // The promoted row fills exactly the vacated slot, so the
                // cached counter is already right.
                waiting.enrolled = Enrollment::Enrolled;
                waiting.updated_at = now_millis();
                tracing::debug!(
                    group_id,
                    promoted = %waiting.patient_id,
                    "promoted waitlisted patient"
                );
                Some(MembershipRemoval::Promoted {
                    membership_id: waiting.id.clone(),
                    patient_id: waiting.patient_id.clone(),
                })
            }
            None => {
                self.refresh_available(group_id);
                Some(MembershipRemoval::SlotFreed)
            }
        }
    }

    /// Force every group's `available` back to `capacity - enrolled rows`.
    pub fn recalculate_all(&mut self) {
        let now = now_millis();
        let counts: Vec<usize> = self
            .db
            .groups
            .iter()
            .map(|g| self.db.enrolled_count(&g.id))
            .collect();
        for (group, enrolled) in self.db.groups.iter_mut().zip(counts) {
            group.available = group.free_slots(enrolled);
            group.updated_at = now;
        }
    }

    /// Enrolled rows in the group whose patient has a payment covering the
    /// engine's month.
    pub fn active_subscription_count(&self, group_id: &str) -> usize {
        self.db.active_subscription_count(group_id, self.month)
    }

    /// `capacity - active_subscription_count`; `0` for an unknown group.
    pub fn available_with_active_subscriptions(&self, group_id: &str) -> i64 {
        self.db
            .available_with_active_subscriptions(group_id, self.month)
    }

    /// Slots a new member could take under the engine's policy.
    pub fn open_slots(&self, group_id: &str) -> i64 {
        match self.policy {
            AdmissionPolicy::RawEnrollment => self
                .db
                .group(group_id)
                .map(|g| g.free_slots(self.db.enrolled_count(group_id)))
                .unwrap_or(0),
            AdmissionPolicy::ActiveSubscriptions => {
                self.available_with_active_subscriptions(group_id)
            }
        }
    }

    /// Recompute one group's cached counter from raw enrolled rows.
    fn refresh_available(&mut self, group_id: &str) {
        let enrolled = self.db.enrolled_count(group_id);
        if let Some(group) = self.db.group_mut(group_id) {
            group.available = group.free_slots(enrolled);
            group.updated_at = now_millis();
        }
    }
}
