//! Read-only availability and waitlist queries.

use serde::{Deserialize, Serialize};

use crate::models::{Database, Membership, YearMonth};

/// Capacity summary for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAvailability {
    pub group_id: String,
    pub capacity: u32,
    /// Cached counter as stored on the group
    pub available: i64,
    pub enrolled: usize,
    pub waitlisted: usize,
    /// Enrolled members paid up for the month
    pub active_subscriptions: usize,
    /// `capacity - active_subscriptions`
    pub available_with_active_subscriptions: i64,
}

impl Database {
    /// Enrolled members of the group with a payment covering `month`.
    pub fn patients_with_active_subscriptions(
        &self,
        group_id: &str,
        month: YearMonth,
    ) -> Vec<&Membership> {
        self.memberships_in_group(group_id)
            .filter(|m| m.is_enrolled())
            .filter(|m| self.has_active_subscription(&m.patient_id, group_id, month))
            .collect()
    }

    pub fn active_subscription_count(&self, group_id: &str, month: YearMonth) -> usize {
        self.patients_with_active_subscriptions(group_id, month).len()
    }

    /// `capacity - active_subscription_count`, or `0` for an unknown group.
    ///
    /// Waitlisted members never count: they hold no slot.
    pub fn available_with_active_subscriptions(&self, group_id: &str, month: YearMonth) -> i64 {
        match self.group(group_id) {
            Some(group) => group.free_slots(self.active_subscription_count(group_id, month)),
            None => 0,
        }
    }

    /// Waitlisted members in promotion order (oldest first).
    pub fn waitlist(&self, group_id: &str) -> Vec<&Membership> {
        let mut waiting: Vec<&Membership> = self
            .memberships_in_group(group_id)
            .filter(|m| m.is_waitlisted())
            .collect();
        waiting.sort_by_key(|m| m.created_at);
        waiting
    }

    /// Enrolled members of the group.
    pub fn enrolled_members(&self, group_id: &str) -> Vec<&Membership> {
        self.memberships_in_group(group_id)
            .filter(|m| m.is_enrolled())
            .collect()
    }

    pub fn group_availability(
        &self,
        group_id: &str,
        month: YearMonth,
    ) -> Option<GroupAvailability> {
        let group = self.group(group_id)?;
        let active_subscriptions = self.active_subscription_count(group_id, month);
        Some(GroupAvailability {
            group_id: group.id.clone(),
            capacity: group.capacity,
            available: group.available,
            enrolled: self.enrolled_count(group_id),
            waitlisted: self.waitlist(group_id).len(),
            active_subscriptions,
            available_with_active_subscriptions: group.free_slots(active_subscriptions),
        })
    }
}
