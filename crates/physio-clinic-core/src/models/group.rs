//! Treatment groups, memberships and therapist assignments.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{new_id, now_millis, Id, Timestamp};

/// Default capacity for a newly created group.
pub const DEFAULT_GROUP_CAPACITY: u32 = 15;

/// Default schedule label for a newly created group.
pub const DEFAULT_GROUP_WHEN: &str = "open";

fn default_capacity() -> u32 {
    DEFAULT_GROUP_CAPACITY
}

/// A treatment group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Id,
    pub name: String,
    /// Number of enrolled slots
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Cached `capacity - enrolled rows`. Maintained by the capacity engine,
    /// never authoritative.
    #[serde(default)]
    pub available: i64,
    /// Free-form schedule label
    #[serde(default)]
    pub when: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

/// Fields supplied when creating a group.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroup {
    pub name: String,
    pub capacity: u32,
    pub when: String,
}

impl NewGroup {
    /// A group with default capacity and schedule.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: DEFAULT_GROUP_CAPACITY,
            when: DEFAULT_GROUP_WHEN.to_string(),
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Group {
    pub fn new(fields: NewGroup) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            name: fields.name,
            capacity: fields.capacity,
            available: i64::from(fields.capacity),
            when: fields.when,
            created_at: now,
            updated_at: now,
        }
    }

    /// `capacity - enrolled`, as stored in the `available` cache.
    pub fn free_slots(&self, enrolled: usize) -> i64 {
        i64::from(self.capacity) - enrolled as i64
    }
}

/// Partial update for a group. `None` fields are left unchanged.
///
/// `available` is not patchable; it is recomputed by the capacity engine.
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub capacity: Option<u32>,
    pub when: Option<String>,
}

impl GroupPatch {
    pub fn apply(self, group: &mut Group) {
        if let Some(name) = self.name {
            group.name = name;
        }
        if let Some(capacity) = self.capacity {
            group.capacity = capacity;
        }
        if let Some(when) = self.when {
            group.when = when;
        }
        group.updated_at = now_millis();
    }
}

/// Whether a membership occupies a capacity slot.
///
/// Persisted as the integer flag `enrolled`: `1` enrolled, `0` waitlisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enrollment {
    Waitlisted,
    Enrolled,
}

impl Enrollment {
    pub fn is_enrolled(self) -> bool {
        matches!(self, Enrollment::Enrolled)
    }

    fn flag(self) -> u8 {
        match self {
            Enrollment::Waitlisted => 0,
            Enrollment::Enrolled => 1,
        }
    }
}

impl Serialize for Enrollment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.flag())
    }
}

impl<'de> Deserialize<'de> for Enrollment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Enrollment::Waitlisted),
            1 => Ok(Enrollment::Enrolled),
            other => Err(serde::de::Error::custom(format!(
                "enrolled flag must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

/// A patient's membership in a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Id,
    pub patient_id: Id,
    pub group_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    pub enrolled: Enrollment,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
    #[serde(default)]
    pub status_id: Id,
}

impl Membership {
    pub fn new(
        group_id: Id,
        patient_id: Id,
        receipt: Option<String>,
        enrolled: Enrollment,
        status_id: Id,
    ) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            patient_id,
            group_id,
            receipt,
            enrolled,
            created_at: now,
            updated_at: now,
            status_id,
        }
    }

    pub fn is_enrolled(&self) -> bool {
        self.enrolled.is_enrolled()
    }

    pub fn is_waitlisted(&self) -> bool {
        !self.is_enrolled()
    }

    pub fn matches(&self, group_id: &str, patient_id: &str) -> bool {
        self.group_id == group_id && self.patient_id == patient_id
    }
}

/// The therapist leading a group. At most one row per group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TherapistAssignment {
    pub id: Id,
    pub therapist_id: Id,
    pub group_id: Id,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
    #[serde(default)]
    pub status_id: Id,
}

impl TherapistAssignment {
    pub fn new(group_id: Id, therapist_id: Id, status_id: Id) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            therapist_id,
            group_id,
            created_at: now,
            updated_at: now,
            status_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_defaults() {
        let group = Group::new(NewGroup::named("Back pain"));
        assert_eq!(group.capacity, DEFAULT_GROUP_CAPACITY);
        assert_eq!(group.available, 15);
        assert_eq!(group.when, "open");
    }

    #[test]
    fn test_enrollment_serializes_as_flag() {
        let membership = Membership::new(
            "g1".into(),
            "p1".into(),
            None,
            Enrollment::Waitlisted,
            "s1".into(),
        );
        let value = serde_json::to_value(&membership).unwrap();
        assert_eq!(value["enrolled"], 0);
        assert!(value.get("receipt").is_none());

        let back: Membership = serde_json::from_value(value).unwrap();
        assert!(back.is_waitlisted());
    }

    #[test]
    fn test_enrollment_rejects_other_flags() {
        let result: Result<Enrollment, _> = serde_json::from_str("2");
        assert!(result.is_err());
    }

    #[test]
    fn test_free_slots_can_go_negative() {
        let group = Group::new(NewGroup::named("Small").with_capacity(1));
        assert_eq!(group.free_slots(3), -2);
    }
}
