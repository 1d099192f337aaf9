//! Therapist models.

use serde::{Deserialize, Serialize};

use super::{new_id, now_millis, Id, Timestamp};

/// A therapist who leads treatment groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Therapist {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
    #[serde(default)]
    pub status_id: Id,
}

impl Therapist {
    pub fn new(name: String, status_id: Id) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            name,
            created_at: now,
            updated_at: now,
            status_id,
        }
    }
}

/// Partial update for a therapist. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TherapistPatch {
    pub name: Option<String>,
    pub status_id: Option<Id>,
}

impl TherapistPatch {
    pub fn apply(self, therapist: &mut Therapist) {
        if let Some(name) = self.name {
            therapist.name = name;
        }
        if let Some(status_id) = self.status_id {
            therapist.status_id = status_id;
        }
        therapist.updated_at = now_millis();
    }
}
