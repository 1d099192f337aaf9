//! Clinic-wide settings (singleton row).

use serde::{Deserialize, Serialize};

use super::{new_id, now_millis, Id, Timestamp};

pub const DEFAULT_CLINIC_NAME: &str = "Physiotherapy Clinic";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: Id,
    #[serde(default)]
    pub clinic_name: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Default for Settings {
    fn default() -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            clinic_name: DEFAULT_CLINIC_NAME.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
