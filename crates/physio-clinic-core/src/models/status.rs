//! Status lookup rows.

use serde::{Deserialize, Serialize};

use super::{new_id, Id};

/// Status code carried by the two seeded status rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    Active,
    Inactive,
}

/// A status row, referenced by `statusId` on most entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Status {
    pub id: Id,
    pub code: StatusCode,
}

impl Status {
    pub fn new(code: StatusCode) -> Self {
        Self { id: new_id(), code }
    }
}
