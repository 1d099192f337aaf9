//! CRUD surface over the [`Database`](crate::models::Database) aggregate.
//!
//! Operations referencing an id that does not exist are silent no-ops and
//! report `false`. Deleting a parent cascades to the rows that reference it.

mod groups;
mod patients;
mod therapists;

use crate::models::{now_millis, Database, Settings};

impl Database {
    /// Rename the clinic, creating the settings row if it is missing.
    pub fn update_settings(&mut self, clinic_name: String) {
        match self.settings.first_mut() {
            Some(settings) => {
                settings.clinic_name = clinic_name;
                settings.updated_at = now_millis();
            }
            None => self.settings.push(Settings {
                clinic_name,
                ..Default::default()
            }),
        }
    }
}
