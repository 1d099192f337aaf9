//! Domain models for the clinic system.

mod attendance;
mod database;
mod group;
mod patient;
mod payment;
mod settings;
mod status;
mod therapist;

pub use attendance::*;
pub use database::*;
pub use group::*;
pub use patient::*;
pub use payment::*;
pub use settings::*;
pub use status::*;
pub use therapist::*;

/// Entity identifier (UUID v4 string).
pub type Id = String;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Current time as a [`Timestamp`].
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh entity id.
pub fn new_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
