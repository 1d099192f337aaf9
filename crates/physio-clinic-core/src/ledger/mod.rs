//! Attendance and payment ledgers.

mod attendance;
mod payments;
