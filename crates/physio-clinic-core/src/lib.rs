//! Physio Clinic Core Library
//!
//! Local-first data core for a physiotherapy clinic running treatment
//! groups: patients, therapists, groups with capacity and waitlists,
//! attendance and monthly payments.
//!
//! # Architecture
//!
//! ```text
//!            Host UI / CLI                    Workbook / backup files
//!                  │                                    │
//!                  ▼                                    ▼
//!   ┌──────────────────────────────┐     ┌─────────────────────────────┐
//!   │ Clinic session               │◀────│ import / backup collaborators│
//!   └──────────────┬───────────────┘     └─────────────────────────────┘
//!                  │ &mut Database
//!      ┌───────────┼─────────────┬──────────────────┐
//!      ▼           ▼             ▼                  ▼
//!  Registry   CapacityEngine   Ledgers          Availability
//!  (CRUD)     (enroll/waitlist (attendance,     queries
//!              /promote)        payments)
//!                  │
//!                  ▼
//!   ┌──────────────────────────────┐
//!   │ Store: snapshot + auto-backup│  SQLite key-value
//!   │ load → migrate → heal        │
//!   └──────────────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **A group's enrolled rows never exceed its capacity through admission.**
//! Members beyond capacity are waitlisted and promoted oldest-first when an
//! enrolled member leaves.
//!
//! # Modules
//!
//! - [`models`]: Domain types and the [`Database`] aggregate
//! - [`registry`]: Entity CRUD with cascading deletes
//! - [`capacity`]: Capacity and waitlist engine, availability queries
//! - [`ledger`]: Attendance marks and payment records
//! - [`db`]: SQLite key-value store, snapshot persistence and migration
//! - [`backup`]: Backup export/import and CSV tables
//! - [`import`]: Roster workbook import
//! - [`clinic`]: Session binding the database to its store

pub mod backup;
pub mod capacity;
pub mod clinic;
pub mod db;
pub mod import;
pub mod ledger;
pub mod models;
pub mod registry;

// Re-export commonly used types
pub use backup::{BackupError, CsvTable};
pub use capacity::{AdmissionPolicy, CapacityEngine, GroupAvailability, MembershipRemoval};
pub use clinic::{Clinic, ClinicError, ClinicResult};
pub use db::{Store, StoreError};
pub use import::{ImportError, ImportSummary, Sheet, SheetRow, Workbook, WorkbookImporter};
pub use models::{
    Attendance, Database, Enrollment, Group, Membership, NewGroup, NewPatient, NewPayment,
    Patient, Payment, Therapist, YearMonth,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use models::{GroupPatch, PatientPatch, PaymentPatch, TherapistPatch};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicCoreError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ClinicError> for ClinicCoreError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::Store(e) => ClinicCoreError::StorageError(e.to_string()),
            ClinicError::Backup(e) => ClinicCoreError::InvalidBackup(e.to_string()),
            ClinicError::Import(e) => ClinicCoreError::ImportError(e.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicCoreError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicCoreError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a clinic store at the given path.
#[uniffi::export]
pub fn open_clinic(path: String) -> Result<Arc<ClinicCore>, ClinicCoreError> {
    let clinic = Clinic::open(&path)?;
    Ok(Arc::new(ClinicCore {
        clinic: Arc::new(Mutex::new(clinic)),
    }))
}

/// Create an in-memory clinic (for testing).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Result<Arc<ClinicCore>, ClinicCoreError> {
    let clinic = Clinic::open_in_memory()?;
    Ok(Arc::new(ClinicCore {
        clinic: Arc::new(Mutex::new(clinic)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    clinic: Arc<Mutex<Clinic>>,
}

#[uniffi::export]
impl ClinicCore {
    /// Switch between raw-enrollment and subscription-aware admission.
    pub fn set_admission_policy(&self, policy: String) -> Result<(), ClinicCoreError> {
        let policy = policy
            .parse::<AdmissionPolicy>()
            .map_err(ClinicCoreError::InvalidInput)?;
        let mut clinic = self.clinic.lock()?;
        clinic.set_policy(policy);
        Ok(())
    }

    // =========================================================================
    // Therapist Operations
    // =========================================================================

    pub fn list_therapists(&self) -> Result<Vec<FfiTherapist>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.db().therapists.iter().cloned().map(Into::into).collect())
    }

    pub fn add_therapist(&self, name: String) -> Result<String, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.add_therapist(name)?)
    }

    pub fn rename_therapist(&self, id: String, name: String) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        let patch = TherapistPatch {
            name: Some(name),
            ..Default::default()
        };
        Ok(clinic.update_therapist(&id, patch)?)
    }

    pub fn remove_therapist(&self, id: String) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.remove_therapist(&id)?)
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.db().patients.iter().cloned().map(Into::into).collect())
    }

    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.db().patient(&id).cloned().map(Into::into))
    }

    /// Search by name substring or national-id prefix.
    pub fn search_patients(&self, query: String) -> Result<Vec<FfiPatient>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .db()
            .search_patients(&query)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    pub fn add_patient(&self, patient: FfiNewPatient) -> Result<String, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.add_patient(patient.into())?)
    }

    pub fn update_patient(
        &self,
        id: String,
        patch: FfiPatientPatch,
    ) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.update_patient(&id, patch.into())?)
    }

    /// Remove a patient, their memberships and attendance. Payments are kept.
    pub fn remove_patient(&self, id: String) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.remove_patient(&id)?)
    }

    // =========================================================================
    // Group Operations
    // =========================================================================

    pub fn list_groups(&self) -> Result<Vec<FfiGroup>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.db().groups.iter().cloned().map(Into::into).collect())
    }

    pub fn add_group(
        &self,
        name: String,
        capacity: Option<u32>,
        when: Option<String>,
    ) -> Result<String, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        let mut fields = NewGroup::named(name);
        if let Some(capacity) = capacity {
            fields = fields.with_capacity(capacity);
        }
        if let Some(when) = when {
            fields.when = when;
        }
        Ok(clinic.add_group(fields)?)
    }

    pub fn update_group(
        &self,
        id: String,
        name: Option<String>,
        capacity: Option<u32>,
        when: Option<String>,
    ) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        let patch = GroupPatch {
            name,
            capacity,
            when,
        };
        Ok(clinic.update_group(&id, patch)?)
    }

    pub fn remove_group(&self, id: String) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.remove_group(&id)?)
    }

    pub fn set_therapist_for_group(
        &self,
        group_id: String,
        therapist_id: String,
    ) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.set_therapist_for_group(&group_id, &therapist_id)?)
    }

    pub fn therapist_for_group(
        &self,
        group_id: String,
    ) -> Result<Option<FfiTherapist>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.db().therapist_for_group(&group_id).cloned().map(Into::into))
    }

    // =========================================================================
    // Capacity & Waitlist Operations
    // =========================================================================

    /// Add a patient to a group. `None` if already a member or no such group.
    pub fn add_patient_to_group(
        &self,
        group_id: String,
        patient_id: String,
        receipt: Option<String>,
    ) -> Result<Option<FfiEnrollment>, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        let enrollment = clinic.add_patient_to_group(&group_id, &patient_id, receipt)?;
        Ok(enrollment.map(Into::into))
    }

    pub fn remove_patient_from_group(
        &self,
        group_id: String,
        patient_id: String,
    ) -> Result<Option<FfiMembershipRemoval>, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        let removal = clinic.remove_patient_from_group(&group_id, &patient_id)?;
        Ok(removal.map(Into::into))
    }

    pub fn update_membership_receipt(
        &self,
        group_id: String,
        patient_id: String,
        receipt: String,
    ) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.update_membership_receipt(&group_id, &patient_id, receipt)?)
    }

    pub fn group_members(&self, group_id: String) -> Result<Vec<FfiMembership>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .db()
            .memberships_in_group(&group_id)
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Waitlisted members, next to be promoted first.
    pub fn waitlist(&self, group_id: String) -> Result<Vec<FfiMembership>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .db()
            .waitlist(&group_id)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    pub fn group_availability(
        &self,
        group_id: String,
    ) -> Result<Option<FfiGroupAvailability>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.group_availability(&group_id).map(Into::into))
    }

    /// Force every group's `available` back to `capacity - enrolled`.
    pub fn recalculate_available(&self) -> Result<(), ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.recalculate_available()?)
    }

    // =========================================================================
    // Attendance Operations
    // =========================================================================

    pub fn mark_attendance(
        &self,
        group_id: String,
        patient_id: String,
        therapist_id: String,
        date: String,
        is_makeup: bool,
    ) -> Result<(), ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.mark_attendance(&group_id, &patient_id, &therapist_id, &date, is_makeup)?)
    }

    pub fn unmark_attendance(
        &self,
        group_id: String,
        patient_id: String,
        date: String,
    ) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.unmark_attendance(&group_id, &patient_id, &date)?)
    }

    /// Ids of patients marked present at a session.
    pub fn attendance_for_session(
        &self,
        group_id: String,
        date: String,
    ) -> Result<Vec<String>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        let mut present: Vec<String> = clinic
            .db()
            .attendance_set(&group_id, &date)
            .into_iter()
            .collect();
        present.sort();
        Ok(present)
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    pub fn add_payment(&self, payment: FfiNewPayment) -> Result<String, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.add_payment(payment.into())?)
    }

    pub fn update_payment(
        &self,
        id: String,
        patch: FfiPaymentPatch,
    ) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.update_payment(&id, patch.into())?)
    }

    pub fn delete_payment(&self, id: String) -> Result<bool, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.delete_payment(&id)?)
    }

    /// A patient's payments, newest first.
    pub fn payments_for_patient(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiPayment>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .db()
            .payments_by_patient(&patient_id)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Whether a payment covers `month` (`MM/YYYY`).
    pub fn has_active_subscription(
        &self,
        patient_id: String,
        group_id: String,
        month: String,
    ) -> Result<bool, ClinicCoreError> {
        let month = YearMonth::parse(&month)
            .ok_or_else(|| ClinicCoreError::InvalidInput(format!("not a month: {}", month)))?;
        let clinic = self.clinic.lock()?;
        Ok(clinic.db().has_active_subscription(&patient_id, &group_id, month))
    }

    // =========================================================================
    // Settings, Backup and Import
    // =========================================================================

    pub fn clinic_name(&self) -> Result<String, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic
            .db()
            .settings()
            .map(|s| s.clinic_name.clone())
            .unwrap_or_default())
    }

    pub fn set_clinic_name(&self, name: String) -> Result<(), ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.update_settings(name)?)
    }

    /// Full backup document, BOM-prefixed when `with_bom`.
    pub fn export_backup(&self, with_bom: bool) -> Result<String, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.export_backup(with_bom)?)
    }

    /// Replace all data with a backup document.
    pub fn import_backup(&self, text: String) -> Result<(), ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        Ok(clinic.import_backup(&text)?)
    }

    /// `patients` or `payments` as BOM-prefixed CSV.
    pub fn export_csv(&self, table: String) -> Result<String, ClinicCoreError> {
        let table = table
            .parse::<CsvTable>()
            .map_err(ClinicCoreError::InvalidInput)?;
        let clinic = self.clinic.lock()?;
        Ok(clinic.export_csv(table))
    }

    pub fn import_workbook(
        &self,
        workbook: FfiWorkbook,
    ) -> Result<FfiImportSummary, ClinicCoreError> {
        let mut clinic = self.clinic.lock()?;
        let summary = clinic.import_workbook(&workbook.into())?;
        Ok(summary.into())
    }

    pub fn remember_export_path(&self, path: String) -> Result<(), ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.remember_export_path(&path)?)
    }

    pub fn last_export_path(&self) -> Result<Option<String>, ClinicCoreError> {
        let clinic = self.clinic.lock()?;
        Ok(clinic.last_export_path()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe therapist.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTherapist {
    pub id: String,
    pub name: String,
    pub status_id: String,
}

impl From<Therapist> for FfiTherapist {
    fn from(t: Therapist) -> Self {
        Self {
            id: t.id,
            name: t.name,
            status_id: t.status_id,
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub national_id: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub status_id: String,
}

impl From<Patient> for FfiPatient {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            national_id: p.national_id,
            phone: p.phone,
            first_name: p.first_name,
            last_name: p.last_name,
            status_id: p.status_id,
        }
    }
}

/// FFI-safe new patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub national_id: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<FfiNewPatient> for NewPatient {
    fn from(p: FfiNewPatient) -> Self {
        NewPatient {
            national_id: p.national_id,
            phone: p.phone,
            first_name: p.first_name,
            last_name: p.last_name,
        }
    }
}

/// FFI-safe patient patch; `None` fields are left unchanged.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientPatch {
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<FfiPatientPatch> for PatientPatch {
    fn from(p: FfiPatientPatch) -> Self {
        PatientPatch {
            national_id: p.national_id,
            phone: p.phone,
            first_name: p.first_name,
            last_name: p.last_name,
            status_id: None,
        }
    }
}

/// FFI-safe group.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGroup {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub available: i64,
    pub when: String,
}

impl From<Group> for FfiGroup {
    fn from(g: Group) -> Self {
        Self {
            id: g.id,
            name: g.name,
            capacity: g.capacity,
            available: g.available,
            when: g.when,
        }
    }
}

/// FFI-safe enrollment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiEnrollment {
    Waitlisted,
    Enrolled,
}

impl From<Enrollment> for FfiEnrollment {
    fn from(e: Enrollment) -> Self {
        match e {
            Enrollment::Waitlisted => FfiEnrollment::Waitlisted,
            Enrollment::Enrolled => FfiEnrollment::Enrolled,
        }
    }
}

/// FFI-safe membership.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMembership {
    pub id: String,
    pub patient_id: String,
    pub group_id: String,
    pub receipt: Option<String>,
    pub enrollment: FfiEnrollment,
    pub created_at: i64,
}

impl From<Membership> for FfiMembership {
    fn from(m: Membership) -> Self {
        Self {
            id: m.id,
            patient_id: m.patient_id,
            group_id: m.group_id,
            receipt: m.receipt,
            enrollment: m.enrolled.into(),
            created_at: m.created_at,
        }
    }
}

/// FFI-safe membership removal outcome.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum FfiMembershipRemoval {
    WasWaitlisted,
    Promoted {
        membership_id: String,
        patient_id: String,
    },
    SlotFreed,
}

impl From<MembershipRemoval> for FfiMembershipRemoval {
    fn from(r: MembershipRemoval) -> Self {
        match r {
            MembershipRemoval::WasWaitlisted => FfiMembershipRemoval::WasWaitlisted,
            MembershipRemoval::Promoted {
                membership_id,
                patient_id,
            } => FfiMembershipRemoval::Promoted {
                membership_id,
                patient_id,
            },
            MembershipRemoval::SlotFreed => FfiMembershipRemoval::SlotFreed,
        }
    }
}

/// FFI-safe availability summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGroupAvailability {
    pub group_id: String,
    pub capacity: u32,
    pub available: i64,
    pub enrolled: u64,
    pub waitlisted: u64,
    pub active_subscriptions: u64,
    pub available_with_active_subscriptions: i64,
}

impl From<GroupAvailability> for FfiGroupAvailability {
    fn from(a: GroupAvailability) -> Self {
        Self {
            group_id: a.group_id,
            capacity: a.capacity,
            available: a.available,
            enrolled: a.enrolled as u64,
            waitlisted: a.waitlisted as u64,
            active_subscriptions: a.active_subscriptions as u64,
            available_with_active_subscriptions: a.available_with_active_subscriptions,
        }
    }
}

/// FFI-safe payment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPayment {
    pub id: String,
    pub patient_id: String,
    pub group_id: String,
    pub from_month: String,
    pub to_month: String,
    pub payment_date: String,
    pub amount: f64,
    pub payment_method: String,
    pub receipt_number: String,
}

impl From<Payment> for FfiPayment {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            patient_id: p.patient_id,
            group_id: p.group_id,
            from_month: p.from_month,
            to_month: p.to_month,
            payment_date: p.payment_date,
            amount: p.amount,
            payment_method: p.payment_method,
            receipt_number: p.receipt_number,
        }
    }
}

/// FFI-safe new payment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPayment {
    pub patient_id: String,
    pub group_id: String,
    pub from_month: String,
    pub to_month: String,
    pub payment_date: String,
    pub amount: f64,
    pub payment_method: String,
    pub receipt_number: String,
}

impl From<FfiNewPayment> for NewPayment {
    fn from(p: FfiNewPayment) -> Self {
        NewPayment {
            patient_id: p.patient_id,
            group_id: p.group_id,
            from_month: p.from_month,
            to_month: p.to_month,
            payment_date: p.payment_date,
            amount: p.amount,
            payment_method: p.payment_method,
            receipt_number: p.receipt_number,
        }
    }
}

/// FFI-safe payment patch; the patient and group of a payment never change.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPaymentPatch {
    pub from_month: Option<String>,
    pub to_month: Option<String>,
    pub payment_date: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub receipt_number: Option<String>,
}

impl From<FfiPaymentPatch> for PaymentPatch {
    fn from(p: FfiPaymentPatch) -> Self {
        PaymentPatch {
            from_month: p.from_month,
            to_month: p.to_month,
            payment_date: p.payment_date,
            amount: p.amount,
            payment_method: p.payment_method,
            receipt_number: p.receipt_number,
        }
    }
}

/// FFI-safe workbook sheet.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSheet {
    pub name: String,
    /// Rows of column letter → cell text
    pub rows: Vec<HashMap<String, String>>,
}

/// FFI-safe workbook as read by the host.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWorkbook {
    pub file_name: String,
    pub sheets: Vec<FfiSheet>,
}

impl From<FfiWorkbook> for Workbook {
    fn from(w: FfiWorkbook) -> Self {
        Workbook {
            file_name: w.file_name,
            sheets: w
                .sheets
                .into_iter()
                .map(|s| Sheet {
                    name: s.name,
                    rows: s.rows.into_iter().map(SheetRow::from_pairs).collect(),
                })
                .collect(),
        }
    }
}

/// FFI-safe import summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImportSummary {
    pub group_id: String,
    pub imported_count: u32,
    pub message: String,
}

impl From<ImportSummary> for FfiImportSummary {
    fn from(s: ImportSummary) -> Self {
        Self {
            group_id: s.group_id,
            imported_count: s.imported_count,
            message: s.message,
        }
    }
}
