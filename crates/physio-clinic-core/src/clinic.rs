//! A clinic session: the in-memory [`Database`] paired with its [`Store`].
//!
//! Every mutation runs against the in-memory database and is persisted as a
//! whole snapshot when it changed something. Queries read the in-memory
//! state directly through [`Clinic::db`].

use std::path::Path;

use thiserror::Error;

use crate::backup::{self, BackupError, CsvTable};
use crate::capacity::{AdmissionPolicy, CapacityEngine, GroupAvailability, MembershipRemoval};
use crate::db::{decode_snapshot, Keyspace, Store, StoreError, LAST_EXPORT_KEY};
use crate::import::{ImportError, ImportSummary, Workbook, WorkbookImporter};
use crate::models::{
    Database, Enrollment, GroupPatch, Id, NewGroup, NewPatient, NewPayment, PatientPatch,
    PaymentPatch, TherapistPatch, YearMonth,
};

/// Session errors.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid backup: {0}")]
    Backup(#[from] BackupError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
}

pub type ClinicResult<T> = Result<T, ClinicError>;

/// Whether an operation's result means the database changed.
trait Changed {
    fn changed(&self) -> bool;
}

impl Changed for bool {
    fn changed(&self) -> bool {
        *self
    }
}

impl<T> Changed for Option<T> {
    fn changed(&self) -> bool {
        self.is_some()
    }
}

impl Changed for Id {
    fn changed(&self) -> bool {
        true
    }
}

impl Changed for () {
    fn changed(&self) -> bool {
        true
    }
}

/// Loaded clinic state bound to its persistent store.
pub struct Clinic {
    store: Store,
    db: Database,
    policy: AdmissionPolicy,
}

impl Clinic {
    /// Open the store at `path` and load (or recover, or seed) its snapshot.
    pub fn open<P: AsRef<Path>>(path: P) -> ClinicResult<Self> {
        Self::from_store(Store::open(path)?)
    }

    pub fn open_in_memory() -> ClinicResult<Self> {
        Self::from_store(Store::open_in_memory()?)
    }

    pub fn from_store(mut store: Store) -> ClinicResult<Self> {
        let db = store.load()?;
        tracing::debug!(
            patients = db.patients.len(),
            groups = db.groups.len(),
            "clinic loaded"
        );
        Ok(Self {
            store,
            db,
            policy: AdmissionPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_policy(&mut self, policy: AdmissionPolicy) {
        self.policy = policy;
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Discard in-memory state and load the stored snapshot again.
    pub fn reload(&mut self) -> ClinicResult<()> {
        self.db = self.store.load()?;
        Ok(())
    }

    fn mutate<T: Changed>(&mut self, op: impl FnOnce(&mut Database) -> T) -> ClinicResult<T> {
        let outcome = op(&mut self.db);
        if outcome.changed() {
            self.store.save(&self.db)?;
        }
        Ok(outcome)
    }

    fn engine(db: &mut Database, policy: AdmissionPolicy) -> CapacityEngine<'_> {
        CapacityEngine::new(db).with_policy(policy)
    }

    // =========================================================================
    // Therapists
    // =========================================================================

    pub fn add_therapist(&mut self, name: String) -> ClinicResult<Id> {
        self.mutate(|db| db.add_therapist(name))
    }

    pub fn update_therapist(&mut self, id: &str, patch: TherapistPatch) -> ClinicResult<bool> {
        self.mutate(|db| db.update_therapist(id, patch))
    }

    pub fn remove_therapist(&mut self, id: &str) -> ClinicResult<bool> {
        self.mutate(|db| db.remove_therapist(id))
    }

    // =========================================================================
    // Patients
    // =========================================================================

    pub fn add_patient(&mut self, fields: NewPatient) -> ClinicResult<Id> {
        self.mutate(|db| db.add_patient(fields))
    }

    pub fn find_or_add_patient(&mut self, fields: NewPatient) -> ClinicResult<Id> {
        self.mutate(|db| db.find_or_add_patient(fields))
    }

    pub fn update_patient(&mut self, id: &str, patch: PatientPatch) -> ClinicResult<bool> {
        self.mutate(|db| db.update_patient(id, patch))
    }

    pub fn remove_patient(&mut self, id: &str) -> ClinicResult<bool> {
        self.mutate(|db| db.remove_patient(id))
    }

    // =========================================================================
    // Groups and memberships
    // =========================================================================

    pub fn add_group(&mut self, fields: NewGroup) -> ClinicResult<Id> {
        self.mutate(|db| db.add_group(fields))
    }

    pub fn update_group(&mut self, id: &str, patch: GroupPatch) -> ClinicResult<bool> {
        self.mutate(|db| db.update_group(id, patch))
    }

    pub fn remove_group(&mut self, id: &str) -> ClinicResult<bool> {
        self.mutate(|db| db.remove_group(id))
    }

    pub fn set_therapist_for_group(
        &mut self,
        group_id: &str,
        therapist_id: &str,
    ) -> ClinicResult<bool> {
        self.mutate(|db| db.set_therapist_for_group(group_id, therapist_id))
    }

    pub fn update_membership_receipt(
        &mut self,
        group_id: &str,
        patient_id: &str,
        receipt: String,
    ) -> ClinicResult<bool> {
        self.mutate(|db| db.update_membership_receipt(group_id, patient_id, receipt))
    }

    /// Enroll or waitlist a patient under the session's admission policy.
    pub fn add_patient_to_group(
        &mut self,
        group_id: &str,
        patient_id: &str,
        receipt: Option<String>,
    ) -> ClinicResult<Option<Enrollment>> {
        let policy = self.policy;
        self.mutate(|db| Self::engine(db, policy).add_membership(group_id, patient_id, receipt))
    }

    pub fn remove_patient_from_group(
        &mut self,
        group_id: &str,
        patient_id: &str,
    ) -> ClinicResult<Option<MembershipRemoval>> {
        let policy = self.policy;
        self.mutate(|db| Self::engine(db, policy).remove_membership(group_id, patient_id))
    }

    pub fn recalculate_available(&mut self) -> ClinicResult<()> {
        let policy = self.policy;
        self.mutate(|db| Self::engine(db, policy).recalculate_all())
    }

    /// Capacity summary of a group for the current month.
    pub fn group_availability(&self, group_id: &str) -> Option<GroupAvailability> {
        self.db.group_availability(group_id, YearMonth::current())
    }

    // =========================================================================
    // Attendance and payments
    // =========================================================================

    pub fn mark_attendance(
        &mut self,
        group_id: &str,
        patient_id: &str,
        therapist_id: &str,
        date: &str,
        is_makeup: bool,
    ) -> ClinicResult<()> {
        self.mutate(|db| db.mark_attendance(group_id, patient_id, therapist_id, date, is_makeup))
    }

    pub fn unmark_attendance(
        &mut self,
        group_id: &str,
        patient_id: &str,
        date: &str,
    ) -> ClinicResult<bool> {
        self.mutate(|db| db.unmark_attendance(group_id, patient_id, date))
    }

    pub fn add_payment(&mut self, fields: NewPayment) -> ClinicResult<Id> {
        self.mutate(|db| db.add_payment(fields))
    }

    pub fn update_payment(&mut self, id: &str, patch: PaymentPatch) -> ClinicResult<bool> {
        self.mutate(|db| db.update_payment(id, patch))
    }

    pub fn delete_payment(&mut self, id: &str) -> ClinicResult<bool> {
        self.mutate(|db| db.delete_payment(id))
    }

    pub fn update_settings(&mut self, clinic_name: String) -> ClinicResult<()> {
        self.mutate(|db| db.update_settings(clinic_name))
    }

    // =========================================================================
    // Backup and import
    // =========================================================================

    pub fn export_backup(&self, with_bom: bool) -> ClinicResult<String> {
        Ok(backup::export_backup(&self.db, with_bom)?)
    }

    /// Replace all clinic data with a backup document.
    ///
    /// The document must pass validation and decode into a [`Database`];
    /// otherwise nothing is written and the session keeps its data.
    pub fn import_backup(&mut self, text: &str) -> ClinicResult<()> {
        let raw = backup::prepare_import(text)?;
        let (db, _) = decode_snapshot(raw).map_err(BackupError::Schema)?;
        self.store.replace_snapshot(raw)?;
        self.db = db;
        tracing::info!(
            patients = self.db.patients.len(),
            groups = self.db.groups.len(),
            "backup imported"
        );
        Ok(())
    }

    pub fn export_csv(&self, table: CsvTable) -> String {
        backup::export_csv(&self.db, table)
    }

    /// Import a roster workbook and persist the result once.
    pub fn import_workbook(&mut self, workbook: &Workbook) -> ClinicResult<ImportSummary> {
        let summary = WorkbookImporter::new(&mut self.db)
            .with_policy(self.policy)
            .import(workbook)?;
        self.store.save(&self.db)?;
        Ok(summary)
    }

    /// Remember where the last backup was written.
    pub fn remember_export_path(&self, path: &str) -> ClinicResult<()> {
        self.store.set(Keyspace::Aux, LAST_EXPORT_KEY, path)?;
        Ok(())
    }

    pub fn last_export_path(&self) -> ClinicResult<Option<String>> {
        Ok(self.store.get(Keyspace::Aux, LAST_EXPORT_KEY)?)
    }
}
