//! Workbook import of monthly group rosters.
//!
//! The host reads the spreadsheet file and passes its sheets as rows of
//! column-lettered cells. The importer only drives the registry, the
//! capacity engine and the payment ledger:
//!
//! ```text
//! file "Backs Tue.xlsx" ──▶ group "Backs Tue" (reused if it exists)
//!   sheet 07.25 … 12.25
//!     row 1..=15 ──▶ find-or-add patient by national id
//!                ──▶ add membership (enrolled or waitlisted)
//!                ──▶ add payment unless the receipt is already recorded
//! ```

mod rows;

pub use rows::*;

use std::collections::HashMap;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capacity::{AdmissionPolicy, CapacityEngine};
use crate::models::{Database, NewGroup, NewPayment, YearMonth};

/// Sheets read from a roster workbook, in processing order.
pub const TARGET_SHEETS: [&str; 6] = ["07.25", "08.25", "09.25", "10.25", "11.25", "12.25"];

/// Workbook import errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImportError {
    #[error("workbook file name `{0}` does not yield a group name")]
    EmptyGroupName(String),
}

pub type ImportResult<T> = Result<T, ImportError>;

/// One spreadsheet row keyed by column letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    cells: HashMap<String, String>,
}

impl SheetRow {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_uppercase(), v.into()))
                .collect(),
        }
    }

    /// Cell text, empty when the cell is absent.
    pub fn cell(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

/// A named sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

/// A parsed workbook file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// File name as picked by the user, e.g. `Backs Tue.xlsx`
    pub file_name: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Group name: the file name without its `.xlsx` extension.
    pub fn group_name(&self) -> &str {
        let name = self.file_name.trim();
        match name.len().checked_sub(".xlsx".len()) {
            Some(cut)
                if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".xlsx") =>
            {
                &name[..cut]
            }
            _ => name,
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Outcome of a workbook import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub group_id: String,
    /// Payments recorded
    pub imported_count: u32,
    pub message: String,
}

/// Applies a [`Workbook`] to a [`Database`].
pub struct WorkbookImporter<'a> {
    db: &'a mut Database,
    policy: AdmissionPolicy,
    month: YearMonth,
    payment_date: String,
    sheets: Vec<String>,
}

impl<'a> WorkbookImporter<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self {
            db,
            policy: AdmissionPolicy::default(),
            month: YearMonth::current(),
            payment_date: Local::now().format("%d/%m/%Y").to_string(),
            sheets: TARGET_SHEETS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Month used for subscription-aware admission.
    pub fn as_of(mut self, month: YearMonth) -> Self {
        self.month = month;
        self
    }

    /// Date stamped on created payments, `DD/MM/YYYY`.
    pub fn with_payment_date(mut self, date: impl Into<String>) -> Self {
        self.payment_date = date.into();
        self
    }

    pub fn with_sheets(mut self, sheets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sheets = sheets.into_iter().map(Into::into).collect();
        self
    }

    /// Import every target sheet present in the workbook.
    ///
    /// Rows that fail validation are skipped; only a missing group name
    /// aborts the import.
    pub fn import(mut self, workbook: &Workbook) -> ImportResult<ImportSummary> {
        let group_name = workbook.group_name();
        if group_name.is_empty() {
            return Err(ImportError::EmptyGroupName(workbook.file_name.clone()));
        }

        let group_id = match self.db.group_by_name(group_name) {
            Some(existing) => existing.id.clone(),
            None => self.db.add_group(NewGroup::named(group_name)),
        };

        let mut imported_count = 0;
        let sheets = std::mem::take(&mut self.sheets);
        for sheet_name in &sheets {
            let Some(sheet) = workbook.sheet(sheet_name) else {
                continue;
            };
            let from = sheet_month(sheet_name);
            for row in sheet.rows.iter().filter_map(ImportRow::parse) {
                if self.import_row(&group_id, sheet_name, from, &row) {
                    imported_count += 1;
                }
            }
        }

        let message = format!(
            "Successfully imported {} payment records for group \"{}\"",
            imported_count, group_name
        );
        tracing::info!(group = group_name, imported_count, "workbook imported");

        Ok(ImportSummary {
            group_id,
            imported_count,
            message,
        })
    }

    /// Apply one row. Returns whether a payment was recorded.
    fn import_row(
        &mut self,
        group_id: &str,
        sheet_name: &str,
        from: Option<YearMonth>,
        row: &ImportRow,
    ) -> bool {
        let patient_id = self.db.find_or_add_patient(row.new_patient());

        let receipt = (!row.receipt_number.is_empty()).then(|| row.receipt_number.clone());
        CapacityEngine::as_of(self.db, self.month)
            .with_policy(self.policy)
            .add_membership(group_id, &patient_id, receipt);

        let (Some(amount), Some(months)) = (row.amount, row.months_covered()) else {
            return false;
        };
        if row.receipt_number.is_empty() {
            return false;
        }
        // Multi-month payments repeat on every sheet they cover.
        if self
            .db
            .payment_with_receipt(&patient_id, group_id, &row.receipt_number)
            .is_some()
        {
            return false;
        }
        let Some(from) = from else {
            tracing::warn!(sheet = sheet_name, "sheet name is not a valid month, payment skipped");
            return false;
        };

        let to = from.plus_months(months.saturating_sub(1));
        self.db.add_payment(NewPayment {
            patient_id,
            group_id: group_id.to_string(),
            from_month: from.to_string(),
            to_month: to.to_string(),
            payment_date: self.payment_date.clone(),
            amount,
            payment_method: row.payment_method.to_string(),
            receipt_number: row.receipt_number.clone(),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Enrollment;

    fn patient_row(seq: &str, name: &str, nid: &str, amount: &str, receipt: &str) -> SheetRow {
        SheetRow::from_pairs([
            ("A", seq),
            ("B", name),
            ("D", nid),
            ("E", "050"),
            ("J", amount),
            ("K", receipt),
            ("L", "ת"),
        ])
    }

    fn workbook(sheets: Vec<Sheet>) -> Workbook {
        Workbook {
            file_name: "Backs Tue.xlsx".into(),
            sheets,
        }
    }

    fn importer(db: &mut Database) -> WorkbookImporter<'_> {
        WorkbookImporter::new(db).with_payment_date("20/10/2025")
    }

    #[test]
    fn test_group_name_strips_extension() {
        let mut wb = workbook(vec![]);
        assert_eq!(wb.group_name(), "Backs Tue");
        wb.file_name = "Knees.XLSX".into();
        assert_eq!(wb.group_name(), "Knees");
        wb.file_name = "notes.csv".into();
        assert_eq!(wb.group_name(), "notes.csv");
    }

    #[test]
    fn test_empty_group_name_fails() {
        let mut db = Database::seed();
        let mut wb = workbook(vec![]);
        wb.file_name = ".xlsx".into();
        assert_eq!(
            importer(&mut db).import(&wb),
            Err(ImportError::EmptyGroupName(".xlsx".into()))
        );
        assert!(db.groups.is_empty());
    }

    #[test]
    fn test_import_creates_patients_memberships_and_payments() {
        let mut db = Database::seed();
        let wb = workbook(vec![Sheet {
            name: "11.25".into(),
            rows: vec![
                SheetRow::from_pairs([("A", "#"), ("B", "Name")]),
                patient_row("1", "Avi Cohen", "111", "150", "R1"),
                patient_row("2", "Dana", "222", "", ""),
                patient_row("16", "Overflow", "333", "50", "R3"),
            ],
        }]);

        let summary = importer(&mut db).import(&wb).unwrap();
        assert_eq!(summary.imported_count, 1);
        assert_eq!(
            summary.message,
            "Successfully imported 1 payment records for group \"Backs Tue\""
        );

        assert_eq!(db.patients.len(), 2);
        let group = db.group(&summary.group_id).unwrap();
        assert_eq!(group.available, 13);

        let avi = db.patient_by_national_id("111").unwrap();
        let payments = db.payments_by_patient(&avi.id);
        let payment = payments[0];
        assert_eq!(payment.from_month, "11/2025");
        assert_eq!(payment.to_month, "01/2026");
        assert_eq!(payment.payment_method, "ת");
        assert_eq!(payment.payment_date, "20/10/2025");
        assert_eq!(
            db.membership(&summary.group_id, &avi.id).unwrap().receipt.as_deref(),
            Some("R1")
        );
    }

    #[test]
    fn test_repeated_receipt_across_sheets_is_recorded_once() {
        let mut db = Database::seed();
        let row = patient_row("1", "Avi Cohen", "111", "100", "R1");
        let wb = workbook(vec![
            Sheet {
                name: "07.25".into(),
                rows: vec![row.clone()],
            },
            Sheet {
                name: "08.25".into(),
                rows: vec![row],
            },
        ]);

        let summary = importer(&mut db).import(&wb).unwrap();
        assert_eq!(summary.imported_count, 1);
        assert_eq!(db.patient_payments.len(), 1);
        assert_eq!(db.patients_in_groups.len(), 1);
    }

    #[test]
    fn test_sheets_outside_target_list_are_ignored() {
        let mut db = Database::seed();
        let wb = workbook(vec![Sheet {
            name: "01.26".into(),
            rows: vec![patient_row("1", "Avi", "111", "50", "R1")],
        }]);
        let summary = importer(&mut db).import(&wb).unwrap();
        assert_eq!(summary.imported_count, 0);
        assert!(db.patients.is_empty());
    }

    #[test]
    fn test_invalid_sheet_month_keeps_membership_skips_payment() {
        let mut db = Database::seed();
        let wb = workbook(vec![Sheet {
            name: "13.25".into(),
            rows: vec![patient_row("1", "Avi", "111", "50", "R1")],
        }]);
        let summary = importer(&mut db)
            .with_sheets(["13.25"])
            .import(&wb)
            .unwrap();
        assert_eq!(summary.imported_count, 0);
        assert_eq!(db.patients_in_groups.len(), 1);
    }

    #[test]
    fn test_import_waitlists_beyond_capacity() {
        let mut db = Database::seed();
        let rows = (1..=15)
            .map(|i| patient_row(&i.to_string(), "P", &format!("id-{}", i), "", ""))
            .collect();
        let mut wb = workbook(vec![Sheet {
            name: "07.25".into(),
            rows,
        }]);
        importer(&mut db).import(&wb).unwrap();

        wb.sheets[0].rows = vec![patient_row("1", "Late", "late", "", "")];
        let summary = importer(&mut db).import(&wb).unwrap();

        assert_eq!(db.groups.len(), 1);
        let late = db.patient_by_national_id("late").unwrap();
        let membership = db.membership(&summary.group_id, &late.id).unwrap();
        assert_eq!(membership.enrolled, Enrollment::Waitlisted);
        assert_eq!(db.group(&summary.group_id).unwrap().available, 0);
    }
}
