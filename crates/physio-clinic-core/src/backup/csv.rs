//! CSV table exports.

use super::BOM;
use crate::models::{Database, Patient, Payment};

/// Tables that can be exported as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvTable {
    Patients,
    Payments,
}

impl std::str::FromStr for CsvTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patients" => Ok(CsvTable::Patients),
            "payments" => Ok(CsvTable::Payments),
            other => Err(format!("unknown table: {}", other)),
        }
    }
}

const PATIENT_COLUMNS: &[&str] = &[
    "id",
    "nationalId",
    "firstName",
    "lastName",
    "phone",
    "createdAt",
    "updatedAt",
    "statusId",
];

const PAYMENT_COLUMNS: &[&str] = &[
    "id",
    "patientId",
    "groupId",
    "fromMonth",
    "toMonth",
    "paymentDate",
    "amount",
    "paymentMethod",
    "receiptNumber",
    "createdAt",
    "updatedAt",
];

/// Render a table as BOM-prefixed CSV.
pub fn export_csv(db: &Database, table: CsvTable) -> String {
    match table {
        CsvTable::Patients => render(PATIENT_COLUMNS, db.patients.iter().map(patient_row)),
        CsvTable::Payments => render(PAYMENT_COLUMNS, db.patient_payments.iter().map(payment_row)),
    }
}

fn patient_row(p: &Patient) -> Vec<String> {
    vec![
        p.id.clone(),
        p.national_id.clone(),
        p.first_name.clone(),
        p.last_name.clone(),
        p.phone.clone(),
        p.created_at.to_string(),
        p.updated_at.to_string(),
        p.status_id.clone(),
    ]
}

fn payment_row(p: &Payment) -> Vec<String> {
    vec![
        p.id.clone(),
        p.patient_id.clone(),
        p.group_id.clone(),
        p.from_month.clone(),
        p.to_month.clone(),
        p.payment_date.clone(),
        p.amount.to_string(),
        p.payment_method.clone(),
        p.receipt_number.clone(),
        p.created_at.to_string(),
        p.updated_at.to_string(),
    ]
}

fn render(columns: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let mut lines = vec![columns.join(",")];
    lines.extend(rows.map(|row| {
        row.iter()
            .map(|value| escape_csv(value))
            .collect::<Vec<_>>()
            .join(",")
    }));
    format!("{}{}", BOM, lines.join("\n"))
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
