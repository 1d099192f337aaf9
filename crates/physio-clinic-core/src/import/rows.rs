//! Cell parsing for workbook rows.

use crate::models::{
    leading_int, NewPatient, YearMonth, DEFAULT_PAYMENT_METHOD, PAYMENT_METHOD_CODES,
};

use super::SheetRow;

/// Row sequence numbers that carry a patient.
pub const SEQUENCE_RANGE: std::ops::RangeInclusive<i64> = 1..=15;

/// Accepted payment amounts; anything else is treated as no payment.
pub const AMOUNT_RANGE: std::ops::RangeInclusive<f64> = 50.0..=600.0;

/// Price of one month.
pub const MONTHLY_FEE: f64 = 50.0;

/// Years a sheet name may refer to.
pub const SHEET_YEAR_RANGE: std::ops::RangeInclusive<i32> = 2020..=2030;

/// One patient line extracted from a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub sequence_number: i64,
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    /// Validated amount, if the row carries one
    pub amount: Option<f64>,
    pub receipt_number: String,
    pub payment_method: char,
}

impl ImportRow {
    /// Extract a row, or `None` when it is not a patient line.
    ///
    /// Columns: A sequence, B full name, D national id, E phone, J amount,
    /// K receipt, L payment method.
    pub fn parse(row: &SheetRow) -> Option<Self> {
        let sequence_number = leading_int(row.cell("A"))?;
        if !SEQUENCE_RANGE.contains(&sequence_number) {
            return None;
        }

        let full_name = row.cell("B").trim();
        let national_id = row.cell("D").trim();
        if full_name.is_empty() || national_id.is_empty() {
            return None;
        }

        Some(Self {
            sequence_number,
            full_name: full_name.to_string(),
            national_id: national_id.to_string(),
            phone: row.cell("E").trim().to_string(),
            amount: parse_amount(row.cell("J")),
            receipt_number: row.cell("K").trim().to_string(),
            payment_method: parse_payment_method(row.cell("L")),
        })
    }

    pub fn new_patient(&self) -> NewPatient {
        NewPatient::from_full_name(&self.full_name, self.national_id.clone(), self.phone.clone())
    }

    /// Number of months the amount pays for.
    pub fn months_covered(&self) -> Option<u32> {
        self.amount.map(|amount| (amount / MONTHLY_FEE).round() as u32)
    }
}

/// Amount in range and a whole number of months, else `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let amount = leading_float(raw)?;
    (AMOUNT_RANGE.contains(&amount) && amount % MONTHLY_FEE == 0.0).then_some(amount)
}

/// First character if it is a known method code, else cash.
pub fn parse_payment_method(raw: &str) -> char {
    raw.trim()
        .chars()
        .next()
        .filter(|c| PAYMENT_METHOD_CODES.contains(c))
        .unwrap_or(DEFAULT_PAYMENT_METHOD)
}

/// Month a sheet named `MM.YY` refers to, within the accepted years.
pub fn sheet_month(sheet_name: &str) -> Option<YearMonth> {
    let (month, year) = sheet_name.split_once('.')?;
    let month = u32::try_from(leading_int(month)?).ok()?;
    let year = 2000 + i32::try_from(leading_int(year)?).ok()?;
    ((1..=12).contains(&month) && SHEET_YEAR_RANGE.contains(&year))
        .then(|| YearMonth::new(year, month))
}

/// Leading decimal number of a string ("150", "150.0 ₪").
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '-' | '+' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    s[..end].parse().ok()
}
