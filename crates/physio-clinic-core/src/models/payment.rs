//! Payment records and calendar-month arithmetic.

use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::{new_id, now_millis, Id, Timestamp};

/// Single-letter payment method codes as entered at the front desk.
pub const PAYMENT_METHOD_CODES: [char; 4] = ['ק', 'א', 'ת', 'מ'];

/// Method recorded when none (or an unknown one) is given: cash.
pub const DEFAULT_PAYMENT_METHOD: char = 'מ';

/// A calendar month, written `MM/YYYY` in payment rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::new(today.year(), today.month())
    }

    /// Parse `MM/YYYY`.
    ///
    /// Parsing is lenient in the same way the stored data was produced:
    /// each side only needs a leading integer ("7/2025", "07/2025x").
    /// Returns `None` when either side has no digits.
    pub fn parse(s: &str) -> Option<Self> {
        let (month, year) = s.split_once('/')?;
        let month = leading_int(month)?;
        let year = leading_int(year)?;
        Some(Self {
            year: i32::try_from(year).ok()?,
            month: u32::try_from(month).ok()?,
        })
    }

    /// `year * 12 + month`, the comparison key for coverage checks.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    /// The month `n` months after this one.
    pub fn plus_months(&self, n: u32) -> Self {
        let zero_based = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(n);
        Self {
            year: zero_based.div_euclid(12) as i32,
            month: zero_based.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Leading signed integer of a string, ignoring leading whitespace.
pub(crate) fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// A payment covering an inclusive range of months for one patient in one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Id,
    pub patient_id: Id,
    pub group_id: Id,
    /// First covered month, `MM/YYYY`
    #[serde(default)]
    pub from_month: String,
    /// Last covered month, `MM/YYYY`
    #[serde(default)]
    pub to_month: String,
    /// Date the payment was taken, `DD/MM/YYYY`
    #[serde(default)]
    pub payment_date: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub receipt_number: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

/// Fields supplied when recording a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub patient_id: Id,
    pub group_id: Id,
    pub from_month: String,
    pub to_month: String,
    pub payment_date: String,
    pub amount: f64,
    pub payment_method: String,
    pub receipt_number: String,
}

impl Payment {
    pub fn new(fields: NewPayment) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            patient_id: fields.patient_id,
            group_id: fields.group_id,
            from_month: fields.from_month,
            to_month: fields.to_month,
            payment_date: fields.payment_date,
            amount: fields.amount,
            payment_method: fields.payment_method,
            receipt_number: fields.receipt_number,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `month` falls inside `from_month..=to_month`.
    ///
    /// Unparseable bounds and inverted ranges never cover anything.
    pub fn covers(&self, month: YearMonth) -> bool {
        match (
            YearMonth::parse(&self.from_month),
            YearMonth::parse(&self.to_month),
        ) {
            (Some(from), Some(to)) => {
                from.ordinal() <= month.ordinal() && month.ordinal() <= to.ordinal()
            }
            _ => false,
        }
    }
}

/// Partial update for a payment. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub from_month: Option<String>,
    pub to_month: Option<String>,
    pub payment_date: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub receipt_number: Option<String>,
}

impl PaymentPatch {
    pub fn apply(self, payment: &mut Payment) {
        if let Some(from_month) = self.from_month {
            payment.from_month = from_month;
        }
        if let Some(to_month) = self.to_month {
            payment.to_month = to_month;
        }
        if let Some(payment_date) = self.payment_date {
            payment.payment_date = payment_date;
        }
        if let Some(amount) = self.amount {
            payment.amount = amount;
        }
        if let Some(payment_method) = self.payment_method {
            payment.payment_method = payment_method;
        }
        if let Some(receipt_number) = self.receipt_number {
            payment.receipt_number = receipt_number;
        }
        payment.updated_at = now_millis();
    }
}
