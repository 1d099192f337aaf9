//! Payment records and the active-subscription predicate.

use crate::models::{Database, Id, NewPayment, Payment, PaymentPatch, YearMonth};

impl Database {
    /// Record a payment. Memberships are not touched.
    pub fn add_payment(&mut self, fields: NewPayment) -> Id {
        let payment = Payment::new(fields);
        let id = payment.id.clone();
        self.patient_payments.push(payment);
        id
    }

    pub fn update_payment(&mut self, id: &str, patch: PaymentPatch) -> bool {
        match self.patient_payments.iter_mut().find(|p| p.id == id) {
            Some(payment) => {
                patch.apply(payment);
                true
            }
            None => false,
        }
    }

    pub fn delete_payment(&mut self, id: &str) -> bool {
        let before = self.patient_payments.len();
        self.patient_payments.retain(|p| p.id != id);
        self.patient_payments.len() != before
    }

    pub fn payment(&self, id: &str) -> Option<&Payment> {
        self.patient_payments.iter().find(|p| p.id == id)
    }

    /// A patient's payments, newest first.
    pub fn payments_by_patient(&self, patient_id: &str) -> Vec<&Payment> {
        newest_first(
            self.patient_payments
                .iter()
                .filter(|p| p.patient_id == patient_id)
                .collect(),
        )
    }

    /// A group's payments, newest first.
    pub fn payments_by_group(&self, group_id: &str) -> Vec<&Payment> {
        newest_first(
            self.patient_payments
                .iter()
                .filter(|p| p.group_id == group_id)
                .collect(),
        )
    }

    /// Payment already recorded under this receipt for the patient in the group.
    pub fn payment_with_receipt(
        &self,
        patient_id: &str,
        group_id: &str,
        receipt_number: &str,
    ) -> Option<&Payment> {
        self.patient_payments.iter().find(|p| {
            p.patient_id == patient_id
                && p.group_id == group_id
                && p.receipt_number == receipt_number
        })
    }

    /// Whether any of the patient's payments for the group covers `month`.
    pub fn has_active_subscription(
        &self,
        patient_id: &str,
        group_id: &str,
        month: YearMonth,
    ) -> bool {
        self.patient_payments
            .iter()
            .filter(|p| p.patient_id == patient_id && p.group_id == group_id)
            .any(|p| p.covers(month))
    }
}

fn newest_first(mut payments: Vec<&Payment>) -> Vec<&Payment> {
    payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    payments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_payment(patient: &str, group: &str, from: &str, to: &str, receipt: &str) -> NewPayment {
        NewPayment {
            patient_id: patient.into(),
            group_id: group.into(),
            from_month: from.into(),
            to_month: to.into(),
            payment_date: "15/11/2025".into(),
            amount: 100.0,
            payment_method: "ת".into(),
            receipt_number: receipt.into(),
        }
    }

    #[test]
    fn test_payment_crud() {
        let mut db = Database::seed();
        let id = db.add_payment(new_payment("p1", "g1", "11/2025", "12/2025", "R1"));

        assert!(db.update_payment(
            &id,
            PaymentPatch {
                amount: Some(150.0),
                ..Default::default()
            }
        ));
        assert_eq!(db.payment(&id).unwrap().amount, 150.0);

        assert!(db.delete_payment(&id));
        assert!(!db.delete_payment(&id));
        assert!(!db.update_payment(&id, PaymentPatch::default()));
    }

    #[test]
    fn test_payments_sorted_newest_first() {
        let mut db = Database::seed();
        let old = db.add_payment(new_payment("p1", "g1", "09/2025", "09/2025", "R1"));
        let new = db.add_payment(new_payment("p1", "g2", "10/2025", "10/2025", "R2"));
        db.patient_payments[0].created_at -= 1_000;

        let by_patient = db.payments_by_patient("p1");
        assert_eq!(by_patient[0].id, new);
        assert_eq!(by_patient[1].id, old);

        assert_eq!(db.payments_by_group("g1").len(), 1);
    }

    #[test]
    fn test_active_subscription_month_range() {
        let mut db = Database::seed();
        db.add_payment(new_payment("p1", "g1", "11/2025", "01/2026", "R1"));

        assert!(!db.has_active_subscription("p1", "g1", YearMonth::new(2025, 10)));
        assert!(db.has_active_subscription("p1", "g1", YearMonth::new(2025, 12)));
        assert!(db.has_active_subscription("p1", "g1", YearMonth::new(2026, 1)));
        assert!(!db.has_active_subscription("p1", "g1", YearMonth::new(2026, 2)));

        // Coverage is per group.
        assert!(!db.has_active_subscription("p1", "g2", YearMonth::new(2025, 12)));
    }

    #[test]
    fn test_payment_with_receipt() {
        let mut db = Database::seed();
        db.add_payment(new_payment("p1", "g1", "11/2025", "11/2025", "R7"));
        assert!(db.payment_with_receipt("p1", "g1", "R7").is_some());
        assert!(db.payment_with_receipt("p1", "g2", "R7").is_none());
    }
}
