use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::Invoice;

/// Detached summary of an unpaid invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingInvoice {
    pub name: String,
    pub due_date: NaiveDate,
    pub amount_residual_signed: Decimal,
}

impl From<&Invoice> for OutstandingInvoice {
    fn from(invoice: &Invoice) -> Self {
        Self {
            name: invoice.name.clone(),
            due_date: invoice.due_date,
            amount_residual_signed: invoice.amount_residual_signed,
        }
    }
}

/// Unpaid invoices split into overdue and current, as of the day they were
/// added. An invoice due today is current.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingInvoices {
    overdue: Vec<OutstandingInvoice>,
    current: Vec<OutstandingInvoice>,
}

impl OutstandingInvoices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `invoices` as of `today`.
    pub fn collect<'a, I>(invoices: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Invoice>,
    {
        let mut snapshot = Self::new();
        snapshot.add_as_of(invoices, today);
        snapshot
    }

    pub fn reset(&mut self) {
        self.overdue.clear();
        self.current.clear();
    }

    /// Add `invoices` classified against the current UTC date.
    pub fn add<'a, I>(&mut self, invoices: I)
    where
        I: IntoIterator<Item = &'a Invoice>,
    {
        self.add_as_of(invoices, Utc::now().date_naive());
    }

    pub fn add_as_of<'a, I>(&mut self, invoices: I, today: NaiveDate)
    where
        I: IntoIterator<Item = &'a Invoice>,
    {
        for invoice in invoices {
            let summary = OutstandingInvoice::from(invoice);
            if today > summary.due_date {
                self.overdue.push(summary);
            } else {
                self.current.push(summary);
            }
        }
    }

    /// Overdue invoices, earliest due first.
    pub fn ordered_overdue(&self) -> Vec<&OutstandingInvoice> {
        ordered_by_due_date(&self.overdue)
    }

    /// Current invoices, earliest due first.
    pub fn ordered_current(&self) -> Vec<&OutstandingInvoice> {
        ordered_by_due_date(&self.current)
    }

    pub fn overdue_total(&self) -> Decimal {
        self.overdue.iter().map(|i| i.amount_residual_signed).sum()
    }

    pub fn current_total(&self) -> Decimal {
        self.current.iter().map(|i| i.amount_residual_signed).sum()
    }

    pub fn grand_total(&self) -> Decimal {
        self.overdue_total() + self.current_total()
    }

    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.current.is_empty()
    }
}

fn ordered_by_due_date(invoices: &[OutstandingInvoice]) -> Vec<&OutstandingInvoice> {
    let mut ordered: Vec<_> = invoices.iter().collect();
    ordered.sort_by_key(|i| i.due_date);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use osbill_core::PartnerId;
    use osbill_projects::PartnerRef;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_invoice(name: &str, due: NaiveDate, residual: Decimal) -> Invoice {
        let partner = PartnerRef {
            id: PartnerId::new(),
            name: "Acme Ltd".to_string(),
        };
        Invoice::new(name, partner, due, due).with_residual(residual)
    }

    #[test]
    fn due_today_is_current_and_yesterday_is_overdue() {
        let today = date(2024, 3, 15);
        let invoices = vec![
            test_invoice("INV/1", date(2024, 3, 14), dec!(10)),
            test_invoice("INV/2", today, dec!(20)),
        ];
        let snapshot = OutstandingInvoices::collect(&invoices, today);

        assert_eq!(snapshot.ordered_overdue()[0].name, "INV/1");
        assert_eq!(snapshot.ordered_current()[0].name, "INV/2");
        assert_eq!(snapshot.overdue_total(), dec!(10));
        assert_eq!(snapshot.current_total(), dec!(20));
        assert_eq!(snapshot.grand_total(), dec!(30));
    }

    #[test]
    fn buckets_are_ordered_by_due_date_and_stable_on_ties() {
        let today = date(2024, 1, 1);
        let invoices = vec![
            test_invoice("INV/3", date(2024, 3, 1), dec!(1)),
            test_invoice("INV/1", date(2024, 2, 1), dec!(1)),
            test_invoice("INV/2", date(2024, 3, 1), dec!(1)),
        ];
        let snapshot = OutstandingInvoices::collect(&invoices, today);

        let names: Vec<_> = snapshot.ordered_current().into_iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["INV/1", "INV/3", "INV/2"]);
        assert!(snapshot.ordered_overdue().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let invoices = vec![
            test_invoice("INV/1", date(2020, 1, 1), dec!(10)),
            test_invoice("INV/2", date(2099, 1, 1), dec!(5)),
        ];
        let mut snapshot = OutstandingInvoices::new();
        snapshot.add(&invoices);
        assert_eq!(snapshot.grand_total(), dec!(15));

        snapshot.reset();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.grand_total(), Decimal::ZERO);

        snapshot.reset();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn classification_is_fixed_when_added() {
        let invoices = vec![test_invoice("INV/1", date(2024, 3, 15), dec!(10))];
        let mut snapshot = OutstandingInvoices::new();
        snapshot.add_as_of(&invoices, date(2024, 3, 15));
        snapshot.add_as_of(&invoices, date(2024, 3, 16));

        assert_eq!(snapshot.current_total(), dec!(10));
        assert_eq!(snapshot.overdue_total(), dec!(10));
    }
}
