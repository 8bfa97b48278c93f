use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Add `amount` to the credit side when negative, to the debit side otherwise.
///
/// Zero counts as debit.
pub fn credit_and_debit(amount: Decimal, (credit, debit): (Decimal, Decimal)) -> (Decimal, Decimal) {
    if amount < Decimal::ZERO {
        (credit + amount, debit)
    } else {
        (credit, debit + amount)
    }
}

/// Running credit/debit totals of a group of invoice lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub credit: Decimal,
    pub debit: Decimal,
}

impl Ledger {
    pub fn record(&mut self, amount: Decimal) {
        (self.credit, self.debit) = credit_and_debit(amount, (self.credit, self.debit));
    }

    /// Net signed sum.
    pub fn total(&self) -> Decimal {
        self.credit + self.debit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_amounts_are_credit() {
        assert_eq!(
            credit_and_debit(dec!(-12.50), (dec!(-1), dec!(3))),
            (dec!(-13.50), dec!(3))
        );
    }

    #[test]
    fn zero_is_debit() {
        assert_eq!(
            credit_and_debit(Decimal::ZERO, (dec!(-1), dec!(3))),
            (dec!(-1), dec!(3))
        );

        let mut ledger = Ledger::default();
        ledger.record(Decimal::ZERO);
        ledger.record(dec!(-0.000001));
        assert_eq!(ledger.credit, dec!(-0.000001));
        assert_eq!(ledger.debit, Decimal::ZERO);
    }

    #[test]
    fn total_is_net_of_both_sides() {
        let mut ledger = Ledger::default();
        for amount in [dec!(10), dec!(-4), dec!(2.5)] {
            ledger.record(amount);
        }
        assert_eq!(ledger.credit, dec!(-4));
        assert_eq!(ledger.debit, dec!(12.5));
        assert_eq!(ledger.total(), dec!(8.5));
    }
}
