//! Credit balance rule: a credit's running balance never goes negative.

use rust_decimal::Decimal;

use osbill_core::{DomainError, DomainResult};

/// Negative balances smaller than this are treated as rounding noise.
///
/// Only the credit balance rule uses it.
pub const SNAP_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub const BALANCE_BELOW_ZERO: &str = "Cannot add transaction that brings balance below zero.";

/// Check a transaction value about to be stored against a credit.
///
/// `others` are the values of every other transaction already stored for the
/// credit. Returns the value to store: either `proposed` unchanged, or, when
/// the resulting balance would be negative by less than [`SNAP_TOLERANCE`],
/// the value that brings the balance to exactly zero.
///
/// With no other transactions the value is accepted as is.
pub fn check_transaction_value(
    initial_balance: Decimal,
    others: &[Decimal],
    proposed: Decimal,
) -> DomainResult<Decimal> {
    if others.is_empty() {
        return Ok(proposed);
    }

    let current = initial_balance + others.iter().sum::<Decimal>();
    let projected = current + proposed;

    if projected >= Decimal::ZERO {
        return Ok(proposed);
    }

    if projected.abs() < SNAP_TOLERANCE {
        tracing::debug!(
            %proposed,
            snapped = %(-current),
            "credit transaction snapped to zero balance"
        );
        return Ok(-current);
    }

    tracing::warn!(%current, %proposed, "credit transaction rejected");
    Err(DomainError::validation(BALANCE_BELOW_ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn exact_drain_to_zero_is_accepted() {
        let value = check_transaction_value(dec!(100), &[dec!(-50)], dec!(-50)).unwrap();
        assert_eq!(value, dec!(-50));
    }

    #[test]
    fn sub_cent_overdraw_is_snapped_to_zero_balance() {
        let value = check_transaction_value(dec!(100), &[dec!(-50)], dec!(-50.005)).unwrap();
        assert_eq!(value, dec!(-50));
    }

    #[test]
    fn real_overdraw_is_rejected() {
        let err = check_transaction_value(dec!(100), &[dec!(-50)], dec!(-51)).unwrap_err();
        assert_eq!(err.validation_message(), Some(BALANCE_BELOW_ZERO));
    }

    #[test]
    fn overdraw_of_exactly_one_cent_is_rejected() {
        assert!(check_transaction_value(dec!(100), &[dec!(-50)], dec!(-50.01)).is_err());
    }

    #[test]
    fn first_transaction_is_always_accepted() {
        let value = check_transaction_value(dec!(10), &[], dec!(-500)).unwrap();
        assert_eq!(value, dec!(-500));
    }

    #[test]
    fn top_ups_are_accepted() {
        let value = check_transaction_value(dec!(0), &[dec!(-0)], dec!(25)).unwrap();
        assert_eq!(value, dec!(25));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: once at least one transaction exists, every accepted value
        /// leaves a non-negative balance.
        #[test]
        fn accepted_values_never_leave_negative_balance(
            initial in 0i64..1_000_000i64,
            first in -1_000_000i64..1_000_000i64,
            spends in prop::collection::vec(-500_000i64..100_000i64, 1..20)
        ) {
            let initial = Decimal::new(initial, 3);
            let mut stored = vec![Decimal::new(first, 3)];

            for spend in spends {
                let proposed = Decimal::new(spend, 3);
                if let Ok(value) = check_transaction_value(initial, &stored, proposed) {
                    stored.push(value);
                    let after: Decimal = initial + stored.iter().sum::<Decimal>();
                    prop_assert!(after >= Decimal::ZERO);
                }
            }
        }
    }
}
