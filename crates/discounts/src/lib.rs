//! Discount schemes: term commitments, volume brackets and reseller tiers.

pub mod reseller;
pub mod term;
pub mod volume;

pub use reseller::{Reseller, ResellerTier, tier_for_usage};
pub use term::TermDiscount;
pub use volume::{VolumeDiscountRange, select_range};

use rust_decimal::Decimal;

/// `amount` scaled by a 0..=100 percentage.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}
