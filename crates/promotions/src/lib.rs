//! Sign-up promotions: voucher codes, referral codes and trials.

pub mod offer;
pub mod referral;
pub mod registry;
pub mod trial;
pub mod voucher;

pub use offer::{CreditOffer, GrantOffer};
pub use referral::ReferralCode;
pub use registry::CodeRegistry;
pub use trial::{Trial, TrialStatus};
pub use voucher::{VoucherCode, VoucherRewards};
