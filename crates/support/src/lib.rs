//! Premium support subscriptions.

pub mod subscription;

pub use subscription::{SupportBillingType, SupportSubscription, SupportSubscriptionType};
