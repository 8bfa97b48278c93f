//! Value objects: equality by value, not identity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::validation::check_date_order;

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// A date window during which a benefit (credit, grant, discount) applies.
///
/// The start date is inclusive, the expiry date exclusive. No expiry means
/// the window never closes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    pub start: NaiveDate,
    pub expiry: Option<NaiveDate>,
}

impl ValueObject for Validity {}

impl Validity {
    pub fn new(start: NaiveDate, expiry: Option<NaiveDate>) -> Self {
        Self { start, expiry }
    }

    /// Window starting on `start` that never expires.
    pub fn open_ended(start: NaiveDate) -> Self {
        Self { start, expiry: None }
    }

    /// Has started and not yet expired on `today`.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        if today < self.start {
            return false;
        }
        self.expiry.is_none_or(|expiry| today < expiry)
    }

    /// Expiry must not come before the start.
    pub fn check_order(&self, message: &str) -> DomainResult<()> {
        check_date_order(self.start, self.expiry, message)
    }
}
