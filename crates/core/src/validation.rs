//! Write-time validation: records declare a list of named constraints that are
//! evaluated before the record is stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{DomainError, DomainResult};

/// A named validation predicate over a record.
pub struct Constraint<T> {
    /// Stable rule name (useful in logs and for targeted tests).
    pub name: &'static str,
    pub check: fn(&T) -> DomainResult<()>,
}

impl<T> core::fmt::Debug for Constraint<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Constraint").field("name", &self.name).finish()
    }
}

/// Records that carry write-time constraints.
pub trait Validate: Sized + 'static {
    /// Constraints evaluated on every write, in declaration order.
    const CONSTRAINTS: &'static [Constraint<Self>];

    /// Run every constraint; the first failure is returned.
    fn validate(&self) -> DomainResult<()> {
        for constraint in Self::CONSTRAINTS {
            (constraint.check)(self)?;
        }
        Ok(())
    }

    /// Names and errors of every failing constraint.
    fn violations(&self) -> Vec<(&'static str, DomainError)> {
        Self::CONSTRAINTS
            .iter()
            .filter_map(|c| (c.check)(self).err().map(|e| (c.name, e)))
            .collect()
    }
}

/// Reject an end date that falls before the start date. Equal dates pass.
pub fn check_date_order(
    start: NaiveDate,
    end: Option<NaiveDate>,
    message: &str,
) -> DomainResult<()> {
    match end {
        Some(end) if start > end => Err(DomainError::validation(message)),
        _ => Ok(()),
    }
}

/// Percentages are bounded to the closed range 0..=100.
pub fn check_percent(field: &str, value: Decimal) -> DomainResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(DomainError::validation(format!(
            "{field} must be between 0-100"
        )));
    }
    Ok(())
}

pub fn check_non_negative(field: &str, value: Decimal) -> DomainResult<()> {
    if value < Decimal::ZERO {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

pub fn check_not_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
