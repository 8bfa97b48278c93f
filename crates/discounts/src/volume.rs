use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_core::{
    Constraint, CustomerGroupId, DomainError, DomainResult, Entity, Validate,
    VolumeDiscountRangeId,
};
use osbill_core::validation::check_percent;
use osbill_projects::CustomerGroup;

/// Discount tier for a usage-amount bracket, optionally limited to one
/// customer group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDiscountRange {
    pub id: VolumeDiscountRangeId,
    pub customer_group: Option<CustomerGroup>,
    pub min: Decimal,
    pub use_max: bool,
    pub max: Option<Decimal>,
    pub discount_percent: Decimal,
}

impl VolumeDiscountRange {
    /// Bracket `min..max`.
    pub fn bounded(min: Decimal, max: Decimal, discount_percent: Decimal) -> Self {
        Self {
            id: VolumeDiscountRangeId::new(),
            customer_group: None,
            min,
            use_max: true,
            max: Some(max),
            discount_percent,
        }
    }

    /// Bracket `min` and higher.
    pub fn open(min: Decimal, discount_percent: Decimal) -> Self {
        Self {
            id: VolumeDiscountRangeId::new(),
            customer_group: None,
            min,
            use_max: false,
            max: None,
            discount_percent,
        }
    }

    pub fn for_group(mut self, group: CustomerGroup) -> Self {
        self.customer_group = Some(group);
        self
    }

    fn upper_bound(&self) -> Option<Decimal> {
        if self.use_max { self.max } else { None }
    }

    /// `min` inclusive, `max` exclusive when the range uses one.
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && self.upper_bound().is_none_or(|max| amount < max)
    }

    fn group_id(&self) -> Option<CustomerGroupId> {
        self.customer_group.as_ref().map(|g| g.id)
    }
}

impl Entity for VolumeDiscountRange {
    type Id = VolumeDiscountRangeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        let mut name = match self.upper_bound() {
            Some(max) => format!("{} to {}", self.min, max),
            None => format!("{} and higher", self.min),
        };
        if let Some(group) = &self.customer_group {
            name.push(' ');
            name.push_str(&group.name);
        }
        name
    }
}

fn check_discount_percent(range: &VolumeDiscountRange) -> DomainResult<()> {
    check_percent("discount_percent", range.discount_percent)
}

// A zero max counts as unset.
fn check_max(range: &VolumeDiscountRange) -> DomainResult<()> {
    match range.max {
        Some(max) if !max.is_zero() && range.min > max => {
            Err(DomainError::validation("Min must be less than max."))
        }
        _ => Ok(()),
    }
}

impl Validate for VolumeDiscountRange {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[
        Constraint {
            name: "discount_percent_range",
            check: check_discount_percent,
        },
        Constraint {
            name: "min_below_max",
            check: check_max,
        },
    ];
}

/// Range that applies to `amount` for a customer in `group`.
///
/// Only ranges for the same group (or, for customers without a group, ranges
/// without one) are considered; overlapping brackets resolve to the one with
/// the highest minimum.
pub fn select_range(
    ranges: &[VolumeDiscountRange],
    amount: Decimal,
    group: Option<CustomerGroupId>,
) -> Option<&VolumeDiscountRange> {
    ranges
        .iter()
        .filter(|r| r.group_id() == group && r.contains(amount))
        .max_by(|a, b| a.min.cmp(&b.min))
}
