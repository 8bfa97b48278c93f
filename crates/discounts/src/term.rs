use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_core::{Constraint, DomainResult, Entity, TermDiscountId, Validate, Validity};
use osbill_core::validation::{check_date_order, check_percent};
use osbill_projects::{PartnerRef, ProjectRef};

use crate::percent_of;

pub const END_BEFORE_START: &str = "End date must be after the start date";

/// Percentage discount granted in exchange for a minimum spend commitment
/// over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDiscount {
    pub id: TermDiscountId,
    pub partner: PartnerRef,
    pub project: Option<ProjectRef>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub early_termination_date: Option<NaiveDate>,
    pub min_commit: Decimal,
    pub discount_percent: Decimal,
    pub superseded_by: Option<TermDiscountId>,
}

impl TermDiscount {
    pub fn new(
        partner: PartnerRef,
        start_date: NaiveDate,
        end_date: NaiveDate,
        min_commit: Decimal,
        discount_percent: Decimal,
    ) -> Self {
        Self {
            id: TermDiscountId::new(),
            partner,
            project: None,
            start_date,
            end_date,
            early_termination_date: None,
            min_commit,
            discount_percent,
            superseded_by: None,
        }
    }

    /// Early termination date when set, otherwise the end date.
    pub fn effective_end(&self) -> NaiveDate {
        self.early_termination_date.unwrap_or(self.end_date)
    }

    /// In force on `today`: started, not ended or terminated, not superseded.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.superseded_by.is_none()
            && Validity::new(self.start_date, Some(self.effective_end())).is_active(today)
    }

    pub fn discount_on(&self, amount: Decimal) -> Decimal {
        percent_of(amount, self.discount_percent)
    }
}

impl Entity for TermDiscount {
    type Id = TermDiscountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        match &self.project {
            Some(project) => project.name.clone(),
            None => self.partner.name.clone(),
        }
    }
}

fn check_discount_percent(discount: &TermDiscount) -> DomainResult<()> {
    check_percent("discount_percent", discount.discount_percent)
}

fn check_end_date(discount: &TermDiscount) -> DomainResult<()> {
    check_date_order(discount.start_date, Some(discount.end_date), END_BEFORE_START)
}

impl Validate for TermDiscount {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[
        Constraint {
            name: "discount_percent_range",
            check: check_discount_percent,
        },
        Constraint {
            name: "end_after_start",
            check: check_end_date,
        },
    ];
}
