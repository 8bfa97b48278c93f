use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_core::{
    Constraint, DomainError, DomainResult, Entity, PartnerId, ProductId, SupportSubscriptionId,
    SupportSubscriptionTypeId, Validate, Validity,
};
use osbill_core::validation::{check_date_order, check_not_blank, check_percent};
use osbill_projects::ProjectRef;

pub const OWNER_REQUIRED: &str = "Must set at one or both Project/Partner.";
pub const END_BEFORE_START: &str = "End date must be after the start date";

/// Support plan (e.g. "Gold"), priced as a share of the customer's usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportSubscriptionType {
    pub id: SupportSubscriptionTypeId,
    pub name: String,
    pub product: ProductId,
    /// Percentage of usage to compare to the plan price (0 to 100).
    pub usage_percent: Decimal,
}

impl SupportSubscriptionType {
    pub fn new(name: impl Into<String>, product: ProductId, usage_percent: Decimal) -> Self {
        Self {
            id: SupportSubscriptionTypeId::new(),
            name: name.into(),
            product,
            usage_percent,
        }
    }

    /// Usage-based support charge for `usage`.
    pub fn usage_charge(&self, usage: Decimal) -> Decimal {
        usage * self.usage_percent / Decimal::ONE_HUNDRED
    }
}

impl Entity for SupportSubscriptionType {
    type Id = SupportSubscriptionTypeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Validate for SupportSubscriptionType {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[
        Constraint {
            name: "name_required",
            check: |t| check_not_blank("name", &t.name),
        },
        Constraint {
            name: "usage_percent_range",
            check: |t| check_percent("usage_percent", t.usage_percent),
        },
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportBillingType {
    #[default]
    Paid,
    Complimentary,
}

/// Support subscription held by a partner, a project, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportSubscription {
    pub id: SupportSubscriptionId,
    pub project: Option<ProjectRef>,
    pub partner: Option<PartnerId>,
    pub billing_type: SupportBillingType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub subscription_type: SupportSubscriptionTypeId,
}

impl SupportSubscription {
    pub fn new(subscription_type: SupportSubscriptionTypeId, start_date: NaiveDate) -> Self {
        Self {
            id: SupportSubscriptionId::new(),
            project: None,
            partner: None,
            billing_type: SupportBillingType::default(),
            start_date,
            end_date: None,
            subscription_type,
        }
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        Validity::new(self.start_date, self.end_date).is_active(today)
    }

    pub fn is_billable(&self) -> bool {
        self.billing_type == SupportBillingType::Paid
    }
}

impl Entity for SupportSubscription {
    type Id = SupportSubscriptionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.project
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }
}

fn check_owner(subscription: &SupportSubscription) -> DomainResult<()> {
    if subscription.project.is_none() && subscription.partner.is_none() {
        return Err(DomainError::validation(OWNER_REQUIRED));
    }
    Ok(())
}

fn check_end_date(subscription: &SupportSubscription) -> DomainResult<()> {
    check_date_order(subscription.start_date, subscription.end_date, END_BEFORE_START)
}

impl Validate for SupportSubscription {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[
        Constraint {
            name: "owner_required",
            check: check_owner,
        },
        Constraint {
            name: "end_after_start",
            check: check_end_date,
        },
    ];
}
