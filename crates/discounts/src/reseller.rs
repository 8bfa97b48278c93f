use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_core::{
    Constraint, DomainResult, Entity, ProductId, ProjectId, ResellerId, ResellerTierId, Validate,
};
use osbill_core::validation::{check_not_blank, check_percent};
use osbill_projects::PartnerRef;

/// Bundle of benefits granted to resellers above a usage threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResellerTier {
    pub id: ResellerTierId,
    pub name: String,
    pub min_usage_threshold: Decimal,
    pub discount_percent: Decimal,
    pub discount_product: ProductId,
    /// Free support hours per month.
    pub free_support_hours: u32,
    /// Free monthly demo credit.
    pub free_monthly_credit: Decimal,
    pub free_monthly_credit_product: ProductId,
}

impl Entity for ResellerTier {
    type Id = ResellerTierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

fn check_tier_name(tier: &ResellerTier) -> DomainResult<()> {
    check_not_blank("name", &tier.name)
}

fn check_discount_percent(tier: &ResellerTier) -> DomainResult<()> {
    check_percent("discount_percent", tier.discount_percent)
}

impl Validate for ResellerTier {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[
        Constraint {
            name: "name_required",
            check: check_tier_name,
        },
        Constraint {
            name: "discount_percent_range",
            check: check_discount_percent,
        },
    ];
}

/// Highest tier whose usage threshold `usage` reaches.
pub fn tier_for_usage(tiers: &[ResellerTier], usage: Decimal) -> Option<&ResellerTier> {
    tiers
        .iter()
        .filter(|t| usage >= t.min_usage_threshold)
        .max_by(|a, b| a.min_usage_threshold.cmp(&b.min_usage_threshold))
}

/// A partner signed up to resell the cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reseller {
    pub id: ResellerId,
    pub partner: PartnerRef,
    pub tier: ResellerTierId,
    pub hide_billing: bool,
    pub alternative_billing_url: Option<String>,
    pub hide_support: bool,
    pub alternative_support_url: Option<String>,
    /// Demo project handed to the reseller.
    pub demo_project: Option<ProjectId>,
}

impl Reseller {
    pub fn new(partner: PartnerRef, tier: ResellerTierId) -> Self {
        Self {
            id: ResellerId::new(),
            partner,
            tier,
            hide_billing: false,
            alternative_billing_url: None,
            hide_support: false,
            alternative_support_url: None,
            demo_project: None,
        }
    }
}

impl Entity for Reseller {
    type Id = ResellerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.partner.name.clone()
    }
}
