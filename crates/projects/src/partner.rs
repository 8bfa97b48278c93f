use serde::{Deserialize, Serialize};

use osbill_core::{
    Constraint, CustomerGroupId, DomainResult, Entity, PartnerId, ReferralCodeId, ResellerId,
    TrialId, Validate,
};
use osbill_core::validation::check_not_blank;

/// Customer group (pricing segment, e.g. "education", "government").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerGroup {
    pub id: CustomerGroupId,
    pub name: String,
}

impl CustomerGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CustomerGroupId::new(),
            name: name.into(),
        }
    }
}

/// OpenStack-specific fields attached to a partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerProfile {
    pub stripe_customer_id: Option<String>,
    pub customer_group: Option<CustomerGroupId>,
    pub reseller: Option<ResellerId>,
    /// Trial the partner signed up with.
    pub trial: Option<TrialId>,
    /// Referral code used at signup.
    pub referral: Option<ReferralCodeId>,
    /// Partner buys under the cloud framework agreement.
    pub cloud_framework_agreement: bool,
}

/// A partner (customer, reseller or contact person).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub email: Option<String>,
    pub profile: PartnerProfile,
}

impl Partner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PartnerId::new(),
            name: name.into(),
            email: None,
            profile: PartnerProfile::default(),
        }
    }

    pub fn is_reseller(&self) -> bool {
        self.profile.reseller.is_some()
    }

    pub fn to_ref(&self) -> PartnerRef {
        PartnerRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Lightweight partner reference for records displayed by partner name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartnerRef {
    pub id: PartnerId,
    pub name: String,
}

impl Entity for Partner {
    type Id = PartnerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

fn check_name(partner: &Partner) -> DomainResult<()> {
    check_not_blank("name", &partner.name)
}

impl Validate for Partner {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[Constraint {
        name: "name_required",
        check: check_name,
    }];
}
