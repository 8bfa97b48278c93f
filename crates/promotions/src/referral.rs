use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_core::{Constraint, DomainResult, Entity, ReferralCodeId, Validate};
use osbill_core::validation::check_not_blank;
use osbill_credits::CreditTerms;
use osbill_projects::{PartnerRef, ProjectRef};

use crate::offer::CreditOffer;

/// `allowed_uses` value meaning the code never runs out.
pub const UNLIMITED_USES: i32 = -1;

/// Code a partner hands out; new sign-ups get a credit, and the referring
/// partner is rewarded once the referee's usage passes a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralCode {
    pub id: ReferralCodeId,
    pub partner: PartnerRef,
    /// Unique across all referral codes.
    pub code: String,
    /// Credit given to the referred sign-up.
    pub referral_credit: CreditOffer,
    pub before_reward_usage_threshold: Decimal,
    /// Credit given to the referring partner.
    pub reward_credit: CreditOffer,
    pub allowed_uses: i32,
}

impl ReferralCode {
    pub fn new(
        partner: PartnerRef,
        code: impl Into<String>,
        referral_credit: CreditOffer,
        reward_credit: CreditOffer,
        before_reward_usage_threshold: Decimal,
    ) -> Self {
        Self {
            id: ReferralCodeId::new(),
            partner,
            code: code.into(),
            referral_credit,
            before_reward_usage_threshold,
            reward_credit,
            allowed_uses: UNLIMITED_USES,
        }
    }

    pub fn has_uses_remaining(&self, used: usize) -> bool {
        match usize::try_from(self.allowed_uses) {
            Ok(allowed) => used < allowed,
            Err(_) => true,
        }
    }

    /// The referring partner has earned the reward once the referee's usage
    /// reaches the threshold.
    pub fn reward_due(&self, referee_usage: Decimal) -> bool {
        referee_usage >= self.before_reward_usage_threshold
    }

    pub fn referral_credit_for(
        &self,
        project: &ProjectRef,
        today: NaiveDate,
    ) -> DomainResult<CreditTerms> {
        self.referral_credit.terms_for(project, None, today)
    }

    pub fn reward_credit_for(
        &self,
        project: &ProjectRef,
        today: NaiveDate,
    ) -> DomainResult<CreditTerms> {
        self.reward_credit.terms_for(project, None, today)
    }
}

impl Entity for ReferralCode {
    type Id = ReferralCodeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        format!("{} - {}", self.partner.name, self.code)
    }
}

impl Validate for ReferralCode {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[Constraint {
        name: "code_required",
        check: |r| check_not_blank("code", &r.code),
    }];
}
