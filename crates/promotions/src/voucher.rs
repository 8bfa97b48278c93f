use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use osbill_core::{
    Constraint, CustomerGroupId, DomainError, DomainResult, Entity, PartnerId, Validate,
    VoucherCodeId,
};
use osbill_core::validation::check_not_blank;
use osbill_credits::{CreditTerms, Grant};
use osbill_projects::ProjectRef;

use crate::offer::{CreditOffer, GrantOffer};

pub const CLAIMED_MULTI_USE: &str = "Can't claim if multi_use is true.";

/// Sign-up voucher code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherCode {
    pub id: VoucherCodeId,
    /// Unique across all voucher codes.
    pub code: String,
    pub claimed: bool,
    /// Multi-use codes are never marked claimed.
    pub multi_use: bool,
    pub expiry_date: Option<NaiveDate>,
    pub sales_person: Option<PartnerId>,
    pub customer_group: Option<CustomerGroupId>,
    pub credit: Option<CreditOffer>,
    pub grant: Option<GrantOffer>,
    /// Default quota size applied on sign-up.
    pub quota_size: Option<String>,
    pub tags: Vec<String>,
}

/// What a project receives for claiming a voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherRewards {
    pub credit: Option<CreditTerms>,
    pub grant: Option<Grant>,
    pub customer_group: Option<CustomerGroupId>,
    pub quota_size: Option<String>,
}

impl VoucherCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            id: VoucherCodeId::new(),
            code: code.into(),
            claimed: false,
            multi_use: false,
            expiry_date: None,
            sales_person: None,
            customer_group: None,
            credit: None,
            grant: None,
            quota_size: None,
            tags: Vec::new(),
        }
    }

    /// Expired on `today` (the expiry date itself is no longer valid).
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|expiry| today >= expiry)
    }

    /// Claim the code for `project`, producing the benefits it carries.
    ///
    /// Single-use codes become claimed; multi-use codes stay claimable.
    pub fn claim(&mut self, project: &ProjectRef, today: NaiveDate) -> DomainResult<VoucherRewards> {
        if self.is_expired(today) {
            return Err(DomainError::validation("voucher code has expired"));
        }
        if self.claimed {
            return Err(DomainError::conflict("voucher code already claimed"));
        }

        let code = Some(self.code.as_str());
        let rewards = VoucherRewards {
            credit: self
                .credit
                .as_ref()
                .map(|offer| offer.terms_for(project, code, today))
                .transpose()?,
            grant: self
                .grant
                .as_ref()
                .map(|offer| offer.grant_for(project, code, today))
                .transpose()?,
            customer_group: self.customer_group,
            quota_size: self.quota_size.clone(),
        };

        if !self.multi_use {
            self.claimed = true;
        }
        tracing::info!(code = %self.code, project = %project.os_id, "voucher code claimed");
        Ok(rewards)
    }
}

impl Entity for VoucherCode {
    type Id = VoucherCodeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.code.clone()
    }
}

fn check_code(voucher: &VoucherCode) -> DomainResult<()> {
    check_not_blank("code", &voucher.code)
}

fn check_claimed_if_multi_use(voucher: &VoucherCode) -> DomainResult<()> {
    if voucher.multi_use && voucher.claimed {
        return Err(DomainError::validation(CLAIMED_MULTI_USE));
    }
    Ok(())
}

impl Validate for VoucherCode {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[
        Constraint {
            name: "code_required",
            check: check_code,
        },
        Constraint {
            name: "multi_use_never_claimed",
            check: check_claimed_if_multi_use,
        },
    ];
}
