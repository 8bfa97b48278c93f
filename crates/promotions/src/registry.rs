//! Code lookup with uniqueness of voucher and referral codes.

use std::collections::HashMap;

use chrono::NaiveDate;

use osbill_core::{DomainError, DomainResult, Validate};
use osbill_credits::CreditTerms;
use osbill_projects::ProjectRef;

use crate::referral::ReferralCode;
use crate::voucher::{VoucherCode, VoucherRewards};

#[derive(Debug, Default)]
pub struct CodeRegistry {
    vouchers: HashMap<String, VoucherCode>,
    referrals: HashMap<String, (ReferralCode, usize)>,
}

impl CodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_voucher(&mut self, voucher: VoucherCode) -> DomainResult<()> {
        voucher.validate()?;
        if self.vouchers.contains_key(&voucher.code) {
            return Err(DomainError::conflict(format!(
                "voucher code {} already exists",
                voucher.code
            )));
        }
        self.vouchers.insert(voucher.code.clone(), voucher);
        Ok(())
    }

    pub fn register_referral(&mut self, referral: ReferralCode) -> DomainResult<()> {
        referral.validate()?;
        if self.referrals.contains_key(&referral.code) {
            return Err(DomainError::conflict(format!(
                "referral code {} already exists",
                referral.code
            )));
        }
        self.referrals.insert(referral.code.clone(), (referral, 0));
        Ok(())
    }

    pub fn voucher(&self, code: &str) -> Option<&VoucherCode> {
        self.vouchers.get(code)
    }

    pub fn referral(&self, code: &str) -> Option<&ReferralCode> {
        self.referrals.get(code).map(|(r, _)| r)
    }

    pub fn referral_uses(&self, code: &str) -> usize {
        self.referrals.get(code).map_or(0, |(_, used)| *used)
    }

    pub fn claim_voucher(
        &mut self,
        code: &str,
        project: &ProjectRef,
        today: NaiveDate,
    ) -> DomainResult<VoucherRewards> {
        let voucher = self.vouchers.get_mut(code).ok_or_else(DomainError::not_found)?;
        voucher.claim(project, today)
    }

    /// Sign `project` up with a referral code, returning the referee's credit.
    pub fn redeem_referral(
        &mut self,
        code: &str,
        project: &ProjectRef,
        today: NaiveDate,
    ) -> DomainResult<CreditTerms> {
        let (referral, used) = self.referrals.get_mut(code).ok_or_else(DomainError::not_found)?;
        if !referral.has_uses_remaining(*used) {
            return Err(DomainError::conflict(format!(
                "referral code {code} has no uses left"
            )));
        }
        let terms = referral.referral_credit_for(project, today)?;
        *used += 1;
        tracing::info!(code, uses = *used, "referral code redeemed");
        Ok(terms)
    }
}
