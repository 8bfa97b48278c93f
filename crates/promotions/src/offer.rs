//! Credit and grant templates carried by codes, turned into concrete
//! records when a code is used.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_core::{CreditTypeId, DomainError, DomainResult, GrantTypeId, Validity};
use osbill_credits::{CreditTerms, Grant};
use osbill_projects::ProjectRef;

/// Validity starting `today` and lasting `duration_days`; zero days means the
/// benefit does not expire.
fn validity_from(today: NaiveDate, duration_days: u32) -> DomainResult<Validity> {
    if duration_days == 0 {
        return Ok(Validity::open_ended(today));
    }
    let expiry = today
        .checked_add_days(Days::new(u64::from(duration_days)))
        .ok_or_else(|| DomainError::invariant("credit expiry out of range"))?;
    Ok(Validity::new(today, Some(expiry)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditOffer {
    pub initial_balance: Decimal,
    pub credit_type: CreditTypeId,
    pub duration_days: u32,
}

impl CreditOffer {
    pub fn terms_for(
        &self,
        project: &ProjectRef,
        voucher_code: Option<&str>,
        today: NaiveDate,
    ) -> DomainResult<CreditTerms> {
        Ok(CreditTerms {
            project: project.clone(),
            voucher_code: voucher_code.map(str::to_string),
            credit_type: self.credit_type,
            validity: validity_from(today, self.duration_days)?,
            initial_balance: self.initial_balance,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantOffer {
    pub value: Decimal,
    pub grant_type: GrantTypeId,
    pub duration_days: u32,
}

impl GrantOffer {
    pub fn grant_for(
        &self,
        project: &ProjectRef,
        voucher_code: Option<&str>,
        today: NaiveDate,
    ) -> DomainResult<Grant> {
        let mut grant = Grant::new(
            project.clone(),
            self.grant_type,
            validity_from(today, self.duration_days)?,
            self.value,
        );
        grant.voucher_code = voucher_code.map(str::to_string);
        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duration_sets_expiry_and_zero_means_open_ended() {
        assert_eq!(
            validity_from(date(2024, 1, 30), 30).unwrap(),
            Validity::new(date(2024, 1, 30), Some(date(2024, 2, 29)))
        );
        assert_eq!(
            validity_from(date(2024, 1, 30), 0).unwrap(),
            Validity::open_ended(date(2024, 1, 30))
        );
    }
}
