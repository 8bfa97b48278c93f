use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use osbill_core::{Constraint, DomainResult, Entity, TrialId, Validate};
use osbill_core::validation::check_date_order;
use osbill_projects::PartnerRef;

pub const END_BEFORE_START: &str = "End date must be after the start date";

/// Where a trial account stands on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialStatus {
    Pending,
    Active,
    Expired,
    Suspended,
    Terminated,
    Upgraded,
}

/// Free trial a partner signed up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub id: TrialId,
    pub partner: PartnerRef,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub account_suspended_on: Option<NaiveDate>,
    pub account_terminated_on: Option<NaiveDate>,
    pub account_upgraded_on: Option<NaiveDate>,
}

impl Trial {
    pub fn new(partner: PartnerRef, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: TrialId::new(),
            partner,
            start_date,
            end_date,
            account_suspended_on: None,
            account_terminated_on: None,
            account_upgraded_on: None,
        }
    }

    /// Upgrade wins over termination, termination over suspension; otherwise
    /// the trial dates decide.
    pub fn status(&self, today: NaiveDate) -> TrialStatus {
        let reached = |d: Option<NaiveDate>| d.is_some_and(|d| d <= today);

        if reached(self.account_upgraded_on) {
            TrialStatus::Upgraded
        } else if reached(self.account_terminated_on) {
            TrialStatus::Terminated
        } else if reached(self.account_suspended_on) {
            TrialStatus::Suspended
        } else if today < self.start_date {
            TrialStatus::Pending
        } else if today < self.end_date {
            TrialStatus::Active
        } else {
            TrialStatus::Expired
        }
    }
}

impl Entity for Trial {
    type Id = TrialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.partner.name.clone()
    }
}

fn check_end_date(trial: &Trial) -> DomainResult<()> {
    check_date_order(trial.start_date, Some(trial.end_date), END_BEFORE_START)
}

impl Validate for Trial {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[Constraint {
        name: "end_after_start",
        check: check_end_date,
    }];
}
