use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use osbill_core::{
    Aggregate, AggregateRoot, CreditId, CreditTypeId, DomainError, Entity, Event, Validity,
};
use osbill_projects::ProjectRef;

use crate::balance::check_transaction_value;

pub const EXPIRY_BEFORE_START: &str = "Expiry date must be after the start date";

/// Terms fixed when a credit is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTerms {
    pub project: ProjectRef,
    /// Code of the voucher the credit was claimed with.
    pub voucher_code: Option<String>,
    pub credit_type: CreditTypeId,
    pub validity: Validity,
    pub initial_balance: Decimal,
}

/// One signed movement against a credit (negative = consumption).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub transaction_id: Uuid,
    pub description: Option<String>,
    pub value: Decimal,
}

/// Aggregate root: Credit (prepaid balance attached to a project).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    id: CreditId,
    terms: Option<CreditTerms>,
    transactions: Vec<CreditTransaction>,
    version: u64,
}

impl Credit {
    /// Create an empty, not-yet-issued aggregate instance for rehydration.
    pub fn empty(id: CreditId) -> Self {
        Self {
            id,
            terms: None,
            transactions: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CreditId {
        self.id
    }

    pub fn terms(&self) -> Option<&CreditTerms> {
        self.terms.as_ref()
    }

    pub fn transactions(&self) -> &[CreditTransaction] {
        &self.transactions
    }

    pub fn initial_balance(&self) -> Decimal {
        self.terms
            .as_ref()
            .map_or(Decimal::ZERO, |t| t.initial_balance)
    }

    /// Initial balance plus every transaction.
    pub fn current_balance(&self) -> Decimal {
        self.initial_balance() + self.transactions.iter().map(|t| t.value).sum::<Decimal>()
    }

    /// Has started and not expired on `today`.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.terms
            .as_ref()
            .is_some_and(|t| t.validity.is_active(today))
    }

    /// Current balance, or zero when the credit is not active on `today`.
    pub fn available_balance(&self, today: NaiveDate) -> Decimal {
        if self.is_active(today) {
            self.current_balance()
        } else {
            Decimal::ZERO
        }
    }
}

impl AggregateRoot for Credit {
    type Id = CreditId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Entity for Credit {
    type Id = CreditId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        match &self.terms {
            Some(CreditTerms {
                project,
                voucher_code: Some(code),
                ..
            }) => format!("{} - {}", project.name, code),
            Some(terms) => terms.project.name.clone(),
            None => String::new(),
        }
    }
}

/// Command: IssueCredit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCredit {
    pub credit_id: CreditId,
    pub terms: CreditTerms,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordTransaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTransaction {
    pub credit_id: CreditId,
    pub transaction_id: Uuid,
    pub description: Option<String>,
    pub value: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AmendTransaction (change the value of a stored transaction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendTransaction {
    pub credit_id: CreditId,
    pub transaction_id: Uuid,
    pub value: Decimal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditCommand {
    IssueCredit(IssueCredit),
    RecordTransaction(RecordTransaction),
    AmendTransaction(AmendTransaction),
}

/// Event: CreditIssued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditIssued {
    pub credit_id: CreditId,
    pub terms: CreditTerms,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransactionRecorded. `value` is the value as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecorded {
    pub credit_id: CreditId,
    pub transaction: CreditTransaction,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransactionAmended. `value` is the value as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAmended {
    pub credit_id: CreditId,
    pub transaction_id: Uuid,
    pub value: Decimal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditEvent {
    CreditIssued(CreditIssued),
    TransactionRecorded(TransactionRecorded),
    TransactionAmended(TransactionAmended),
}

impl Event for CreditEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CreditEvent::CreditIssued(_) => "credits.credit.issued",
            CreditEvent::TransactionRecorded(_) => "credits.credit.transaction_recorded",
            CreditEvent::TransactionAmended(_) => "credits.credit.transaction_amended",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CreditEvent::CreditIssued(e) => e.occurred_at,
            CreditEvent::TransactionRecorded(e) => e.occurred_at,
            CreditEvent::TransactionAmended(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Credit {
    type Command = CreditCommand;
    type Event = CreditEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CreditEvent::CreditIssued(e) => {
                self.id = e.credit_id;
                self.terms = Some(e.terms.clone());
                self.transactions.clear();
            }
            CreditEvent::TransactionRecorded(e) => {
                self.transactions.push(e.transaction.clone());
            }
            CreditEvent::TransactionAmended(e) => {
                if let Some(tx) = self
                    .transactions
                    .iter_mut()
                    .find(|t| t.transaction_id == e.transaction_id)
                {
                    tx.value = e.value;
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CreditCommand::IssueCredit(cmd) => self.handle_issue(cmd),
            CreditCommand::RecordTransaction(cmd) => self.handle_record(cmd),
            CreditCommand::AmendTransaction(cmd) => self.handle_amend(cmd),
        }
    }
}

impl Credit {
    fn ensure_issued(&self, credit_id: CreditId) -> Result<&CreditTerms, DomainError> {
        let terms = self.terms.as_ref().ok_or_else(DomainError::not_found)?;
        if self.id != credit_id {
            return Err(DomainError::invariant("credit_id mismatch"));
        }
        Ok(terms)
    }

    fn other_values(&self, excluding: Option<Uuid>) -> Vec<Decimal> {
        self.transactions
            .iter()
            .filter(|t| Some(t.transaction_id) != excluding)
            .map(|t| t.value)
            .collect()
    }

    fn handle_issue(&self, cmd: &IssueCredit) -> Result<Vec<CreditEvent>, DomainError> {
        if self.terms.is_some() {
            return Err(DomainError::conflict("credit already exists"));
        }
        cmd.terms.validity.check_order(EXPIRY_BEFORE_START)?;

        Ok(vec![CreditEvent::CreditIssued(CreditIssued {
            credit_id: cmd.credit_id,
            terms: cmd.terms.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record(&self, cmd: &RecordTransaction) -> Result<Vec<CreditEvent>, DomainError> {
        let terms = self.ensure_issued(cmd.credit_id)?;

        if self
            .transactions
            .iter()
            .any(|t| t.transaction_id == cmd.transaction_id)
        {
            return Err(DomainError::conflict("transaction already recorded"));
        }

        let value =
            check_transaction_value(terms.initial_balance, &self.other_values(None), cmd.value)?;

        Ok(vec![CreditEvent::TransactionRecorded(TransactionRecorded {
            credit_id: cmd.credit_id,
            transaction: CreditTransaction {
                transaction_id: cmd.transaction_id,
                description: cmd.description.clone(),
                value,
            },
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_amend(&self, cmd: &AmendTransaction) -> Result<Vec<CreditEvent>, DomainError> {
        let terms = self.ensure_issued(cmd.credit_id)?;

        if !self
            .transactions
            .iter()
            .any(|t| t.transaction_id == cmd.transaction_id)
        {
            return Err(DomainError::not_found());
        }

        let others = self.other_values(Some(cmd.transaction_id));
        let value = check_transaction_value(terms.initial_balance, &others, cmd.value)?;

        Ok(vec![CreditEvent::TransactionAmended(TransactionAmended {
            credit_id: cmd.credit_id,
            transaction_id: cmd.transaction_id,
            value,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BALANCE_BELOW_ZERO;
    use osbill_core::ProjectId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_project() -> ProjectRef {
        ProjectRef {
            id: ProjectId::new(),
            name: "web-prod".to_string(),
            os_id: "8f1c".to_string(),
        }
    }

    fn test_terms(initial_balance: Decimal) -> CreditTerms {
        CreditTerms {
            project: test_project(),
            voucher_code: None,
            credit_type: CreditTypeId::new(),
            validity: Validity::new(date(2024, 1, 1), Some(date(2025, 1, 1))),
            initial_balance,
        }
    }

    fn issued_credit(initial_balance: Decimal) -> Credit {
        let id = CreditId::new();
        let mut credit = Credit::empty(id);
        credit
            .execute(&CreditCommand::IssueCredit(IssueCredit {
                credit_id: id,
                terms: test_terms(initial_balance),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        credit
    }

    fn record(credit: &Credit, value: Decimal) -> CreditCommand {
        CreditCommand::RecordTransaction(RecordTransaction {
            credit_id: credit.id_typed(),
            transaction_id: Uuid::now_v7(),
            description: None,
            value,
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn issue_credit_emits_credit_issued_event() {
        let id = CreditId::new();
        let credit = Credit::empty(id);
        let terms = test_terms(dec!(100));

        let events = credit
            .handle(&CreditCommand::IssueCredit(IssueCredit {
                credit_id: id,
                terms: terms.clone(),
                occurred_at: Utc::now(),
            }))
            .unwrap();

        assert_eq!(events.len(), 1);
        match &events[0] {
            CreditEvent::CreditIssued(e) => {
                assert_eq!(e.credit_id, id);
                assert_eq!(e.terms, terms);
            }
            _ => panic!("Expected CreditIssued event"),
        }
        assert_eq!(events[0].event_type(), "credits.credit.issued");
    }

    #[test]
    fn expiry_before_start_is_rejected() {
        let id = CreditId::new();
        let mut terms = test_terms(dec!(100));
        terms.validity = Validity::new(date(2024, 2, 1), Some(date(2024, 1, 1)));

        let err = Credit::empty(id)
            .handle(&CreditCommand::IssueCredit(IssueCredit {
                credit_id: id,
                terms,
                occurred_at: Utc::now(),
            }))
            .unwrap_err();
        assert_eq!(err.validation_message(), Some(EXPIRY_BEFORE_START));
    }

    #[test]
    fn balance_sums_initial_and_transactions() {
        let mut credit = issued_credit(dec!(100));
        assert_eq!(credit.current_balance(), dec!(100));

        credit.execute(&record(&credit, dec!(-30))).unwrap();
        credit.execute(&record(&credit, dec!(-20))).unwrap();
        assert_eq!(credit.current_balance(), dec!(50));
        assert_eq!(credit.version(), 3);
    }

    #[test]
    fn draining_to_zero_then_overdrawing_is_rejected() {
        let mut credit = issued_credit(dec!(100));
        credit.execute(&record(&credit, dec!(-50))).unwrap();
        credit.execute(&record(&credit, dec!(-50))).unwrap();
        assert_eq!(credit.current_balance(), dec!(0));

        let err = credit.execute(&record(&credit, dec!(-1))).unwrap_err();
        assert_eq!(err.validation_message(), Some(BALANCE_BELOW_ZERO));
        assert_eq!(credit.transactions().len(), 2);
    }

    #[test]
    fn rounding_noise_is_stored_as_exact_drain() {
        let mut credit = issued_credit(dec!(100));
        credit.execute(&record(&credit, dec!(-50))).unwrap();

        let events = credit.execute(&record(&credit, dec!(-50.005))).unwrap();
        match &events[0] {
            CreditEvent::TransactionRecorded(e) => assert_eq!(e.transaction.value, dec!(-50)),
            _ => panic!("Expected TransactionRecorded event"),
        }
        assert_eq!(credit.current_balance(), dec!(0));
    }

    #[test]
    fn amending_a_transaction_excludes_its_own_old_value() {
        let mut credit = issued_credit(dec!(100));
        credit.execute(&record(&credit, dec!(-40))).unwrap();
        let second = record(&credit, dec!(-60));
        credit.execute(&second).unwrap();

        let CreditCommand::RecordTransaction(second) = second else {
            unreachable!()
        };
        let amend = |value| {
            CreditCommand::AmendTransaction(AmendTransaction {
                credit_id: credit.id_typed(),
                transaction_id: second.transaction_id,
                value,
                occurred_at: Utc::now(),
            })
        };

        // 100 - 40 leaves 60; amending -60 to -61 overdraws.
        assert!(credit.handle(&amend(dec!(-61))).is_err());
        let events = credit.handle(&amend(dec!(-10))).unwrap();
        credit.apply(&events[0]);
        assert_eq!(credit.current_balance(), dec!(50));
    }

    #[test]
    fn recording_against_unissued_credit_is_not_found() {
        let credit = Credit::empty(CreditId::new());
        assert_eq!(
            credit.handle(&record(&credit, dec!(-1))).unwrap_err(),
            DomainError::NotFound
        );
    }

    #[test]
    fn available_balance_is_zero_outside_validity() {
        let credit = issued_credit(dec!(100));
        assert_eq!(credit.available_balance(date(2024, 6, 1)), dec!(100));
        assert_eq!(credit.available_balance(date(2023, 12, 31)), dec!(0));
        assert_eq!(credit.available_balance(date(2025, 1, 1)), dec!(0));
    }

    #[test]
    fn display_name_includes_voucher_code() {
        let id = CreditId::new();
        let mut credit = Credit::empty(id);
        let mut terms = test_terms(dec!(5));
        terms.voucher_code = Some("WELCOME50".to_string());
        credit
            .execute(&CreditCommand::IssueCredit(IssueCredit {
                credit_id: id,
                terms,
                occurred_at: Utc::now(),
            }))
            .unwrap();
        assert_eq!(credit.display_name(), "web-prod - WELCOME50");
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let credit = issued_credit(dec!(100));
        let before = credit.clone();
        let _ = credit.handle(&record(&credit, dec!(-10))).unwrap();
        assert_eq!(credit, before);
    }
}
