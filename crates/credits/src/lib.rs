//! Prepaid credits and grants attached to projects.
//!
//! Credits keep a transaction ledger whose running balance may never go
//! below zero; grants are fixed, time-bounded allowances without a ledger.

pub mod balance;
pub mod credit;
pub mod credit_type;
pub mod grant;

pub use balance::{BALANCE_BELOW_ZERO, SNAP_TOLERANCE, check_transaction_value};
pub use credit::{
    AmendTransaction, Credit, CreditCommand, CreditEvent, CreditIssued, CreditTerms,
    CreditTransaction, IssueCredit, RecordTransaction, TransactionAmended, TransactionRecorded,
};
pub use credit_type::CreditType;
pub use grant::{Grant, GrantType};
