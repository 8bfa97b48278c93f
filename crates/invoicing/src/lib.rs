//! Customer invoices for OpenStack usage.
//!
//! Pure domain logic: invoice records, the credit/debit ledger split, the
//! category/region breakdown used by invoice documents and the
//! outstanding-invoice snapshot attached to invoice e-mails.

pub mod categorise;
pub mod invoice;
pub mod outstanding;
pub mod query;
pub mod split;

pub use categorise::{CategorisedInvoice, Grouping, ProductCategoryBucket, RegionBucket};
pub use invoice::{Invoice, InvoiceLine, InvoiceState};
pub use outstanding::{OutstandingInvoice, OutstandingInvoices};
pub use query::{InMemoryInvoices, InvoiceQuery, select_outstanding};
pub use split::{Ledger, credit_and_debit};
