//! Sale orders for OpenStack usage and their conversion into invoices.

pub mod order;

pub use order::{InvoiceDraft, LineDefaults, SaleOrder, SaleOrderLine};
