use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use rust_decimal::Decimal;

use osbill_core::{InvoiceId, PartnerId, ProjectId};

use crate::invoice::Invoice;

/// Invoices with money still owed by the same customer.
///
/// Project invoices match on project; invoices without a project match on
/// partner.
pub fn select_outstanding<'a, I>(
    invoices: I,
    project: Option<ProjectId>,
    partner: PartnerId,
) -> Vec<&'a Invoice>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    invoices
        .into_iter()
        .filter(|invoice| invoice.amount_residual_signed > Decimal::ZERO)
        .filter(|invoice| match project {
            Some(project) => invoice.project.as_ref().is_some_and(|p| p.id == project),
            None => invoice.partner.id == partner,
        })
        .collect()
}

/// Read access to stored invoices.
pub trait InvoiceQuery: Send + Sync {
    fn outstanding(
        &self,
        project: Option<ProjectId>,
        partner: PartnerId,
    ) -> anyhow::Result<Vec<Invoice>>;
}

impl<S> InvoiceQuery for Arc<S>
where
    S: InvoiceQuery + ?Sized,
{
    fn outstanding(
        &self,
        project: Option<ProjectId>,
        partner: PartnerId,
    ) -> anyhow::Result<Vec<Invoice>> {
        (**self).outstanding(project, partner)
    }
}

/// In-memory invoice store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInvoices {
    inner: RwLock<Vec<Invoice>>,
}

impl InMemoryInvoices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, invoice: Invoice) -> anyhow::Result<()> {
        let mut invoices = self
            .inner
            .write()
            .map_err(|_| anyhow!("invoice store lock poisoned"))?;
        invoices.retain(|i| i.id != invoice.id);
        invoices.push(invoice);
        Ok(())
    }

    pub fn get(&self, id: InvoiceId) -> Option<Invoice> {
        let invoices = self.inner.read().ok()?;
        invoices.iter().find(|i| i.id == id).cloned()
    }

    pub fn list(&self) -> Vec<Invoice> {
        match self.inner.read() {
            Ok(invoices) => invoices.clone(),
            Err(_) => vec![],
        }
    }
}

impl InvoiceQuery for InMemoryInvoices {
    fn outstanding(
        &self,
        project: Option<ProjectId>,
        partner: PartnerId,
    ) -> anyhow::Result<Vec<Invoice>> {
        let invoices = self
            .inner
            .read()
            .map_err(|_| anyhow!("invoice store lock poisoned"))?;
        Ok(select_outstanding(invoices.iter(), project, partner)
            .into_iter()
            .cloned()
            .collect())
    }
}
