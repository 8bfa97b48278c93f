//! Invoice e-mail run.
//!
//! Every unsent invoice is mailed with its usage CSV attached and a snapshot
//! of what the customer still owes. Storage and delivery are ports so the run
//! itself stays free of IO.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use osbill_core::{AttachmentId, InvoiceId};
use osbill_invoicing::{Invoice, InvoiceQuery, OutstandingInvoice, OutstandingInvoices};

use crate::config::ReportingConfig;
use crate::error::DispatchError;
use crate::invoice_csv::render_invoice_csv;

/// A file to be stored against an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mimetype: String,
    pub invoice: InvoiceId,
    pub data: Vec<u8>,
}

/// A rendered-to-be invoice e-mail.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceMail {
    pub template: String,
    pub invoice: InvoiceId,
    pub attachments: Vec<AttachmentId>,
    pub outstanding: OutstandingInvoices,
    /// Template context: the caller's context plus the outstanding snapshot.
    pub context: JsonValue,
}

pub trait AttachmentStore: Send + Sync {
    fn store(&self, attachment: Attachment) -> anyhow::Result<AttachmentId>;
}

pub trait MailSender: Send + Sync {
    fn send(&self, mail: &InvoiceMail) -> anyhow::Result<()>;
}

impl<S> AttachmentStore for Arc<S>
where
    S: AttachmentStore + ?Sized,
{
    fn store(&self, attachment: Attachment) -> anyhow::Result<AttachmentId> {
        (**self).store(attachment)
    }
}

impl<S> MailSender for Arc<S>
where
    S: MailSender + ?Sized,
{
    fn send(&self, mail: &InvoiceMail) -> anyhow::Result<()> {
        (**self).send(mail)
    }
}

pub struct InvoiceMailer<Q, A, M> {
    config: ReportingConfig,
    invoices: Q,
    attachments: A,
    mail: M,
}

impl<Q, A, M> InvoiceMailer<Q, A, M>
where
    Q: InvoiceQuery,
    A: AttachmentStore,
    M: MailSender,
{
    pub fn new(config: ReportingConfig, invoices: Q, attachments: A, mail: M) -> Self {
        Self {
            config,
            invoices,
            attachments,
            mail,
        }
    }

    pub fn config(&self) -> &ReportingConfig {
        &self.config
    }

    /// Attachment filename: `{prefix}{invoice name}.csv`, with `/` replaced.
    /// Invoices that are not posted use the fallback name.
    pub fn attachment_name(&self, invoice: &Invoice) -> String {
        let name = if invoice.is_posted() && !invoice.name.is_empty() {
            invoice.name.as_str()
        } else {
            self.config.fallback_invoice_name.as_str()
        };
        format!(
            "{}{}.csv",
            self.config.detail_attachment_prefix,
            name.replace('/', "_")
        )
    }

    /// Mail every invoice not yet sent, classifying outstanding invoices
    /// against today's UTC date. Returns how many were sent.
    pub fn send_invoice_emails(
        &self,
        invoices: &mut [Invoice],
        context: &JsonValue,
    ) -> Result<usize, DispatchError> {
        self.send_invoice_emails_as_of(invoices, context, Utc::now().date_naive())
    }

    /// Stops at the first failure; invoices mailed before it stay marked sent.
    pub fn send_invoice_emails_as_of(
        &self,
        invoices: &mut [Invoice],
        context: &JsonValue,
        today: NaiveDate,
    ) -> Result<usize, DispatchError> {
        let mut sent = 0;
        for invoice in invoices.iter_mut() {
            if invoice.is_move_sent {
                tracing::debug!(invoice = %invoice.name, "invoice already sent; skipping");
                continue;
            }
            self.send_one(invoice, context, today)?;
            invoice.mark_sent();
            sent += 1;
        }
        Ok(sent)
    }

    fn send_one(
        &self,
        invoice: &Invoice,
        context: &JsonValue,
        today: NaiveDate,
    ) -> Result<(), DispatchError> {
        let project = invoice.project.as_ref().map(|p| p.id);
        let owing = self.invoices.outstanding(project, invoice.partner.id)?;
        let outstanding = OutstandingInvoices::collect(&owing, today);

        let csv = render_invoice_csv(&[invoice])?;
        let attachment = self.attachments.store(Attachment {
            name: self.attachment_name(invoice),
            mimetype: "text/csv".to_string(),
            invoice: invoice.id,
            data: csv.into_bytes(),
        })?;

        let mail = InvoiceMail {
            template: self.config.invoice_mail_template.clone(),
            invoice: invoice.id,
            attachments: vec![attachment],
            context: mail_context(context, &outstanding)?,
            outstanding,
        };
        self.mail.send(&mail)?;

        tracing::info!(
            invoice = %invoice.name,
            partner = %invoice.partner.name,
            outstanding = %mail.outstanding.grand_total(),
            "invoice e-mailed"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OutstandingContext<'a> {
    overdue: Vec<&'a OutstandingInvoice>,
    current: Vec<&'a OutstandingInvoice>,
    overdue_total: Decimal,
    current_total: Decimal,
    total_owing: Decimal,
}

fn mail_context(
    context: &JsonValue,
    outstanding: &OutstandingInvoices,
) -> Result<JsonValue, DispatchError> {
    let mut merged = match context {
        JsonValue::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let snapshot = OutstandingContext {
        overdue: outstanding.ordered_overdue(),
        current: outstanding.ordered_current(),
        overdue_total: outstanding.overdue_total(),
        current_total: outstanding.current_total(),
        total_owing: outstanding.grand_total(),
    };
    merged.insert(
        "outstanding_invoices".to_string(),
        serde_json::to_value(snapshot)?,
    );
    Ok(JsonValue::Object(merged))
}
