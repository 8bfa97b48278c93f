//! Invoice reporting: the per-invoice usage CSV, its download response and
//! the invoice e-mail run that attaches it.

pub mod config;
pub mod download;
pub mod error;
pub mod invoice_csv;
pub mod mailer;

pub use config::ReportingConfig;
pub use download::{CsvDownload, CsvReportDefinition, content_disposition, csv_download};
pub use error::{DispatchError, ReportError};
pub use invoice_csv::{CSV_COLUMNS, render_invoice_csv};
pub use mailer::{
    Attachment, AttachmentStore, InvoiceMail, InvoiceMailer, MailSender,
};
