use std::string::FromUtf8Error;

use thiserror::Error;

/// Failures while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("This CSV can only be created for one invoice at a time")]
    SingleInvoiceOnly,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("report is not valid utf-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Failures while e-mailing invoices.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("mail context error: {0}")]
    Context(#[from] serde_json::Error),

    #[error("collaborator failed: {0}")]
    Collaborator(#[from] anyhow::Error),
}
