use osbill_invoicing::Invoice;

use crate::config::ReportingConfig;
use crate::error::ReportError;
use crate::invoice_csv::render_invoice_csv;

/// Computes a download filename (without extension) from the invoices.
pub type ReportNaming = fn(&[&Invoice]) -> String;

/// A downloadable CSV report.
#[derive(Debug, Clone)]
pub struct CsvReportDefinition {
    pub name: String,
    pub print_report_name: Option<ReportNaming>,
}

impl CsvReportDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            print_report_name: None,
        }
    }

    pub fn with_naming(mut self, naming: ReportNaming) -> Self {
        self.print_report_name = Some(naming);
        self
    }

    /// The invoice usage CSV, named after its invoice.
    pub fn openstack_invoice(config: &ReportingConfig) -> Self {
        Self::new(config.default_report_filename.clone()).with_naming(invoice_report_name)
    }

    pub fn filename(&self, invoices: &[&Invoice]) -> String {
        match self.print_report_name {
            Some(naming) if !invoices.is_empty() => format!("{}.csv", naming(invoices)),
            _ => format!("{}.csv", self.name),
        }
    }
}

fn invoice_report_name(invoices: &[&Invoice]) -> String {
    let names: Vec<_> = invoices.iter().map(|i| i.name.replace('/', "_")).collect();
    names.join("-")
}

/// Rendered CSV with its response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDownload {
    pub filename: String,
    pub body: String,
}

impl CsvDownload {
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", "text/csv".to_string()),
            ("Content-Length", self.body.len().to_string()),
            ("Content-Disposition", content_disposition(&self.filename)),
        ]
    }
}

pub fn csv_download(
    definition: &CsvReportDefinition,
    invoices: &[&Invoice],
) -> Result<CsvDownload, ReportError> {
    let body = render_invoice_csv(invoices)?;
    Ok(CsvDownload {
        filename: definition.filename(invoices),
        body,
    })
}

/// `Content-Disposition` value with an RFC 5987 encoded filename.
pub fn content_disposition(filename: &str) -> String {
    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename*=UTF-8''{encoded}")
}
