use csv::{QuoteStyle, WriterBuilder};
use rust_decimal::Decimal;
use serde::Serialize;

use osbill_invoicing::{Invoice, InvoiceLine};

use crate::error::ReportError;

pub const CSV_COLUMNS: [&str; 12] = [
    "name",
    "project",
    "project_id",
    "product",
    "region",
    "resource_name",
    "resource_type",
    "resource_id",
    "unit_type",
    "units",
    "price_per_unit",
    "subtotal",
];

const SUBTOTAL_DECIMALS: u32 = 6;

/// Text columns are pre-quoted and written with `QuoteStyle::Never`, so a
/// text value is quoted even when it reads like a number.
#[derive(Debug, Serialize)]
struct InvoiceCsvRow {
    name: String,
    project: String,
    project_id: String,
    product: String,
    region: String,
    resource_name: String,
    resource_type: String,
    resource_id: String,
    unit_type: String,
    units: Decimal,
    price_per_unit: Decimal,
    subtotal: Decimal,
}

impl From<&InvoiceLine> for InvoiceCsvRow {
    fn from(line: &InvoiceLine) -> Self {
        let project = line.project.as_ref();
        Self {
            name: quoted(&line.name),
            project: quoted(project.map(|p| p.name.as_str()).unwrap_or_default()),
            project_id: quoted(project.map(|p| p.os_id.as_str()).unwrap_or_default()),
            product: quoted(line.product.as_ref().map(|p| p.name.as_str()).unwrap_or_default()),
            region: quoted(&line.region),
            resource_name: quoted(&line.resource_name),
            resource_type: quoted(&line.resource_type),
            resource_id: quoted(&line.resource_id),
            unit_type: quoted(line.unit_type()),
            units: line.quantity,
            price_per_unit: line.price_unit,
            subtotal: line.price_subtotal.round_dp(SUBTOTAL_DECIMALS),
        }
    }
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Usage detail of a single invoice, one row per line.
///
/// Text fields are quoted, numbers are not; subtotals are rounded half to
/// even at six decimals.
pub fn render_invoice_csv(invoices: &[&Invoice]) -> Result<String, ReportError> {
    let [invoice] = invoices else {
        return Err(ReportError::SingleInvoiceOnly);
    };

    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS.map(quoted))?;
    for line in &invoice.lines {
        writer.serialize(InvoiceCsvRow::from(line))?;
    }

    let bytes = writer.into_inner().map_err(|e| ReportError::Csv(e.into_error().into()))?;
    let body = String::from_utf8(bytes)?;

    tracing::debug!(
        invoice = %invoice.name,
        rows = invoice.lines.len(),
        "rendered invoice csv"
    );
    Ok(body)
}
