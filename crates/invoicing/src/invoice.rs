use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_catalog::Product;
use osbill_core::{Entity, InvoiceId};
use osbill_projects::{PartnerRef, ProjectRef};

use crate::categorise::CategorisedInvoice;

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceState {
    #[default]
    Draft,
    Posted,
    Cancel,
}

/// Invoice line, extended with the OpenStack resource it bills for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub name: String,
    pub project: Option<ProjectRef>,
    pub product: Option<Product>,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    /// Signed; negative subtotals are credits.
    pub price_subtotal: Decimal,
    pub region: String,
    pub resource_name: String,
    pub resource_type: String,
    pub resource_id: String,
}

impl InvoiceLine {
    /// Line for `quantity` units of `product` at `price_unit`.
    pub fn new(
        name: impl Into<String>,
        product: Product,
        quantity: Decimal,
        price_unit: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            project: None,
            product: Some(product),
            quantity,
            price_unit,
            price_subtotal: quantity * price_unit,
            region: String::new(),
            resource_name: String::new(),
            resource_type: String::new(),
            resource_id: String::new(),
        }
    }

    pub fn with_project(mut self, project: ProjectRef) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_name: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = resource_type.into();
        self.resource_name = resource_name.into();
        self.resource_id = resource_id.into();
        self
    }

    /// Unit type of the billed product (its internal reference).
    pub fn unit_type(&self) -> &str {
        self.product
            .as_ref()
            .and_then(|p| p.default_code.as_deref())
            .unwrap_or_default()
    }
}

/// Customer invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub name: String,
    pub state: InvoiceState,
    pub partner: PartnerRef,
    pub project: Option<ProjectRef>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Amount still owed, in company currency (negative for refunds).
    pub amount_residual_signed: Decimal,
    pub is_move_sent: bool,
    /// Issued under a Cloud Framework Agreement.
    pub cfa: bool,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    pub fn new(
        name: impl Into<String>,
        partner: PartnerRef,
        invoice_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: InvoiceId::new(),
            name: name.into(),
            state: InvoiceState::Draft,
            partner,
            project: None,
            invoice_date,
            due_date,
            amount_residual_signed: Decimal::ZERO,
            is_move_sent: false,
            cfa: false,
            lines: Vec::new(),
        }
    }

    pub fn with_project(mut self, project: ProjectRef) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Post the invoice; the residual starts at the invoice total.
    pub fn posted(mut self) -> Self {
        self.state = InvoiceState::Posted;
        self.amount_residual_signed = self.amount_total();
        self
    }

    pub fn with_residual(mut self, residual: Decimal) -> Self {
        self.amount_residual_signed = residual;
        self
    }

    pub fn is_posted(&self) -> bool {
        self.state == InvoiceState::Posted
    }

    /// Invoices billing an OpenStack project.
    pub fn is_openstack_invoice(&self) -> bool {
        self.project.is_some()
    }

    pub fn amount_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.price_subtotal).sum()
    }

    pub fn mark_sent(&mut self) {
        self.is_move_sent = true;
    }

    /// Group the lines by product category, then region.
    pub fn categorised_lines(&self) -> CategorisedInvoice<'_> {
        let categorised = CategorisedInvoice::fold(&self.lines);
        tracing::debug!(
            invoice = %self.name,
            lines = categorised.count(),
            categories = categorised.products().count(),
            uncategorised = categorised.uncategorised().len(),
            "categorised invoice lines"
        );
        categorised
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osbill_core::{PartnerId, ProjectId};
    use rust_decimal_macros::dec;

    fn test_partner() -> PartnerRef {
        PartnerRef {
            id: PartnerId::new(),
            name: "Acme Ltd".to_string(),
        }
    }

    fn test_project() -> ProjectRef {
        ProjectRef {
            id: ProjectId::new(),
            name: "acme-prod".to_string(),
            os_id: "0f5e6a".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn openstack_invoice_requires_a_project() {
        let invoice = Invoice::new("INV/2024/0001", test_partner(), date(2024, 1, 31), date(2024, 2, 20));
        assert!(!invoice.is_openstack_invoice());
        assert!(invoice.with_project(test_project()).is_openstack_invoice());
    }

    #[test]
    fn posting_sets_residual_to_total() {
        let product = Product::new("Compute").with_default_code("hour");
        let invoice = Invoice::new("INV/2024/0001", test_partner(), date(2024, 1, 31), date(2024, 2, 20))
            .with_line(InvoiceLine::new("c1.c1r1", product.clone(), dec!(720), dec!(0.044)))
            .with_line(InvoiceLine::new("Credit", product, dec!(1), dec!(-10)))
            .posted();

        assert!(invoice.is_posted());
        assert_eq!(invoice.amount_total(), dec!(21.680));
        assert_eq!(invoice.amount_residual_signed, dec!(21.680));
        assert_eq!(invoice.lines[0].unit_type(), "hour");
    }

    #[test]
    fn line_without_product_has_empty_unit_type() {
        let mut line = InvoiceLine::new("Adjustment", Product::new("x"), dec!(1), dec!(1));
        line.product = None;
        assert_eq!(line.unit_type(), "");
    }
}
