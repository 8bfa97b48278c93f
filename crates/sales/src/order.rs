use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_catalog::Product;
use osbill_core::{Entity, SaleOrderId};
use osbill_invoicing::{Invoice, InvoiceLine};
use osbill_projects::{PartnerRef, ProjectRef};

/// Values applied to invoice lines whose sale line leaves them unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDefaults {
    pub region: String,
    pub resource_type: String,
    pub resource_name: String,
    pub resource_id: String,
}

impl Default for LineDefaults {
    fn default() -> Self {
        Self {
            region: "NZ".to_string(),
            resource_type: String::new(),
            resource_name: String::new(),
            resource_id: String::new(),
        }
    }
}

/// Sale order line for an OpenStack resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOrderLine {
    pub name: String,
    pub project: Option<ProjectRef>,
    pub product: Product,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    pub region: Option<String>,
    pub resource_type: Option<String>,
    pub resource_name: Option<String>,
    pub resource_id: Option<String>,
}

impl SaleOrderLine {
    pub fn new(
        name: impl Into<String>,
        product: Product,
        quantity: Decimal,
        price_unit: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            project: None,
            product,
            quantity,
            price_unit,
            region: None,
            resource_type: None,
            resource_name: None,
            resource_id: None,
        }
    }

    pub fn with_project(mut self, project: ProjectRef) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_name: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_name = Some(resource_name.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Invoice line for this sale line. Unset or empty OpenStack fields take
    /// their value from `defaults`.
    pub fn prepare_invoice_line(&self, defaults: &LineDefaults) -> InvoiceLine {
        let mut line = InvoiceLine::new(
            self.name.clone(),
            self.product.clone(),
            self.quantity,
            self.price_unit,
        )
        .with_region(or_default(&self.region, &defaults.region))
        .with_resource(
            or_default(&self.resource_type, &defaults.resource_type),
            or_default(&self.resource_name, &defaults.resource_name),
            or_default(&self.resource_id, &defaults.resource_id),
        );
        line.project = self.project.clone();
        line
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Invoice header values prepared from a sale order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub partner: PartnerRef,
    pub project: Option<ProjectRef>,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub cfa: bool,
}

impl InvoiceDraft {
    /// Build the invoice. Dates not fixed by the order default to `today` and
    /// `today + payment_terms`.
    pub fn into_invoice(
        self,
        name: impl Into<String>,
        lines: Vec<InvoiceLine>,
        today: NaiveDate,
        payment_terms: Days,
    ) -> Invoice {
        let invoice_date = self.invoice_date.unwrap_or(today);
        let due_date = self
            .due_date
            .or_else(|| invoice_date.checked_add_days(payment_terms))
            .unwrap_or(invoice_date);

        let mut invoice = Invoice::new(name, self.partner, invoice_date, due_date);
        invoice.project = self.project;
        invoice.cfa = self.cfa;
        invoice.lines = lines;
        invoice
    }
}

/// Sale order billing an OpenStack project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOrder {
    pub id: SaleOrderId,
    pub name: String,
    pub partner: PartnerRef,
    pub project: Option<ProjectRef>,
    /// Overrides the invoice date of invoices created from this order.
    pub invoice_date: Option<NaiveDate>,
    /// Overrides the invoice due date.
    pub invoice_due_date: Option<NaiveDate>,
    pub cfa: bool,
    pub lines: Vec<SaleOrderLine>,
}

impl SaleOrder {
    pub fn new(name: impl Into<String>, partner: PartnerRef) -> Self {
        Self {
            id: SaleOrderId::new(),
            name: name.into(),
            partner,
            project: None,
            invoice_date: None,
            invoice_due_date: None,
            cfa: false,
            lines: Vec::new(),
        }
    }

    pub fn with_project(mut self, project: ProjectRef) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_line(mut self, line: SaleOrderLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn prepare_invoice(&self) -> InvoiceDraft {
        InvoiceDraft {
            partner: self.partner.clone(),
            project: self.project.clone(),
            invoice_date: self.invoice_date,
            due_date: self.invoice_due_date,
            cfa: self.cfa,
        }
    }

    /// Invoice every line of the order.
    pub fn create_invoice(
        &self,
        name: impl Into<String>,
        defaults: &LineDefaults,
        today: NaiveDate,
        payment_terms: Days,
    ) -> Invoice {
        let lines = self
            .lines
            .iter()
            .map(|line| line.prepare_invoice_line(defaults))
            .collect();
        self.prepare_invoice()
            .into_invoice(name, lines, today, payment_terms)
    }
}

impl Entity for SaleOrder {
    type Id = SaleOrderId;

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

    fn compute_line() -> SaleOrderLine {
        SaleOrderLine::new(
            "c1.c1r1",
            Product::new("Compute").with_default_code("hour"),
            dec!(720),
            dec!(0.044),
        )
    }

    #[test]
    fn unset_line_fields_take_defaults() {
        let line = compute_line().prepare_invoice_line(&LineDefaults::default());
        assert_eq!(line.region, "NZ");
        assert_eq!(line.resource_type, "");
        assert_eq!(line.resource_name, "");
        assert_eq!(line.resource_id, "");
        assert_eq!(line.price_subtotal, dec!(31.680));
    }

    #[test]
    fn set_line_fields_are_kept_and_empty_ones_defaulted() {
        let project = test_project();
        let mut sale_line = compute_line()
            .with_project(project.clone())
            .with_region("nz-hlz-1")
            .with_resource("instance", "web-1", "6f1c");
        sale_line.resource_name = Some(String::new());

        let line = sale_line.prepare_invoice_line(&LineDefaults::default());
        assert_eq!(line.project, Some(project));
        assert_eq!(line.region, "nz-hlz-1");
        assert_eq!(line.resource_type, "instance");
        assert_eq!(line.resource_name, "");
        assert_eq!(line.resource_id, "6f1c");
    }

    #[test]
    fn prepared_invoice_carries_project_dates_and_cfa() {
        let project = test_project();
        let mut order = SaleOrder::new("S0001", test_partner()).with_project(project.clone());
        order.invoice_date = Some(date(2024, 1, 31));
        order.cfa = true;

        let draft = order.prepare_invoice();
        assert_eq!(draft.project, Some(project));
        assert_eq!(draft.invoice_date, Some(date(2024, 1, 31)));
        assert_eq!(draft.due_date, None);
        assert!(draft.cfa);
    }

    #[test]
    fn created_invoice_uses_overrides_then_payment_terms() {
        let mut order = SaleOrder::new("S0001", test_partner())
            .with_project(test_project())
            .with_line(compute_line());
        order.invoice_date = Some(date(2024, 1, 31));

        let invoice = order.create_invoice(
            "INV/2024/0001",
            &LineDefaults::default(),
            date(2024, 2, 3),
            Days::new(20),
        );
        assert_eq!(invoice.invoice_date, date(2024, 1, 31));
        assert_eq!(invoice.due_date, date(2024, 2, 20));
        assert!(invoice.is_openstack_invoice());
        assert!(!invoice.cfa);
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].region, "NZ");

        order.invoice_due_date = Some(date(2024, 3, 1));
        let invoice = order.create_invoice(
            "INV/2024/0002",
            &LineDefaults::default(),
            date(2024, 2, 3),
            Days::new(20),
        );
        assert_eq!(invoice.due_date, date(2024, 3, 1));
    }
}
