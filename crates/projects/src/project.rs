use serde::{Deserialize, Serialize};

use osbill_core::{
    Constraint, DomainResult, Entity, PartnerId, ProjectId, SupportSubscriptionId, Validate,
};
use osbill_core::validation::check_not_blank;

/// Who pays for a project's usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingType {
    #[default]
    Customer,
    Internal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    #[default]
    Invoice,
}

/// Role a contact plays on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "billing")]
    Billing,
    #[serde(rename = "technical")]
    Technical,
    #[serde(rename = "legal")]
    Legal,
    #[serde(rename = "reseller customer")]
    ResellerCustomer,
}

/// Link between a project and a partner acting as one of its contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContact {
    pub partner: PartnerId,
    pub contact_type: ContactType,
    /// Also a contact of every sub-project.
    pub inherit: bool,
}

/// An OpenStack project billed through the ERP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Project id on the OpenStack side. Unique across all projects.
    pub os_id: String,
    pub parent: Option<ProjectId>,
    pub enabled: bool,
    pub billing_type: BillingType,
    /// Invoice this project together with its parent.
    pub group_invoices: bool,
    pub payment_method: PaymentMethod,
    pub stripe_card_id: Option<String>,
    pub po_number: Option<String>,
    pub override_po_number: bool,
    pub owner: PartnerId,
    pub contacts: Vec<ProjectContact>,
    pub support_subscription: Option<SupportSubscriptionId>,
}

impl Project {
    pub fn new(name: impl Into<String>, os_id: impl Into<String>, owner: PartnerId) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            os_id: os_id.into(),
            parent: None,
            enabled: true,
            billing_type: BillingType::default(),
            group_invoices: false,
            payment_method: PaymentMethod::default(),
            stripe_card_id: None,
            po_number: None,
            override_po_number: false,
            owner,
            contacts: Vec::new(),
            support_subscription: None,
        }
    }

    pub fn with_parent(mut self, parent: ProjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_contact(mut self, contact: ProjectContact) -> Self {
        self.contacts.push(contact);
        self
    }

    pub fn to_ref(&self) -> ProjectRef {
        ProjectRef {
            id: self.id,
            name: self.name.clone(),
            os_id: self.os_id.clone(),
        }
    }
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.os_id)
    }
}

fn check_name(project: &Project) -> DomainResult<()> {
    check_not_blank("name", &project.name)
}

fn check_os_id(project: &Project) -> DomainResult<()> {
    check_not_blank("os_id", &project.os_id)
}

impl Validate for Project {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[
        Constraint {
            name: "name_required",
            check: check_name,
        },
        Constraint {
            name: "os_id_required",
            check: check_os_id,
        },
    ];
}

/// Lightweight project reference carried on sale and invoice lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: ProjectId,
    pub name: String,
    pub os_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_combines_name_and_openstack_id() {
        let project = Project::new("web-prod", "a1b2c3", PartnerId::new());
        assert_eq!(project.display_name(), "web-prod (a1b2c3)");
    }

    #[test]
    fn defaults_match_a_regular_customer_project() {
        let project = Project::new("p", "x", PartnerId::new());
        assert!(project.enabled);
        assert_eq!(project.billing_type, BillingType::Customer);
        assert_eq!(project.payment_method, PaymentMethod::Invoice);
    }

    #[test]
    fn missing_openstack_id_is_rejected() {
        let project = Project::new("p", "", PartnerId::new());
        let err = project.validate().unwrap_err();
        assert_eq!(err.validation_message(), Some("os_id cannot be empty"));
    }

    #[test]
    fn contact_type_uses_wire_names() {
        let json = serde_json::to_string(&ContactType::ResellerCustomer).unwrap();
        assert_eq!(json, "\"reseller customer\"");
    }
}
