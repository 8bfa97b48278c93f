use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use osbill_catalog::{ApplicabilityFilter, Product};
use osbill_core::{
    Constraint, DomainResult, Entity, GrantId, GrantTypeId, ProductId, Validate, Validity,
};
use osbill_core::validation::{check_non_negative, check_not_blank};
use osbill_projects::ProjectRef;

use crate::credit::EXPIRY_BEFORE_START;

/// Kind of grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantType {
    pub id: GrantTypeId,
    pub name: String,
    pub product: ProductId,
    /// Only usable on the root project of an invoice grouping.
    pub only_on_group_root: bool,
    pub applicability: ApplicabilityFilter,
}

impl GrantType {
    pub fn new(name: impl Into<String>, product: ProductId) -> Self {
        Self {
            id: GrantTypeId::new(),
            name: name.into(),
            product,
            only_on_group_root: false,
            applicability: ApplicabilityFilter::unrestricted(),
        }
    }

    pub fn applies_to(&self, product: &Product) -> bool {
        self.applicability.applies_to(product)
    }

    /// Whether a grant of this type may join an invoice grouping from a
    /// project that is (or is not) the grouping's root.
    pub fn allowed_in_grouping(&self, on_group_root: bool) -> bool {
        !self.only_on_group_root || on_group_root
    }
}

impl Entity for GrantType {
    type Id = GrantTypeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Validate for GrantType {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[Constraint {
        name: "name_required",
        check: |t| check_not_blank("name", &t.name),
    }];
}

/// Fixed-value, time-bounded allowance attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: GrantId,
    pub project: ProjectRef,
    pub voucher_code: Option<String>,
    pub grant_type: GrantTypeId,
    pub validity: Validity,
    pub value: Decimal,
}

impl Grant {
    pub fn new(
        project: ProjectRef,
        grant_type: GrantTypeId,
        validity: Validity,
        value: Decimal,
    ) -> Self {
        Self {
            id: GrantId::new(),
            project,
            voucher_code: None,
            grant_type,
            validity,
            value,
        }
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.validity.is_active(today)
    }
}

impl Entity for Grant {
    type Id = GrantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        match &self.voucher_code {
            Some(code) => format!("{} - {}", self.project.name, code),
            None => self.project.name.clone(),
        }
    }
}

fn check_expiry_date(grant: &Grant) -> DomainResult<()> {
    grant.validity.check_order(EXPIRY_BEFORE_START)
}

fn check_value(grant: &Grant) -> DomainResult<()> {
    check_non_negative("value", grant.value)
}

impl Validate for Grant {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[
        Constraint {
            name: "expiry_after_start",
            check: check_expiry_date,
        },
        Constraint {
            name: "value_non_negative",
            check: check_value,
        },
    ];
}
