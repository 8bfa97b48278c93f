use serde::{Deserialize, Serialize};

use osbill_catalog::{ApplicabilityFilter, Product};
use osbill_core::{Constraint, CreditTypeId, DomainResult, Entity, ProductId, Validate};
use osbill_core::validation::check_not_blank;

/// Kind of credit (promotional, prepaid, referral reward, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditType {
    pub id: CreditTypeId,
    pub name: String,
    pub refundable: bool,
    /// Product used on invoices when the credit is consumed.
    pub product: ProductId,
    pub applicability: ApplicabilityFilter,
}

impl CreditType {
    pub fn new(name: impl Into<String>, product: ProductId) -> Self {
        Self {
            id: CreditTypeId::new(),
            name: name.into(),
            refundable: false,
            product,
            applicability: ApplicabilityFilter::unrestricted(),
        }
    }

    /// Whether usage of `product` may be paid from credits of this type.
    pub fn applies_to(&self, product: &Product) -> bool {
        self.applicability.applies_to(product)
    }
}

impl Entity for CreditType {
    type Id = CreditTypeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

fn check_name(credit_type: &CreditType) -> DomainResult<()> {
    check_not_blank("name", &credit_type.name)
}

impl Validate for CreditType {
    const CONSTRAINTS: &'static [Constraint<Self>] = &[Constraint {
        name: "name_required",
        check: check_name,
    }];
}
