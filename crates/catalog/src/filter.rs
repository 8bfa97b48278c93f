//! "Only for these products / categories" restrictions on benefit types.

use serde::{Deserialize, Serialize};

use osbill_core::{CategoryId, ProductId};

use crate::product::Product;

/// Restricts a credit or grant type to some products.
///
/// The product list and the category list are mutually inclusive: a product
/// qualifies when it is listed, or when its category or any ancestor category
/// is listed. An empty filter places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicabilityFilter {
    pub only_for_products: Vec<ProductId>,
    pub only_for_categories: Vec<CategoryId>,
}

impl ApplicabilityFilter {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.only_for_products.is_empty() && self.only_for_categories.is_empty()
    }

    pub fn applies_to(&self, product: &Product) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        if self.only_for_products.contains(&product.id) {
            return true;
        }
        product.category().is_some_and(|category| {
            self.only_for_categories
                .iter()
                .any(|id| category.is_within(*id))
        })
    }
}
