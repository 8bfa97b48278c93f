use serde::{Deserialize, Serialize};

use osbill_core::{Entity, ProductId};

use crate::category::ProductCategory;

/// Product as referenced from invoice lines and benefit types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Internal reference; for cloud resources this is the unit type
    /// (e.g. `hour`, `gigabyte`).
    pub default_code: Option<String>,
    pub category: Option<ProductCategory>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            default_code: None,
            category: None,
        }
    }

    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_default_code(mut self, code: impl Into<String>) -> Self {
        self.default_code = Some(code.into());
        self
    }

    pub fn category(&self) -> Option<&ProductCategory> {
        self.category.as_ref()
    }

    /// Region the product is sold in, when its category has a parent.
    pub fn region(&self) -> Option<&ProductCategory> {
        self.category.as_ref().and_then(ProductCategory::region)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}
