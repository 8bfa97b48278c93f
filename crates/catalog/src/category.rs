use serde::{Deserialize, Serialize};

use osbill_core::{CategoryId, DomainResult, Entity};
use osbill_core::validation::check_not_blank;

/// Product category, optionally nested under a parent category.
///
/// Billing treats the parent of a product's category as its region
/// (e.g. `Compute` under `nz-hlz-1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: CategoryId,
    pub name: String,
    pub parent: Option<Box<ProductCategory>>,
}

impl ProductCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: ProductCategory) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn try_new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        check_not_blank("name", &name)?;
        Ok(Self::new(name))
    }

    /// The region category, i.e. the direct parent.
    pub fn region(&self) -> Option<&ProductCategory> {
        self.parent.as_deref()
    }

    /// This category followed by its ancestors, nearest first.
    pub fn lineage(&self) -> impl Iterator<Item = &ProductCategory> {
        std::iter::successors(Some(self), |c| c.parent.as_deref())
    }

    /// Whether `id` is this category or one of its ancestors.
    pub fn is_within(&self, id: CategoryId) -> bool {
        self.lineage().any(|c| c.id == id)
    }
}

impl Entity for ProductCategory {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> String {
        // Full path, root first: "nz-hlz-1 / Compute".
        let mut names: Vec<&str> = self.lineage().map(|c| c.name.as_str()).collect();
        names.reverse();
        names.join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_the_direct_parent() {
        let region = ProductCategory::new("nz-hlz-1");
        let compute = ProductCategory::new("Compute").with_parent(region.clone());

        assert_eq!(compute.region(), Some(&region));
        assert_eq!(region.region(), None);
    }

    #[test]
    fn lineage_walks_to_the_root() {
        let root = ProductCategory::new("All");
        let region = ProductCategory::new("nz-por-1").with_parent(root.clone());
        let storage = ProductCategory::new("Block Storage").with_parent(region.clone());

        assert!(storage.is_within(root.id));
        assert!(storage.is_within(region.id));
        assert!(!region.is_within(storage.id));
        assert_eq!(storage.display_name(), "All / nz-por-1 / Block Storage");
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(ProductCategory::try_new("  ").is_err());
    }
}
