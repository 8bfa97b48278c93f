//! Product catalog as seen by billing.
//!
//! Products carry a category; a category's parent category names the region
//! the product is sold in.

pub mod category;
pub mod filter;
pub mod product;

pub use category::ProductCategory;
pub use filter::ApplicabilityFilter;
pub use product::Product;
