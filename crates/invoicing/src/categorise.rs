//! Product category / region breakdown of invoice lines.
//!
//! Lines are folded top-down: the invoice groups them by product category,
//! each category groups its lines by region (the category's parent). A line
//! whose grouping key cannot be resolved stays in the uncategorised list of
//! the level where resolution failed.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::invoice::InvoiceLine;
use crate::split::Ledger;

/// Outcome of resolving a line's grouping key at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping<'a> {
    Key(&'a str),
    Uncategorised,
}

impl<'a> Grouping<'a> {
    /// Product category name; uncategorised without a product or category.
    pub fn product_category(line: &'a InvoiceLine) -> Self {
        line.product
            .as_ref()
            .and_then(|p| p.category())
            .map_or(Grouping::Uncategorised, |c| Grouping::Key(&c.name))
    }

    /// Region name (parent of the product category).
    pub fn region(line: &'a InvoiceLine) -> Self {
        line.product
            .as_ref()
            .and_then(|p| p.region())
            .map_or(Grouping::Uncategorised, |r| Grouping::Key(&r.name))
    }
}

/// Lines of one product category sold in one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBucket<'a> {
    name: String,
    ledger: Ledger,
    lines: Vec<&'a InvoiceLine>,
}

impl<'a> RegionBucket<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ledger: Ledger::default(),
            lines: Vec::new(),
        }
    }

    pub fn add(&mut self, line: &'a InvoiceLine) {
        self.ledger.record(line.price_subtotal);
        self.lines.push(line);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credit(&self) -> Decimal {
        self.ledger.credit
    }

    pub fn debit(&self) -> Decimal {
        self.ledger.debit
    }

    pub fn total(&self) -> Decimal {
        self.ledger.total()
    }

    pub fn count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[&'a InvoiceLine] {
        &self.lines
    }
}

/// Lines of one product category, split by region.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCategoryBucket<'a> {
    name: String,
    ledger: Ledger,
    lines: Vec<&'a InvoiceLine>,
    regions: BTreeMap<String, RegionBucket<'a>>,
    uncategorised: Vec<&'a InvoiceLine>,
}

impl<'a> ProductCategoryBucket<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ledger: Ledger::default(),
            lines: Vec::new(),
            regions: BTreeMap::new(),
            uncategorised: Vec::new(),
        }
    }

    pub fn add(&mut self, line: &'a InvoiceLine) {
        self.ledger.record(line.price_subtotal);
        self.lines.push(line);

        match Grouping::region(line) {
            Grouping::Key(region) => self
                .regions
                .entry(region.to_string())
                .or_insert_with(|| RegionBucket::new(region))
                .add(line),
            Grouping::Uncategorised => self.uncategorised.push(line),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credit(&self) -> Decimal {
        self.ledger.credit
    }

    pub fn debit(&self) -> Decimal {
        self.ledger.debit
    }

    pub fn total(&self) -> Decimal {
        self.ledger.total()
    }

    pub fn count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[&'a InvoiceLine] {
        &self.lines
    }

    /// Region buckets ordered by region name.
    pub fn regions(&self) -> impl Iterator<Item = &RegionBucket<'a>> {
        self.regions.values()
    }

    pub fn region(&self, name: &str) -> Option<&RegionBucket<'a>> {
        self.regions.get(name)
    }

    /// Lines whose category has no parent region.
    pub fn uncategorised(&self) -> &[&'a InvoiceLine] {
        &self.uncategorised
    }
}

/// Whole-invoice breakdown by product category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorisedInvoice<'a> {
    ledger: Ledger,
    lines: Vec<&'a InvoiceLine>,
    products: BTreeMap<String, ProductCategoryBucket<'a>>,
    uncategorised: Vec<&'a InvoiceLine>,
}

impl<'a> CategorisedInvoice<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `lines` in order into a fresh breakdown.
    pub fn fold<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a InvoiceLine>,
    {
        let mut categorised = Self::new();
        for line in lines {
            categorised.add(line);
        }
        categorised
    }

    pub fn add(&mut self, line: &'a InvoiceLine) {
        self.ledger.record(line.price_subtotal);
        self.lines.push(line);

        match Grouping::product_category(line) {
            Grouping::Key(category) => self
                .products
                .entry(category.to_string())
                .or_insert_with(|| ProductCategoryBucket::new(category))
                .add(line),
            Grouping::Uncategorised => self.uncategorised.push(line),
        }
    }

    pub fn credit(&self) -> Decimal {
        self.ledger.credit
    }

    pub fn debit(&self) -> Decimal {
        self.ledger.debit
    }

    pub fn total(&self) -> Decimal {
        self.ledger.total()
    }

    pub fn count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[&'a InvoiceLine] {
        &self.lines
    }

    /// Product category buckets ordered by category name.
    pub fn products(&self) -> impl Iterator<Item = &ProductCategoryBucket<'a>> {
        self.products.values()
    }

    pub fn product(&self, name: &str) -> Option<&ProductCategoryBucket<'a>> {
        self.products.get(name)
    }

    /// Lines with no product or no product category.
    pub fn uncategorised(&self) -> &[&'a InvoiceLine] {
        &self.uncategorised
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osbill_catalog::{Product, ProductCategory};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn compute_in(region: &str) -> Product {
        Product::new("c1.c1r1")
            .with_category(ProductCategory::new("Compute").with_parent(ProductCategory::new(region)))
    }

    fn line(product: Option<Product>, subtotal: Decimal) -> InvoiceLine {
        let mut line = InvoiceLine::new("line", Product::new("placeholder"), Decimal::ONE, subtotal);
        line.product = product;
        line
    }

    #[test]
    fn lines_are_grouped_by_category_then_region() {
        let lines = vec![
            line(Some(compute_in("nz-hlz-1")), dec!(10)),
            line(Some(compute_in("nz-por-1")), dec!(5)),
            line(Some(compute_in("nz-hlz-1")), dec!(-3)),
        ];
        let categorised = CategorisedInvoice::fold(&lines);

        let compute = categorised.product("Compute").unwrap();
        assert_eq!(compute.name(), "Compute");
        assert_eq!(compute.count(), 3);
        assert_eq!(compute.total(), dec!(12));

        let hlz = compute.region("nz-hlz-1").unwrap();
        assert_eq!(hlz.count(), 2);
        assert_eq!(hlz.credit(), dec!(-3));
        assert_eq!(hlz.debit(), dec!(10));
        assert_eq!(hlz.lines()[1].price_subtotal, dec!(-3));

        let names: Vec<_> = compute.regions().map(RegionBucket::name).collect();
        assert_eq!(names, vec!["nz-hlz-1", "nz-por-1"]);
    }

    #[test]
    fn line_without_category_is_only_uncategorised_at_top_level() {
        let lines = vec![
            line(None, dec!(4)),
            line(Some(Product::new("Support")), dec!(6)),
        ];
        let categorised = CategorisedInvoice::fold(&lines);

        assert_eq!(categorised.uncategorised().len(), 2);
        assert_eq!(categorised.products().count(), 0);
        assert_eq!(categorised.total(), dec!(10));
    }

    #[test]
    fn category_without_region_is_uncategorised_within_its_bucket() {
        let support = Product::new("Gold").with_category(ProductCategory::new("Support"));
        let lines = vec![line(Some(support), dec!(100))];
        let categorised = CategorisedInvoice::fold(&lines);

        assert!(categorised.uncategorised().is_empty());
        let bucket = categorised.product("Support").unwrap();
        assert_eq!(bucket.uncategorised().len(), 1);
        assert_eq!(bucket.regions().count(), 0);
        assert_eq!(bucket.total(), dec!(100));
    }

    #[test]
    fn zero_subtotal_counts_as_debit() {
        let lines = vec![line(Some(compute_in("nz-hlz-1")), Decimal::ZERO)];
        let categorised = CategorisedInvoice::fold(&lines);
        assert_eq!(categorised.credit(), Decimal::ZERO);
        assert_eq!(categorised.debit(), Decimal::ZERO);
        assert_eq!(categorised.count(), 1);
        assert_eq!(
            categorised.product("Compute").unwrap().region("nz-hlz-1").unwrap().count(),
            1
        );
    }

    fn arb_line() -> impl Strategy<Value = InvoiceLine> {
        let shape = prop_oneof![
            Just(None),
            Just(Some(Product::new("Flat"))),
            Just(Some(Product::new("Gold").with_category(ProductCategory::new("Support")))),
            "[a-c]".prop_map(|r| Some(compute_in(&format!("region-{r}")))),
        ];
        (shape, -100_000i64..100_000).prop_map(|(product, cents)| line(product, Decimal::new(cents, 2)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn split_is_lossless_at_every_level(lines in prop::collection::vec(arb_line(), 0..40)) {
            let expected: Decimal = lines.iter().map(|l| l.price_subtotal).sum();
            let categorised = CategorisedInvoice::fold(&lines);

            prop_assert_eq!(categorised.credit() + categorised.debit(), expected);
            prop_assert_eq!(categorised.count(), lines.len());

            let uncategorised: Decimal = categorised.uncategorised().iter().map(|l| l.price_subtotal).sum();
            let by_product: Decimal = categorised.products().map(|p| p.total()).sum();
            prop_assert_eq!(by_product + uncategorised, expected);

            for product in categorised.products() {
                prop_assert!(product.credit() <= Decimal::ZERO);
                prop_assert!(product.debit() >= Decimal::ZERO);
                let in_regions: Decimal = product.regions().map(|r| r.credit() + r.debit()).sum();
                let loose: Decimal = product.uncategorised().iter().map(|l| l.price_subtotal).sum();
                prop_assert_eq!(in_regions + loose, product.total());
            }
        }
    }
}
