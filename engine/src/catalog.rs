//! Catalog - the in-memory product list.
//!
//! The catalog owns every product and answers the listing query: products
//! ordered by aisle number then name, optionally narrowed by a search term.

use crate::{error::Result, Product, ProductPatch};
use std::cmp::Ordering;

/// The in-memory mirror of all products, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Build a catalog from products. A later product replaces an earlier
    /// one with the same id.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    /// Get a product by ID.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Insert a product, replacing any product with the same id in place.
    pub fn upsert(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// Apply a patch to a product.
    ///
    /// Returns `Ok(None)` when no product has the id.
    pub fn update(&mut self, id: &str, patch: &ProductPatch) -> Result<Option<&Product>> {
        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.apply(patch)?;
        Ok(Some(product))
    }

    /// Remove a product by ID, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(index))
    }

    /// Swap the whole contents.
    pub fn replace(&mut self, products: impl IntoIterator<Item = Product>) {
        *self = Self::from_products(products);
    }

    /// Products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// List products in display order.
    ///
    /// A blank query returns everything. Otherwise only products whose name,
    /// aisle or notes contain the query (ignoring case) are returned.
    pub fn list(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        let mut listed: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| needle.is_empty() || p.matches(&needle))
            .collect();
        listed.sort_by(|a, b| display_order(a, b));
        listed
    }
}

/// Numeric rank of an aisle label: its leading integer, or 0 when it has none.
///
/// Leading whitespace and a sign are accepted, trailing text is ignored, so
/// `"12b"` ranks as 12 and `"abc"` as 0.
pub fn aisle_rank(aisle: &str) -> i64 {
    let trimmed = aisle.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if negative {
        -value
    } else {
        value
    }
}

/// Ordering used by [`Catalog::list`]: aisle rank, then name ignoring case.
pub fn display_order(a: &Product, b: &Product) -> Ordering {
    aisle_rank(&a.aisle)
        .cmp(&aisle_rank(&b.aisle))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductFields;
    use chrono::{TimeZone, Utc};

    fn product(id: &str, name: &str, aisle: &str) -> Product {
        Product::new(
            id,
            ProductFields::new(name, aisle),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn aisle_rank_parses_leading_integer() {
        assert_eq!(aisle_rank("2"), 2);
        assert_eq!(aisle_rank("10"), 10);
        assert_eq!(aisle_rank("  7"), 7);
        assert_eq!(aisle_rank("12b"), 12);
        assert_eq!(aisle_rank("-3"), -3);
        assert_eq!(aisle_rank("abc"), 0);
        assert_eq!(aisle_rank(""), 0);
        assert_eq!(aisle_rank("-"), 0);
    }

    #[test]
    fn list_sorts_by_aisle_then_name() {
        let catalog = Catalog::from_products(vec![
            product("a", "zinc plate", "10"),
            product("b", "Anchor", "2"),
            product("c", "bolt", "abc"),
            product("d", "apple", "2"),
            product("e", "Caulk", "10"),
        ]);

        let names: Vec<_> = catalog.list("").iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["bolt", "Anchor", "apple", "Caulk", "zinc plate"]);
    }

    #[test]
    fn list_filters_case_insensitively() {
        let mut notes = product("n", "Tape", "5");
        notes.notes = "Near the PAINT counter".into();

        let catalog = Catalog::from_products(vec![
            product("a", "Paint brush", "8"),
            product("b", "Drill", "14"),
            notes,
        ]);

        let ids: Vec<_> = catalog.list("  paint ").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["n", "a"]);

        let ids: Vec<_> = catalog.list("14").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);

        assert!(catalog.list("nothing here").is_empty());
    }

    #[test]
    fn search_ignores_bay() {
        let mut p = product("a", "Nails", "3");
        p.bay = "bay-unique".into();
        let catalog = Catalog::from_products(vec![p]);

        assert!(catalog.list("bay-unique").is_empty());
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut catalog = Catalog::from_products(vec![product("a", "One", "1"), product("b", "Two", "2")]);
        catalog.upsert(product("a", "Uno", "1"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[0].name, "Uno");
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut catalog = Catalog::new();
        let result = catalog.update("missing", &ProductPatch::default().name("X"));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn remove_twice() {
        let mut catalog = Catalog::from_products(vec![product("a", "One", "1")]);

        assert!(catalog.remove("a").is_some());
        assert!(catalog.remove("a").is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn duplicate_ids_collapse() {
        let catalog = Catalog::from_products(vec![
            product("a", "First", "1"),
            product("b", "Other", "1"),
            product("a", "Second", "1"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().name, "Second");
    }
}
