//! In-memory product catalog.
//!
//! The catalog holds the most recently fetched product list. It is replaced
//! wholesale on refresh and never merged. Search and category filtering are
//! read-only projections over the current list.

use crate::product::Product;
use crate::types::{Price, ProductId};

/// The product list backing the storefront grid and the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Create a catalog holding `products`.
    #[must_use]
    pub const fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Replace the whole product list.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// All products in API order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Case-insensitive substring search over name, description and category.
    ///
    /// A term that is blank after trimming matches every product. The term
    /// itself is not trimmed before matching.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        if term.trim().is_empty() {
            return self.products.iter().collect();
        }

        let needle = term.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.matches_lowercase(&needle))
            .collect()
    }

    /// Products whose category label equals `category` exactly.
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Distinct category labels in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }
}

/// The demo grocery catalog.
///
/// Mirrors the products the backend seeds on first start. Used by tests and
/// by the mock backend in the integration tests.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    let product = |id: i32, name: &str, cents: u32, category: &str, icon: &str, description: &str| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_cents(cents),
        category: category.to_string(),
        description: Some(description.to_string()),
        icon: Some(icon.to_string()),
    };

    vec![
        product(
            1,
            "Organic Bananas",
            299,
            "Fruits & Vegetables",
            "fas fa-apple-alt",
            "Fresh organic bananas, perfect for smoothies",
        ),
        product(
            2,
            "Whole Grain Bread",
            349,
            "Bakery & Bread",
            "fas fa-bread-slice",
            "Freshly baked whole grain bread",
        ),
        product(
            3,
            "Farm Fresh Eggs",
            499,
            "Dairy & Eggs",
            "fas fa-egg",
            "Farm fresh organic eggs, 12 count",
        ),
        product(
            4,
            "Chicken Breast",
            899,
            "Meat & Fish",
            "fas fa-drumstick-bite",
            "Premium boneless chicken breast",
        ),
        product(
            5,
            "Sparkling Water",
            199,
            "Beverages",
            "fas fa-wine-bottle",
            "Refreshing sparkling water",
        ),
        product(
            6,
            "Dark Chocolate",
            399,
            "Snacks",
            "fas fa-cookie-bite",
            "Premium dark chocolate bar",
        ),
        product(
            7,
            "Vitamin C Supplements",
            1299,
            "Health & Beauty",
            "fas fa-pills",
            "High-potency vitamin C supplements",
        ),
        product(
            8,
            "Baby Formula",
            2499,
            "Baby Care",
            "fas fa-baby",
            "Premium baby formula, stage 1",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_search_choc_finds_only_dark_chocolate() {
        let catalog = Catalog::with_products(sample_products());
        assert_eq!(names(&catalog.search("choc")), vec!["Dark Chocolate"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::with_products(sample_products());
        assert_eq!(names(&catalog.search("EGGS")), vec!["Farm Fresh Eggs"]);
    }

    #[test]
    fn test_search_matches_category_and_description() {
        let catalog = Catalog::with_products(sample_products());
        assert_eq!(names(&catalog.search("baby care")), vec!["Baby Formula"]);
        assert_eq!(names(&catalog.search("smoothies")), vec!["Organic Bananas"]);
    }

    #[test]
    fn test_blank_search_returns_everything() {
        let catalog = Catalog::with_products(sample_products());
        assert_eq!(catalog.search("   ").len(), 8);
        assert_eq!(catalog.search("").len(), 8);
    }

    #[test]
    fn test_search_without_matches_is_empty() {
        let catalog = Catalog::with_products(sample_products());
        assert!(catalog.search("caviar").is_empty());
    }

    #[test]
    fn test_filter_by_category_is_exact() {
        let catalog = Catalog::with_products(sample_products());
        assert_eq!(names(&catalog.filter_by_category("Snacks")), vec!["Dark Chocolate"]);
        assert!(catalog.filter_by_category("snacks").is_empty());
        assert!(catalog.filter_by_category("Snack").is_empty());
    }

    #[test]
    fn test_projections_do_not_mutate() {
        let catalog = Catalog::with_products(sample_products());
        let before = catalog.clone();
        let _ = catalog.search("bread");
        let _ = catalog.filter_by_category("Beverages");
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = Catalog::with_products(sample_products());
        assert_eq!(
            catalog.find_by_id(ProductId::new(5)).map(|p| p.name.as_str()),
            Some("Sparkling Water")
        );
        assert!(catalog.find_by_id(ProductId::new(99)).is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut catalog = Catalog::with_products(sample_products());
        let first_two: Vec<Product> = sample_products().into_iter().take(2).collect();
        catalog.replace(first_two);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.find_by_id(ProductId::new(6)).is_none());
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let catalog = Catalog::with_products(sample_products());
        let categories = catalog.categories();
        assert_eq!(categories.len(), 8);
        assert_eq!(categories.first(), Some(&"Fruits & Vegetables"));
    }
}
