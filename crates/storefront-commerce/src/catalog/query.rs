//! Catalog browsing: search text, category filter and sort order.

use crate::catalog::Product;
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Category label that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Sort options for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Featured,
    /// Price, low to high.
    PriceLow,
    /// Price, high to low.
    PriceHigh,
    /// Highest rated first.
    Rating,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Featured => "featured",
            SortOption::PriceLow => "price-low",
            SortOption::PriceHigh => "price-high",
            SortOption::Rating => "rating",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Featured",
            SortOption::PriceLow => "Price: Low to High",
            SortOption::PriceHigh => "Price: High to Low",
            SortOption::Rating => "Highest Rated",
        }
    }

    pub fn all() -> [SortOption; 4] {
        [
            SortOption::Featured,
            SortOption::PriceLow,
            SortOption::PriceHigh,
            SortOption::Rating,
        ]
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Featured => Ordering::Equal,
            SortOption::PriceLow => a.price_minor().cmp(&b.price_minor()),
            SortOption::PriceHigh => b.price_minor().cmp(&a.price_minor()),
            SortOption::Rating => b.rating().total_cmp(&a.rating()),
        }
    }
}

impl std::str::FromStr for SortOption {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "featured" => Ok(SortOption::Featured),
            "price-low" => Ok(SortOption::PriceLow),
            "price-high" => Ok(SortOption::PriceHigh),
            "rating" => Ok(SortOption::Rating),
            other => Err(CommerceError::Validation(format!(
                "unknown sort option: {}",
                other
            ))),
        }
    }
}

/// A product listing query.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProductQuery {
    /// Case-insensitive text matched against name or description.
    pub search: String,
    /// Category label; `None` or "All" matches everything.
    pub category: Option<String>,
    /// Sort order.
    pub sort: SortOption,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Restrict to a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Reset search and category, keeping the sort order.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.category = None;
    }

    /// Whether the query narrows the listing at all.
    pub fn has_filters(&self) -> bool {
        !self.search.is_empty() || self.category_filter().is_some()
    }

    /// Check a single product against the search text and category.
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = if self.search.is_empty() {
            true
        } else {
            let needle = self.search.to_lowercase();
            product.name().to_lowercase().contains(&needle)
                || product.description().to_lowercase().contains(&needle)
        };

        let matches_category = match self.category_filter() {
            Some(category) => product.category() == category,
            None => true,
        };

        matches_search && matches_category
    }

    /// Filter and sort products. Sorting is stable, so `Featured` keeps the
    /// input order and ties keep their relative order.
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<&'a Product> {
        let mut results: Vec<&Product> =
            products.into_iter().filter(|p| self.matches(p)).collect();
        results.sort_by(|a, b| self.sort.compare(a, b));
        results
    }

    fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Vec<Product> {
        vec![
            Product::draft("1", "Wireless Headphones", 99.99, "Electronics")
                .description("Over-ear with noise cancelling")
                .rating(4.5, 10)
                .build()
                .unwrap(),
            Product::draft("2", "Cotton T-Shirt", 19.99, "Clothing")
                .rating(4.8, 5)
                .build()
                .unwrap(),
            Product::draft("3", "Smart Watch", 199.0, "Electronics")
                .description("Fitness tracking and wireless charging")
                .rating(4.5, 40)
                .build()
                .unwrap(),
        ]
    }

    fn ids(results: &[&Product]) -> Vec<String> {
        results.iter().map(|p| p.id().to_string()).collect()
    }

    #[test]
    fn test_empty_query_keeps_catalog_order() {
        let products = products();
        let results = ProductQuery::new().apply(&products);
        assert_eq!(ids(&results), ["1", "2", "3"]);
    }

    #[test]
    fn test_search_matches_name_or_description_case_insensitive() {
        let products = products();
        let results = ProductQuery::new().with_search("WIRELESS").apply(&products);
        assert_eq!(ids(&results), ["1", "3"]);
    }

    #[test]
    fn test_category_filter() {
        let products = products();
        let results = ProductQuery::new()
            .with_category("Clothing")
            .apply(&products);
        assert_eq!(ids(&results), ["2"]);

        let results = ProductQuery::new()
            .with_category(ALL_CATEGORIES)
            .apply(&products);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_sort_by_price() {
        let products = products();
        let low = ProductQuery::new()
            .with_sort(SortOption::PriceLow)
            .apply(&products);
        assert_eq!(ids(&low), ["2", "1", "3"]);

        let high = ProductQuery::new()
            .with_sort(SortOption::PriceHigh)
            .apply(&products);
        assert_eq!(ids(&high), ["3", "1", "2"]);
    }

    #[test]
    fn test_sort_by_rating_is_stable() {
        let products = products();
        let results = ProductQuery::new()
            .with_sort(SortOption::Rating)
            .apply(&products);
        assert_eq!(ids(&results), ["2", "1", "3"]);
    }

    #[test]
    fn test_clear_filters() {
        let mut query = ProductQuery::new()
            .with_search("nothing matches this")
            .with_category("Clothing")
            .with_sort(SortOption::Rating);
        assert!(query.has_filters());
        query.clear_filters();
        assert!(!query.has_filters());
        assert_eq!(query.sort, SortOption::Rating);
    }

    #[test]
    fn test_sort_option_parse() {
        assert_eq!("price-low".parse::<SortOption>().unwrap(), SortOption::PriceLow);
        assert!("cheapest".parse::<SortOption>().is_err());
    }
}
