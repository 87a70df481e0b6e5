//! Catalog module.
//!
//! Read-only product list plus the listing query used by browse views.

mod product;
mod query;

pub use product::{Product, ProductDraft, MAX_RATING};
pub use query::{ProductQuery, SortOption, ALL_CATEGORIES};

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Currency;
use std::collections::HashSet;

/// The storefront's product catalog.
///
/// Products have distinct ids and are all priced in the catalog's currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
    currency: Currency,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(products: Vec<Product>, currency: Currency) -> Result<Self, CommerceError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id().clone()) {
                return Err(CommerceError::DuplicateProduct(product.id().to_string()));
            }
        }
        Ok(Self { products, currency })
    }

    /// Parse a JSON array of product records.
    pub fn from_json(json: &str, currency: Currency) -> Result<Self, CommerceError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products, currency)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    /// Look up a product by id, failing with `ProductNotFound`.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.get(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// "All" followed by each distinct category in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for product in &self.products {
            if !categories.iter().any(|c| c == product.category()) {
                categories.push(product.category().to_string());
            }
        }
        categories
    }

    /// Filter and sort the catalog.
    pub fn browse(&self, query: &ProductQuery) -> Vec<&Product> {
        query.apply(&self.products)
    }
}
