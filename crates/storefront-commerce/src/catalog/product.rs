//! Product types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money, MINOR_UNITS_PER_MAJOR};
use serde::{Deserialize, Serialize};

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Unvalidated product record, as it appears in catalog JSON.
///
/// Convert with [`Product::try_from`] to get a validated [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price as a decimal amount.
    pub price: f64,
    /// Price before discount, as a decimal amount.
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

/// A product in the catalog.
///
/// Products are immutable once built; the only way to get one is through
/// [`ProductDraft`] validation. Prices are exact minor units with no
/// currency attached; the catalog or cart holding the product supplies it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "ProductDraft", into = "ProductDraft")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price_minor: i64,
    original_price_minor: Option<i64>,
    image: String,
    category: String,
    rating: f64,
    review_count: u32,
    in_stock: bool,
    features: Vec<String>,
}

impl Product {
    /// Start a draft for a product with the required fields filled in.
    pub fn draft(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> ProductDraft {
        ProductDraft {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            in_stock: true,
            ..ProductDraft::default()
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Unit price in minor units.
    pub fn price_minor(&self) -> i64 {
        self.price_minor
    }

    /// Unit price in `currency`.
    pub fn price_in(&self, currency: Currency) -> Money {
        Money::new(self.price_minor, currency)
    }

    /// Price before discount, if the product is on sale.
    pub fn original_price_in(&self, currency: Currency) -> Option<Money> {
        self.original_price_minor
            .map(|amount| Money::new(amount, currency))
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Amount saved against the original price, if any.
    pub fn savings_in(&self, currency: Currency) -> Option<Money> {
        let saved = self.original_price_minor? - self.price_minor;
        (saved > 0).then(|| Money::new(saved, currency))
    }

    /// Number of filled stars out of five (rating rounded down).
    pub fn full_stars(&self) -> u8 {
        self.rating.floor() as u8
    }
}

impl TryFrom<ProductDraft> for Product {
    type Error = CommerceError;

    fn try_from(draft: ProductDraft) -> Result<Self, Self::Error> {
        if draft.id.trim().is_empty() {
            return Err(CommerceError::Validation("product id is empty".to_string()));
        }
        let price_minor = minor_units(&draft.id, "price", draft.price)?;
        let original_price_minor = draft
            .original_price
            .map(|original| minor_units(&draft.id, "original price", original))
            .transpose()?;
        if !(0.0..=MAX_RATING).contains(&draft.rating) {
            return Err(CommerceError::Validation(format!(
                "product {}: rating must be within 0-5, got {}",
                draft.id, draft.rating
            )));
        }

        Ok(Self {
            id: ProductId::new(draft.id),
            name: draft.name,
            description: draft.description,
            price_minor,
            original_price_minor,
            image: draft.image,
            category: draft.category,
            rating: draft.rating,
            review_count: draft.review_count,
            in_stock: draft.in_stock,
            features: draft.features.unwrap_or_default(),
        })
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.into_inner(),
            name: product.name,
            description: product.description,
            price: major_units(product.price_minor),
            original_price: product.original_price_minor.map(major_units),
            image: product.image,
            category: product.category,
            rating: product.rating,
            review_count: product.review_count,
            in_stock: product.in_stock,
            features: (!product.features.is_empty()).then_some(product.features),
        }
    }
}

fn minor_units(id: &str, field: &str, amount: f64) -> Result<i64, CommerceError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CommerceError::Validation(format!(
            "product {}: {} must be non-negative, got {}",
            id, field, amount
        )));
    }
    Money::exact_minor_units(amount).ok_or_else(|| {
        CommerceError::Validation(format!(
            "product {}: {} {} is not a whole number of minor units",
            id, field, amount
        ))
    })
}

fn major_units(amount_minor: i64) -> f64 {
    amount_minor as f64 / MINOR_UNITS_PER_MAJOR as f64
}

impl ProductDraft {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn original_price(mut self, original_price: f64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn rating(mut self, rating: f64, review_count: u32) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }

    pub fn features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// Validate the draft into a [`Product`].
    pub fn build(self) -> Result<Product, CommerceError> {
        Product::try_from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_build() {
        let product = Product::draft("1", "Wireless Headphones", 99.99, "Electronics")
            .description("Noise cancelling")
            .original_price(129.99)
            .rating(4.5, 128)
            .features(["Bluetooth 5.0", "30h battery"])
            .build()
            .unwrap();

        assert_eq!(product.id().as_str(), "1");
        assert_eq!(product.price_minor(), 9999);
        assert_eq!(
            product.savings_in(Currency::INR),
            Some(Money::new(3000, Currency::INR))
        );
        assert_eq!(product.price_in(Currency::USD).to_string(), "$99.99");
        assert_eq!(product.full_stars(), 4);
        assert_eq!(product.features().len(), 2);
        assert!(product.in_stock());
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Product::draft("1", "Broken", -1.0, "Misc").build();
        assert!(matches!(result, Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let result = Product::draft("1", "Too good", 10.0, "Misc")
            .rating(5.5, 1)
            .build();
        assert!(result.is_err());

        let result = Product::draft("1", "Bad", 10.0, "Misc")
            .rating(-0.1, 1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_no_savings_without_discount() {
        let product = Product::draft("1", "Mug", 10.0, "Home")
            .original_price(8.0)
            .build()
            .unwrap();
        assert!(product.savings_in(Currency::INR).is_none());
    }

    #[test]
    fn test_sub_minor_unit_price_rejected() {
        let result = Product::draft("1", "Sticker", 0.004, "Misc").build();
        assert!(matches!(result, Err(CommerceError::Validation(_))));

        let result = Product::draft("1", "Sticker", 1.0, "Misc")
            .original_price(1.255)
            .build();
        assert!(matches!(result, Err(CommerceError::Validation(_))));

        let product = Product::draft("1", "Sticker", 0.01, "Misc").build().unwrap();
        assert_eq!(product.price_minor(), 1);
    }

    #[test]
    fn test_product_json_uses_camel_case_and_validates() {
        let json = r#"{
            "id": "2",
            "name": "Desk Lamp",
            "price": 45.5,
            "originalPrice": 60.0,
            "category": "Home & Office",
            "rating": 4.1,
            "reviewCount": 12,
            "inStock": false
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price_minor(), 4550);
        assert_eq!(product.original_price_in(Currency::INR), Some(Money::new(6000, Currency::INR)));
        assert!(!product.in_stock());

        let bad = r#"{"id": "3", "name": "x", "price": 1.0, "category": "c", "rating": 9.0}"#;
        assert!(serde_json::from_str::<Product>(bad).is_err());
    }
}
