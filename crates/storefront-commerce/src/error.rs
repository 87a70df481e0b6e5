//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// Cart mutations never produce these; they are reserved for catalog
/// construction, checkout transitions and lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Duplicate product in a catalog.
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Checkout started with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Unknown order status.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
