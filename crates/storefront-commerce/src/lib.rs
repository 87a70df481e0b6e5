//! Storefront domain types and in-memory state.
//!
//! This crate provides the state containers behind the storefront views:
//!
//! - **Catalog**: Read-only products, category list, search and sort
//! - **Cart**: The cart store (sole owner of cart lines), snapshots, pricing
//! - **Checkout**: Shipping/payment/review flow, orders, order history
//! - **Session**: Simulated sign-in and account profile editing
//!
//! # Example
//!
//! ```rust
//! use storefront_commerce::prelude::*;
//!
//! let catalog = storefront_commerce::mock::mock_catalog().unwrap();
//! let mut cart = CartStore::new(catalog.currency());
//!
//! let headphones = catalog.get(&ProductId::new("1")).unwrap();
//! cart.add(headphones);
//! let snapshot = cart.add(headphones);
//!
//! assert_eq!(snapshot.item_count, 2);
//! let summary = PricingPolicy::default().cart_summary(snapshot.subtotal);
//! println!("Total: {}", summary.total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod mock;
pub mod session;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, Product, ProductDraft, ProductQuery, SortOption};

    // Cart
    pub use crate::cart::{
        CartLine, CartObserver, CartSnapshot, CartStore, CartSummary, CheckoutTotals,
        PricingPolicy,
    };

    // Checkout
    pub use crate::checkout::{
        Address, CheckoutFlow, CheckoutStep, Order, OrderHistory, OrderItem, OrderStatus,
        StatusFilter,
    };

    // Session
    pub use crate::session::{Profile, ProfileEditor, User, UserSession};
}
