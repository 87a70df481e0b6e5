//! Shopping cart module.
//!
//! Contains the cart store, its snapshots, and pricing rules.

mod pricing;
mod store;

pub use pricing::{CartSummary, CheckoutTotals, OrderBreakdown, PricingPolicy};
pub use store::{CartLine, CartObserver, CartSnapshot, CartStore, SubscriptionId};
