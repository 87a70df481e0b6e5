//! Checkout module.
//!
//! Contains the checkout flow, addresses, orders and order history.

mod address;
mod flow;
mod order;

pub use address::{Address, DEFAULT_COUNTRY};
pub use flow::{
    CheckoutFlow, CheckoutStep, PaymentDetails, Preferences, ShippingDetails, StepProgress,
};
pub use order::{Order, OrderHistory, OrderItem, OrderStatus, StatusFilter, TrackingStep};
