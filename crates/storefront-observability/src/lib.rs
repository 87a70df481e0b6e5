//! Observability for the storefront.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging correlated by session
//! - `LogBuilder` - Fluent construction of log entries with fields
//! - `CartActivityLog` - Cart observer that records every cart change

mod activity;
mod logging;

pub use activity::*;
pub use logging::*;

// Re-export SessionId from storefront-commerce for convenience
pub use storefront_commerce::SessionId;
