//! Orders and order history.

use crate::cart::CartLine;
use crate::catalog::Product;
use crate::checkout::Address;
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
        }
    }

    pub fn all() -> [OrderStatus; 4] {
        [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ]
    }

    /// Position in the fulfilment pipeline, starting at 0.
    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::all()
            .into_iter()
            .find(|status| status.as_str() == s.to_lowercase())
            .ok_or_else(|| CommerceError::UnknownStatus(s.to_string()))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product and quantity captured on an order, with the unit price charged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderItem {
    /// Capture `product` at its current price in `currency`.
    pub fn new(product: Product, quantity: u32, currency: Currency) -> Self {
        let unit_price = product.price_in(currency);
        Self {
            product,
            quantity,
            unit_price,
        }
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(i64::from(self.quantity))
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product().clone(),
            quantity: line.quantity(),
            unit_price: line.unit_price(),
        }
    }
}

/// One step of the order tracking timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackingStep {
    pub key: &'static str,
    pub label: &'static str,
    pub completed: bool,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order number, e.g. "ORD-1700000000000".
    pub id: OrderId,
    /// Customer, `None` for guest checkout.
    pub user_id: Option<UserId>,
    pub items: Vec<OrderItem>,
    /// Amount charged, tax and shipping included.
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub shipping_address: Address,
}

impl Order {
    /// Total units across all items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// First `limit` items for a list card, plus how many were left out.
    pub fn preview_items(&self, limit: usize) -> (&[OrderItem], usize) {
        let shown = self.items.len().min(limit);
        (&self.items[..shown], self.items.len() - shown)
    }

    /// Placed, processing, shipped, delivered; each completed once the
    /// order's status has reached it.
    pub fn tracking_steps(&self) -> [TrackingStep; 4] {
        let reached = |status: OrderStatus| self.status.rank() >= status.rank();
        [
            TrackingStep {
                key: "placed",
                label: "Order Placed",
                completed: true,
            },
            TrackingStep {
                key: "processing",
                label: "Processing",
                completed: reached(OrderStatus::Processing),
            },
            TrackingStep {
                key: "shipped",
                label: "Shipped",
                completed: reached(OrderStatus::Shipped),
            },
            TrackingStep {
                key: "delivered",
                label: "Delivered",
                completed: reached(OrderStatus::Delivered),
            },
        ]
    }
}

/// Which orders to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => order.status == *status,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// The signed-in customer's orders, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    /// Build from existing orders, sorted newest first.
    pub fn new(mut orders: Vec<Order>) -> Self {
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { orders }
    }

    /// Record a newly placed order.
    pub fn record(&mut self, order: Order) {
        self.orders.insert(0, order);
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn filter(&self, filter: StatusFilter) -> Vec<&Order> {
        self.orders.iter().filter(|o| filter.matches(o)).collect()
    }

    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    pub fn require(&self, id: &OrderId) -> Result<&Order, CommerceError> {
        self.find(id)
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))
    }
}
