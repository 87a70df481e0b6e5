//! Cart store: the single owner of cart lines.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// A product in the cart with its quantity.
///
/// Quantity is always at least 1; only the [`CartStore`] builds or edits lines.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartLine {
    product: Product,
    quantity: u32,
    #[serde(skip)]
    currency: Currency,
}

impl CartLine {
    fn new(product: Product, currency: Currency) -> Self {
        Self {
            product,
            quantity: 1,
            currency,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> &ProductId {
        self.product.id()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price in the cart's currency.
    pub fn unit_price(&self) -> Money {
        self.product.price_in(self.currency)
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply(i64::from(self.quantity))
    }
}

/// Derived view of the cart: lines in insertion order, item count, subtotal.
///
/// Built fresh from the line set on every call; never cached.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    /// Sum of quantities.
    pub item_count: u64,
    /// Sum of price x quantity.
    pub subtotal: Money,
}

impl CartSnapshot {
    fn from_lines(lines: &[CartLine], currency: Currency) -> Self {
        let item_count = lines.iter().map(|l| u64::from(l.quantity)).sum();
        let totals: Vec<Money> = lines.iter().map(CartLine::line_total).collect();
        Self {
            lines: lines.to_vec(),
            item_count,
            subtotal: Money::sum(totals.iter(), currency),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    /// Quantity of a product, zero when absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.line(product_id).map_or(0, CartLine::quantity)
    }
}

/// Receives every new snapshot after a cart mutation.
pub trait CartObserver {
    fn on_cart_changed(&self, snapshot: &CartSnapshot);
}

impl<F> CartObserver for F
where
    F: Fn(&CartSnapshot),
{
    fn on_cart_changed(&self, snapshot: &CartSnapshot) {
        self(snapshot)
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The in-memory shopping cart.
///
/// All mutations are infallible: unknown product ids are no-ops and
/// non-positive quantities remove the line. Each mutation returns the
/// recomputed snapshot and, when the line set changed, notifies observers.
pub struct CartStore {
    lines: Vec<CartLine>,
    currency: Currency,
    observers: Vec<(SubscriptionId, Box<dyn CartObserver>)>,
    next_subscription: u64,
}

impl CartStore {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from_lines(&self.lines, self.currency)
    }

    /// Add one unit of `product`, priced in the cart's currency. Existing
    /// lines are incremented; new lines go after existing ones. Stock is not
    /// checked here.
    pub fn add(&mut self, product: &Product) -> CartSnapshot {
        match self.position(product.id()) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(1);
                debug!(product_id = %product.id(), quantity = line.quantity, "cart line incremented");
            }
            None => {
                self.lines.push(CartLine::new(product.clone(), self.currency));
                debug!(product_id = %product.id(), "cart line added");
            }
        }
        self.publish()
    }

    /// Add `count` units, one at a time. `count <= 0` is a no-op.
    pub fn add_many(&mut self, product: &Product, count: i64) -> CartSnapshot {
        let mut snapshot = None;
        for _ in 0..count.max(0) {
            snapshot = Some(self.add(product));
        }
        snapshot.unwrap_or_else(|| self.snapshot())
    }

    /// Set a line's quantity. Unknown ids are ignored; `quantity <= 0`
    /// removes the line.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> CartSnapshot {
        let Some(index) = self.position(product_id) else {
            debug!(product_id = %product_id, "set_quantity on missing line ignored");
            return self.snapshot();
        };

        if quantity <= 0 {
            self.lines.remove(index);
            debug!(product_id = %product_id, "cart line removed by quantity update");
            return self.publish();
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let line = &mut self.lines[index];
        if line.quantity == quantity {
            return self.snapshot();
        }
        line.quantity = quantity;
        debug!(product_id = %product_id, quantity, "cart line quantity set");
        self.publish()
    }

    /// Quantity + 1 for an existing line.
    pub fn increment(&mut self, product_id: &ProductId) -> CartSnapshot {
        match self.position(product_id) {
            Some(index) => {
                let next = i64::from(self.lines[index].quantity) + 1;
                self.set_quantity(product_id, next)
            }
            None => self.snapshot(),
        }
    }

    /// Quantity - 1 for an existing line; a line at 1 is removed.
    pub fn decrement(&mut self, product_id: &ProductId) -> CartSnapshot {
        match self.position(product_id) {
            Some(index) => {
                let next = i64::from(self.lines[index].quantity) - 1;
                self.set_quantity(product_id, next)
            }
            None => self.snapshot(),
        }
    }

    /// Remove a line if present.
    pub fn remove(&mut self, product_id: &ProductId) -> CartSnapshot {
        match self.position(product_id) {
            Some(index) => {
                self.lines.remove(index);
                debug!(product_id = %product_id, "cart line removed");
                self.publish()
            }
            None => self.snapshot(),
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> CartSnapshot {
        if self.lines.is_empty() {
            return self.snapshot();
        }
        self.lines.clear();
        debug!("cart cleared");
        self.publish()
    }

    /// Register an observer for future snapshots.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() < len_before
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id() == product_id)
    }

    fn publish(&self) -> CartSnapshot {
        let snapshot = self.snapshot();
        for (_, observer) in &self.observers {
            observer.on_cart_changed(&snapshot);
        }
        snapshot
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("currency", &self.currency)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn product(id: &str, price: f64) -> Product {
        Product::draft(id, format!("Product {}", id), price, "Test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = CartStore::new(Currency::INR);
        let snapshot = cart.snapshot();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.item_count, 0);
        assert!(snapshot.subtotal.is_zero());
    }

    #[test]
    fn test_add_same_product_increments() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 10.0);

        cart.add(&a);
        let snapshot = cart.add(&a);

        assert_eq!(snapshot.unique_item_count(), 1);
        assert_eq!(snapshot.quantity_of(a.id()), 2);
        assert_eq!(snapshot.item_count, 2);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 1.0);
        let b = product("b", 1.0);
        let c = product("c", 1.0);

        cart.add(&b);
        cart.add(&a);
        cart.add(&c);
        let snapshot = cart.add(&b);

        let order: Vec<&str> = snapshot.lines.iter().map(|l| l.product_id().as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn test_add_out_of_stock_is_allowed() {
        let mut cart = CartStore::new(Currency::INR);
        let sold_out = Product::draft("x", "Sold out", 5.0, "Test")
            .out_of_stock()
            .build()
            .unwrap();
        assert_eq!(cart.add(&sold_out).item_count, 1);
    }

    #[test]
    fn test_add_prices_in_cart_currency() {
        let mut cart = CartStore::new(Currency::USD);
        let a = product("a", 5.0);

        cart.add(&a);
        let snapshot = cart.add(&a);

        assert_eq!(snapshot.quantity_of(a.id()), 2);
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.lines[0].unit_price(), Money::new(500, Currency::USD));
        assert_eq!(snapshot.subtotal, Money::new(1000, Currency::USD));
    }

    #[test]
    fn test_subtotal_exact_for_small_prices() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 0.01);
        cart.add(&a);

        let snapshot = cart.set_quantity(a.id(), 1000);
        assert_eq!(snapshot.subtotal, Money::new(1000, Currency::INR));
    }

    #[test]
    fn test_add_many() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 2.5);
        assert_eq!(cart.add_many(&a, 3).quantity_of(a.id()), 3);
        assert_eq!(cart.add_many(&a, 0).quantity_of(a.id()), 3);
        assert_eq!(cart.add_many(&a, -2).quantity_of(a.id()), 3);
    }

    #[test]
    fn test_set_quantity_and_subtotal() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 10.0);
        let b = product("b", 5.0);

        cart.add(&a);
        cart.add(&b);
        let snapshot = cart.set_quantity(a.id(), 3);

        assert_eq!(snapshot.item_count, 4);
        assert_eq!(snapshot.subtotal, Money::new(3500, Currency::INR));
    }

    #[test]
    fn test_set_quantity_non_positive_removes() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 10.0);
        let b = product("b", 10.0);
        cart.add(&a);
        cart.add(&b);

        assert!(cart.set_quantity(a.id(), 0).line(a.id()).is_none());
        assert!(cart.set_quantity(b.id(), -4).is_empty());
    }

    #[test]
    fn test_set_quantity_on_missing_line_is_noop() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 10.0);
        cart.add(&a);
        cart.remove(a.id());

        let snapshot = cart.set_quantity(a.id(), 5);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_to_u32() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 0.01);
        cart.add(&a);
        let snapshot = cart.set_quantity(a.id(), i64::MAX);
        assert_eq!(snapshot.quantity_of(a.id()), u32::MAX);
        assert_eq!(snapshot.item_count, u64::from(u32::MAX));
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 1.0);
        cart.add(&a);

        assert_eq!(cart.increment(a.id()).quantity_of(a.id()), 2);
        assert_eq!(cart.decrement(a.id()).quantity_of(a.id()), 1);
        assert!(cart.decrement(a.id()).is_empty());
        assert!(cart.increment(a.id()).is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 1.0);
        let b = product("b", 2.0);
        cart.add(&a);
        cart.add(&b);

        let first = cart.remove(a.id());
        let second = cart.remove(a.id());
        assert_eq!(first, second);
        assert_eq!(second.unique_item_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = CartStore::new(Currency::INR);
        let a = product("a", 1.0);
        cart.add(&a);

        assert!(cart.clear().is_empty());
        assert!(cart.set_quantity(a.id(), 2).is_empty());
        assert!(cart.remove(a.id()).is_empty());
        assert_eq!(cart.add(&a).item_count, 1);
    }

    #[test]
    fn test_observers_receive_changes_only() {
        let mut cart = CartStore::new(Currency::INR);
        let seen: Rc<RefCell<Vec<u64>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        cart.subscribe(move |s: &CartSnapshot| sink.borrow_mut().push(s.item_count));

        let a = product("a", 1.0);
        cart.add(&a);
        cart.add(&a);
        cart.set_quantity(a.id(), 2);
        cart.remove(&ProductId::new("missing"));
        cart.set_quantity(a.id(), 5);
        cart.clear();
        cart.clear();

        assert_eq!(*seen.borrow(), vec![1, 2, 5, 0]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut cart = CartStore::new(Currency::INR);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = cart.subscribe(move |_: &CartSnapshot| *sink.borrow_mut() += 1);

        let a = product("a", 1.0);
        cart.add(&a);
        assert!(cart.unsubscribe(id));
        assert!(!cart.unsubscribe(id));
        cart.add(&a);

        assert_eq!(*count.borrow(), 1);
    }
}
