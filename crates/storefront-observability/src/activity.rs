//! Cart activity recording.

use std::cell::Cell;

use storefront_commerce::cart::{CartObserver, CartSnapshot};
use tracing::debug;

use crate::logging::StructuredLogger;

/// Cart observer that writes one structured entry per cart change.
///
/// Subscribe it with [`CartStore::subscribe`](storefront_commerce::cart::CartStore::subscribe).
#[derive(Debug)]
pub struct CartActivityLog {
    logger: StructuredLogger,
    previous_count: Cell<u64>,
    changes: Cell<u64>,
}

impl CartActivityLog {
    pub fn new(logger: &StructuredLogger) -> Self {
        Self {
            logger: logger.child("cart"),
            previous_count: Cell::new(0),
            changes: Cell::new(0),
        }
    }

    /// Number of changes recorded.
    pub fn changes(&self) -> u64 {
        self.changes.get()
    }
}

impl CartObserver for CartActivityLog {
    fn on_cart_changed(&self, snapshot: &CartSnapshot) {
        let previous = self.previous_count.replace(snapshot.item_count);
        let delta = i64::try_from(snapshot.item_count)
            .unwrap_or(i64::MAX)
            .saturating_sub(i64::try_from(previous).unwrap_or(i64::MAX));
        self.changes.set(self.changes.get() + 1);
        debug!(
            session_id = %self.logger.session_id(),
            item_count = snapshot.item_count,
            delta,
            "cart change recorded"
        );

        let message = if snapshot.is_empty() {
            "cart emptied"
        } else {
            "cart updated"
        };

        self.logger
            .info_builder(message)
            .field_u64("item_count", snapshot.item_count)
            .field_i64("delta", delta)
            .field_u64("lines", snapshot.unique_item_count() as u64)
            .field("subtotal", snapshot.subtotal.display())
            .emit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogSink};
    use storefront_commerce::prelude::*;

    fn product(id: &str, price: f64) -> Product {
        Product::draft(id, "Thing", price, "Test").build().unwrap()
    }

    #[test]
    fn test_records_each_change() {
        let sink = LogSink::memory();
        let logger = StructuredLogger::new(SessionId::new("s"))
            .with_format(LogFormat::Json)
            .with_sink(sink.clone());

        let mut cart = CartStore::new(Currency::INR);
        cart.subscribe(CartActivityLog::new(&logger));

        let a = product("a", 10.0);
        cart.add(&a);
        cart.set_quantity(a.id(), 3);
        cart.remove(&ProductId::new("missing"));
        cart.clear();

        let entries: Vec<serde_json::Value> = sink
            .lines()
            .iter()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["component"], "cart");
        assert_eq!(entries[1]["item_count"], 3);
        assert_eq!(entries[1]["delta"], 2);
        assert_eq!(entries[1]["subtotal"], "₹30.00");
        assert_eq!(entries[2]["message"], "cart emptied");
        assert_eq!(entries[2]["delta"], -3);
    }

    #[test]
    fn test_counts_changes() {
        let logger = StructuredLogger::new(SessionId::new("s")).with_sink(LogSink::memory());
        let activity = CartActivityLog::new(&logger);
        let mut cart = CartStore::new(Currency::INR);
        activity.on_cart_changed(&cart.add(&product("a", 1.0)));
        activity.on_cart_changed(&cart.clear());
        assert_eq!(activity.changes(), 2);
    }
}
