//! Hardcoded storefront data standing in for a backend.

use crate::catalog::{Catalog, Product};
use crate::checkout::{Address, Order, OrderHistory, OrderItem, OrderStatus};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::{Currency, Money};
use crate::session::User;
use chrono::{TimeZone, Utc};

/// The account every login resolves to.
pub fn mock_user() -> User {
    User {
        id: UserId::new("1"),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        avatar: Some("/diverse-user-avatars.png".to_string()),
    }
}

/// Demo product list.
pub fn mock_products() -> Result<Vec<Product>, CommerceError> {
    [
        Product::draft("1", "Wireless Bluetooth Headphones", 79.99, "Electronics")
            .description("Over-ear headphones with active noise cancellation and 30-hour battery life.")
            .original_price(99.99)
            .image("/wireless-headphones.png")
            .rating(4.5, 128)
            .features(["Active noise cancellation", "30-hour battery", "Bluetooth 5.0", "Built-in microphone"]),
        Product::draft("2", "Smart Fitness Watch", 199.99, "Electronics")
            .description("Track workouts, heart rate and sleep with a bright always-on display.")
            .image("/fitness-watch.png")
            .rating(4.3, 89)
            .features(["Heart rate monitor", "GPS", "Water resistant", "7-day battery"]),
        Product::draft("3", "Organic Cotton T-Shirt", 24.99, "Clothing")
            .description("Soft, breathable everyday tee made from certified organic cotton.")
            .original_price(34.99)
            .image("/cotton-tshirt.png")
            .rating(4.7, 256),
        Product::draft("4", "Leather Messenger Bag", 149.99, "Accessories")
            .description("Full-grain leather bag with a padded laptop sleeve.")
            .image("/messenger-bag.png")
            .rating(4.6, 67)
            .features(["Fits 15\" laptop", "Adjustable strap", "Brass hardware"]),
        Product::draft("5", "Ergonomic Office Chair", 299.99, "Home & Office")
            .description("Adjustable lumbar support, breathable mesh back and 4D armrests.")
            .original_price(399.99)
            .image("/office-chair.png")
            .rating(4.4, 143),
        Product::draft("6", "Ceramic Coffee Mug Set", 29.99, "Home & Office")
            .description("Set of four stoneware mugs, dishwasher and microwave safe.")
            .image("/coffee-mugs.png")
            .rating(4.8, 312),
        Product::draft("7", "Running Shoes", 89.99, "Clothing")
            .description("Lightweight cushioned running shoes for road and treadmill.")
            .image("/running-shoes.png")
            .rating(4.2, 98)
            .out_of_stock(),
        Product::draft("8", "Portable Bluetooth Speaker", 49.99, "Electronics")
            .description("Waterproof speaker with 360-degree sound and 12-hour playtime.")
            .original_price(59.99)
            .image("/bluetooth-speaker.png")
            .rating(4.5, 201),
    ]
    .into_iter()
    .map(|draft| draft.build())
    .collect()
}

/// Demo catalog priced in the default currency.
pub fn mock_catalog() -> Result<Catalog, CommerceError> {
    mock_catalog_in(Currency::default())
}

/// Demo catalog with the same figures priced in `currency`.
pub fn mock_catalog_in(currency: Currency) -> Result<Catalog, CommerceError> {
    Catalog::new(mock_products()?, currency)
}

/// Demo order history for the mock user.
pub fn mock_orders(catalog: &Catalog) -> Result<OrderHistory, CommerceError> {
    let currency = catalog.currency();
    let item = |id: &str, quantity: u32| -> Result<OrderItem, CommerceError> {
        let product = catalog.require(&ProductId::new(id))?;
        Ok(OrderItem::new(product.clone(), quantity, currency))
    };
    let address = Address::new("123 Main St", "New York", "NY", "10001", "United States");
    let user_id = Some(mock_user().id);

    let orders = vec![
        Order {
            id: OrderId::new("ORD-001"),
            user_id: user_id.clone(),
            items: vec![item("1", 1)?, item("3", 2)?],
            total: Money::from_decimal(140.37, currency),
            status: OrderStatus::Delivered,
            created_at: timestamp(2024, 1, 15)?,
            shipping_address: address.clone(),
        },
        Order {
            id: OrderId::new("ORD-002"),
            user_id: user_id.clone(),
            items: vec![item("2", 1)?],
            total: Money::from_decimal(215.99, currency),
            status: OrderStatus::Shipped,
            created_at: timestamp(2024, 1, 20)?,
            shipping_address: address.clone(),
        },
        Order {
            id: OrderId::new("ORD-003"),
            user_id: user_id.clone(),
            items: vec![item("5", 1)?, item("6", 1)?, item("8", 2)?],
            total: Money::from_decimal(464.35, currency),
            status: OrderStatus::Processing,
            created_at: timestamp(2024, 1, 25)?,
            shipping_address: address.clone(),
        },
        Order {
            id: OrderId::new("ORD-004"),
            user_id,
            items: vec![item("4", 1)?],
            total: Money::from_decimal(161.99, currency),
            status: OrderStatus::Pending,
            created_at: timestamp(2024, 1, 28)?,
            shipping_address: address,
        },
    ];

    Ok(OrderHistory::new(orders))
}

fn timestamp(year: i32, month: u32, day: u32) -> Result<chrono::DateTime<Utc>, CommerceError> {
    Utc.with_ymd_and_hms(year, month, day, 10, 30, 0)
        .single()
        .ok_or_else(|| CommerceError::Validation(format!("invalid date {}-{}-{}", year, month, day)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::StatusFilter;

    #[test]
    fn test_mock_catalog_is_valid() {
        let catalog = mock_catalog().unwrap();
        assert_eq!(catalog.len(), 8);
        assert_eq!(
            catalog.categories(),
            ["All", "Electronics", "Clothing", "Accessories", "Home & Office"]
        );
        assert!(catalog.products().iter().any(|p| !p.in_stock()));
    }

    #[test]
    fn test_mock_catalog_in_other_currency() {
        let catalog = mock_catalog_in(Currency::USD).unwrap();
        assert_eq!(catalog.currency(), Currency::USD);
        let history = mock_orders(&catalog).unwrap();
        let order = &history.orders()[0];
        assert_eq!(order.total.currency, Currency::USD);
        assert_eq!(order.items[0].unit_price.to_string(), "$149.99");
    }

    #[test]
    fn test_mock_orders_newest_first() {
        let catalog = mock_catalog().unwrap();
        let history = mock_orders(&catalog).unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history.orders()[0].id.as_str(), "ORD-004");
        assert_eq!(
            history
                .filter(StatusFilter::Only(OrderStatus::Delivered))
                .len(),
            1
        );
    }
}
