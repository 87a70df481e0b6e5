//! Cart store behaviour checked through the public API only.

use storefront_commerce::prelude::*;

fn product(id: &str, price: f64) -> Product {
    Product::draft(id, format!("Product {}", id), price, "Test")
        .build()
        .expect("valid product")
}

fn expected_subtotal(snapshot: &CartSnapshot) -> i64 {
    snapshot
        .lines
        .iter()
        .map(|l| l.product().price_minor() * i64::from(l.quantity()))
        .sum()
}

#[test]
fn repeated_adds_accumulate_on_one_line() {
    let p = product("p", 3.33);
    for adds in 1..=12u32 {
        let mut cart = CartStore::new(Currency::INR);
        let mut snapshot = cart.snapshot();
        for _ in 0..adds {
            snapshot = cart.add(&p);
        }
        assert_eq!(snapshot.unique_item_count(), 1);
        assert_eq!(snapshot.quantity_of(p.id()), adds);
        assert_eq!(snapshot.item_count, u64::from(adds));
    }
}

#[test]
fn every_add_counts_whatever_the_cart_currency() {
    let p = product("u", 5.0);
    for currency in [Currency::INR, Currency::USD, Currency::EUR, Currency::GBP] {
        let mut cart = CartStore::new(currency);
        cart.add(&p);
        let snapshot = cart.add(&p);
        assert_eq!(snapshot.quantity_of(p.id()), 2);
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.subtotal, Money::new(1000, currency));
    }
}

#[test]
fn subtotal_is_exact_sum_of_price_times_quantity() {
    let mut cart = CartStore::new(Currency::INR);
    let cheap = product("cheap", 0.01);
    let odd = product("odd", 19.99);
    cart.add(&cheap);
    cart.add(&odd);
    cart.set_quantity(cheap.id(), 1000);
    let snapshot = cart.set_quantity(odd.id(), 7);

    assert_eq!(snapshot.subtotal.amount_minor, expected_subtotal(&snapshot));
    assert_eq!(snapshot.subtotal.amount_minor, 1000 + 7 * 1999);
}

#[test]
fn removed_line_does_not_reappear_through_set_quantity() {
    let p = product("p", 1.0);
    for removal in [0, -1, -100] {
        let mut cart = CartStore::new(Currency::INR);
        cart.add(&p);
        assert!(cart.set_quantity(p.id(), removal).is_empty());
        assert!(cart.set_quantity(p.id(), 4).is_empty());
    }
}

#[test]
fn second_remove_leaves_snapshot_unchanged() {
    let a = product("a", 1.0);
    let b = product("b", 2.0);
    let mut cart = CartStore::new(Currency::INR);
    cart.add(&a);
    cart.add(&b);

    let once = cart.remove(a.id());
    let twice = cart.remove(a.id());
    assert_eq!(once, twice);
}

#[test]
fn subtotal_matches_lines_after_mixed_operations() {
    let a = product("a", 10.0);
    let b = product("b", 0.99);
    let c = product("c", 123.45);
    let mut cart = CartStore::new(Currency::INR);

    let steps: Vec<Box<dyn Fn(&mut CartStore) -> CartSnapshot>> = vec![
        Box::new(|cart| cart.add(&a)),
        Box::new(|cart| cart.add(&b)),
        Box::new(|cart| cart.add(&c)),
        Box::new(|cart| cart.set_quantity(b.id(), 7)),
        Box::new(|cart| cart.add(&a)),
        Box::new(|cart| cart.remove(c.id())),
        Box::new(|cart| cart.set_quantity(a.id(), 0)),
        Box::new(|cart| cart.add(&c)),
        Box::new(|cart| cart.decrement(b.id())),
    ];

    for step in &steps {
        let snapshot = step(&mut cart);
        assert_eq!(snapshot.subtotal.amount_minor, expected_subtotal(&snapshot));
        let count: u64 = snapshot.lines.iter().map(|l| u64::from(l.quantity())).sum();
        assert_eq!(snapshot.item_count, count);
        assert!(snapshot.lines.iter().all(|l| l.quantity() >= 1));
    }
}

#[test]
fn only_add_repopulates_after_clear() {
    let a = product("a", 1.0);
    let mut cart = CartStore::new(Currency::INR);
    cart.add(&a);
    cart.clear();

    assert!(cart.set_quantity(a.id(), 3).is_empty());
    assert!(cart.remove(a.id()).is_empty());
    assert!(cart.increment(a.id()).is_empty());
    assert_eq!(cart.add(&a).quantity_of(a.id()), 1);
}

#[test]
fn scenario_two_products_then_set_quantity() {
    let a = product("A", 10.00);
    let b = product("B", 5.00);
    let mut cart = CartStore::new(Currency::INR);

    cart.add(&a);
    cart.add(&b);
    let snapshot = cart.set_quantity(a.id(), 3);

    assert_eq!(snapshot.item_count, 4);
    assert_eq!(snapshot.subtotal, Money::from_decimal(35.00, Currency::INR));
}

#[test]
fn scenario_same_product_twice() {
    let a = product("A", 10.00);
    let mut cart = CartStore::new(Currency::INR);

    cart.add(&a);
    let snapshot = cart.add(&a);

    assert_eq!(snapshot.unique_item_count(), 1);
    assert_eq!(snapshot.quantity_of(a.id()), 2);
    assert_eq!(snapshot.item_count, 2);
}

#[test]
fn checkout_completion_clears_cart_and_records_order() {
    let catalog = storefront_commerce::mock::mock_catalog().unwrap();
    let mut history = storefront_commerce::mock::mock_orders(&catalog).unwrap();
    let mut cart = CartStore::new(catalog.currency());
    let user = storefront_commerce::mock::mock_user();

    let shoes = catalog.get(&ProductId::new("3")).unwrap();
    cart.add_many(shoes, 2);

    let mut flow = CheckoutFlow::start(&cart, Some(&user), PricingPolicy::default()).unwrap();
    flow.shipping.phone = "555-0100".into();
    flow.shipping.address = "1 Loop Rd".into();
    flow.shipping.city = "Cupertino".into();
    flow.shipping.state = "CA".into();
    flow.shipping.zip_code = "95014".into();
    flow.advance(&mut cart).unwrap();
    flow.payment.card_number = "4111111111111111".into();
    flow.payment.expiry_date = "01/29".into();
    flow.payment.cvv = "999".into();
    flow.payment.name_on_card = "John Doe".into();
    flow.advance(&mut cart).unwrap();
    flow.advance(&mut cart).unwrap();

    assert!(cart.snapshot().is_empty());
    let order = flow.placed_order().unwrap().clone();
    history.record(order.clone());
    assert_eq!(history.orders()[0], order);
    assert_eq!(order.status, OrderStatus::Pending);
}
