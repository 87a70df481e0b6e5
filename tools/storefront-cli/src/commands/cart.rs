//! One-shot cart operations.

use anyhow::Result;
use serde::Serialize;
use storefront_commerce::cart::{CartSnapshot, CartSummary, PricingPolicy};
use storefront_commerce::{ProductId, SessionId};
use storefront_observability::CartActivityLog;

use super::CartArgs;
use crate::context::Context;

#[derive(Serialize)]
struct CartReport<'a> {
    cart: &'a CartSnapshot,
    summary: CartSummary,
}

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let policy = ctx.pricing();
    let mut cart = ctx.new_cart()?;

    let logger = ctx.logger(SessionId::generate());
    cart.subscribe(CartActivityLog::new(&logger));

    for id in &args.add {
        match catalog.get(&ProductId::new(id)) {
            Some(product) if product.in_stock() => {
                cart.add(product);
            }
            Some(product) => ctx
                .output
                .warn(&format!("{} is out of stock, not added", product.name())),
            None => ctx.output.warn(&format!("Unknown product {}, not added", id)),
        }
    }

    for update in &args.set {
        let id = ProductId::new(&update.product_id);
        if cart.snapshot().line(&id).is_none() {
            ctx.output.debug(&format!(
                "Product {} is not in the cart, quantity unchanged",
                id
            ));
        }
        cart.set_quantity(&id, update.quantity);
    }

    for id in &args.remove {
        cart.remove(&ProductId::new(id));
    }

    if args.clear {
        cart.clear();
    }

    let snapshot = cart.snapshot();

    if ctx.output.is_json() {
        ctx.output.json(&CartReport {
            cart: &snapshot,
            summary: policy.cart_summary(snapshot.subtotal),
        });
        return Ok(());
    }

    print_cart(&snapshot, &policy, ctx);
    Ok(())
}

/// Cart lines and the cart page summary.
pub(crate) fn print_cart(snapshot: &CartSnapshot, policy: &PricingPolicy, ctx: &Context) {
    ctx.output
        .header(&format!("Shopping Cart ({} items)", snapshot.item_count));

    if snapshot.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    let widths = [4, 32, 5, 12];
    ctx.output.table_row(&["ID", "PRODUCT", "QTY", "TOTAL"], &widths);
    for line in &snapshot.lines {
        let quantity = line.quantity().to_string();
        let total = line.line_total().display();
        ctx.output.table_row(
            &[
                line.product_id().as_str(),
                line.product().name(),
                &quantity,
                &total,
            ],
            &widths,
        );
    }

    let summary = policy.cart_summary(snapshot.subtotal);
    ctx.output.info("");
    ctx.output.kv("Subtotal", &summary.subtotal.display());
    ctx.output.kv(
        &format!("Tax ({}%)", policy.tax_rate_percent),
        &summary.tax.display(),
    );
    ctx.output.kv("Total", &summary.total.display());
}
