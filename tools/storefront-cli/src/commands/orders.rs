//! Order history commands.

use anyhow::Result;
use console::style;
use serde::Serialize;
use storefront_commerce::cart::{OrderBreakdown, PricingPolicy};
use storefront_commerce::checkout::{Order, OrderHistory, TrackingStep};
use storefront_commerce::OrderId;

use super::{OrderArgs, OrdersArgs};
use crate::context::Context;
use crate::output::{format_date, status_badge};

/// Items shown per order in the list view.
const PREVIEW_ITEMS: usize = 2;

#[derive(Serialize)]
struct OrderReport<'a> {
    order: &'a Order,
    breakdown: OrderBreakdown,
    tracking: [TrackingStep; 4],
}

/// Run the orders command.
pub async fn list(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let history = ctx.order_history(&catalog)?;
    print_orders(&history, &args, ctx);
    Ok(())
}

pub(crate) fn print_orders(history: &OrderHistory, args: &OrdersArgs, ctx: &Context) {
    let mut orders = history.filter(args.status);
    if let Some(limit) = args.limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return;
    }

    ctx.output.header("My Orders");

    if orders.is_empty() {
        if history.is_empty() {
            ctx.output
                .info("You haven't placed any orders yet. Run `storefront shop` to start.");
        } else {
            ctx.output.info("No orders match the selected status.");
        }
        return;
    }

    for order in orders {
        println!();
        println!(
            "  {}  {}  {}",
            style(order.id.as_str()).bold(),
            status_badge(order.status),
            style(format_date(&order.created_at)).dim()
        );

        let (preview, remaining) = order.preview_items(PREVIEW_ITEMS);
        for item in preview {
            ctx.output.list_item(&format!(
                "{} x{}  {}",
                item.product.name(),
                item.quantity,
                item.line_total().display()
            ));
        }
        if remaining > 0 {
            ctx.output.list_item(&format!("+{} more items", remaining));
        }
        ctx.output.kv(
            &format!("Total ({} items)", order.item_count()),
            &order.total.display(),
        );
    }
}

/// Run the order command.
pub async fn show(args: OrderArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let history = ctx.order_history(&catalog)?;
    let order = history.require(&OrderId::new(&args.id))?;
    print_order(order, &ctx.pricing(), ctx);
    Ok(())
}

pub(crate) fn print_order(order: &Order, policy: &PricingPolicy, ctx: &Context) {
    let breakdown = policy.order_breakdown(order.total);

    if ctx.output.is_json() {
        ctx.output.json(&OrderReport {
            order,
            breakdown,
            tracking: order.tracking_steps(),
        });
        return;
    }

    ctx.output.header(&format!("Order {}", order.id));
    ctx.output.kv("Placed", &format_date(&order.created_at));
    ctx.output.kv("Status", &status_badge(order.status));

    ctx.output.info("Tracking:");
    for step in order.tracking_steps() {
        let marker = if step.completed {
            style("●").green()
        } else {
            style("○").dim()
        };
        println!("  {} {}", marker, step.label);
    }

    ctx.output.info("Items:");
    for item in &order.items {
        ctx.output.list_item(&format!(
            "{} ({}) x{}  {}",
            item.product.name(),
            item.unit_price.display(),
            item.quantity,
            item.line_total().display()
        ));
    }

    ctx.output.info("Shipping address:");
    for line in order.shipping_address.multi_line().lines() {
        println!("    {}", line);
    }

    ctx.output.info("Summary:");
    ctx.output.kv("Subtotal", &breakdown.subtotal.display());
    ctx.output.kv("Shipping", "Free");
    ctx.output.kv("Tax", &breakdown.tax.display());
    ctx.output.kv("Total", &breakdown.total.display());
}
