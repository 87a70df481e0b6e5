//! Catalog browsing commands.

use anyhow::Result;
use console::style;
use storefront_commerce::catalog::{Product, ProductQuery};
use storefront_commerce::{Currency, ProductId};

use super::{ProductArgs, ProductsArgs};
use crate::context::Context;
use crate::output::{format_price, format_rating};

/// Run the products command.
pub async fn list(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;

    if args.categories {
        let categories = catalog.categories();
        if ctx.output.is_json() {
            ctx.output.json(&categories);
            return Ok(());
        }
        ctx.output.header("Categories");
        for category in &categories {
            ctx.output.list_item(category);
        }
        return Ok(());
    }

    let mut query = ProductQuery::new().with_sort(args.sort);
    if let Some(search) = args.search {
        query = query.with_search(search);
    }
    if let Some(category) = args.category {
        query = query.with_category(category);
    }

    let products = catalog.browse(&query);

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&format!(
        "Products ({} of {}, {})",
        products.len(),
        catalog.len(),
        args.sort.display_name()
    ));

    if products.is_empty() {
        ctx.output.info("No products found.");
        if query.has_filters() {
            ctx.output.info("Try a different search term or category.");
        }
        return Ok(());
    }

    let widths = [4, 32, 14, 12, 10];
    ctx.output
        .table_row(&["ID", "NAME", "CATEGORY", "PRICE", "RATING"], &widths);
    for product in products {
        let price = product.price_in(catalog.currency()).display();
        let rating = format!("{:.1}", product.rating());
        let name = if product.in_stock() {
            product.name().to_string()
        } else {
            format!("{} (out of stock)", product.name())
        };
        ctx.output.table_row(
            &[
                product.id().as_str(),
                &name,
                product.category(),
                &price,
                &rating,
            ],
            &widths,
        );
    }

    Ok(())
}

/// Run the product command.
pub async fn show(args: ProductArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog.require(&ProductId::new(&args.id))?;

    if ctx.output.is_json() {
        ctx.output.json(product);
        return Ok(());
    }

    print_product(product, catalog.currency(), ctx);
    Ok(())
}

pub(crate) fn print_product(product: &Product, currency: Currency, ctx: &Context) {
    ctx.output.header(product.name());
    ctx.output.kv("ID", product.id().as_str());
    ctx.output.kv("Category", product.category());
    ctx.output.kv(
        "Price",
        &format_price(product.price_in(currency), product.original_price_in(currency)),
    );
    if let Some(savings) = product.savings_in(currency) {
        ctx.output
            .kv("You save", &style(savings.display()).green().to_string());
    }
    ctx.output.kv(
        "Rating",
        &format_rating(product.full_stars(), product.rating(), product.review_count()),
    );
    let stock = if product.in_stock() {
        style("In stock").green()
    } else {
        style("Out of stock").red()
    };
    ctx.output.kv("Availability", &stock.to_string());

    if !product.description().is_empty() {
        ctx.output.info("");
        ctx.output.info(product.description());
    }

    if !product.features().is_empty() {
        ctx.output.info("Features:");
        for feature in product.features() {
            ctx.output.list_item(feature);
        }
    }
}
