//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod orders;
pub mod products;
pub mod shop;

use clap::{Args, Subcommand};
use storefront_commerce::catalog::SortOption;
use storefront_commerce::checkout::StatusFilter;

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Case-insensitive text matched against name and description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category to show ("All" for every category).
    #[arg(long)]
    pub category: Option<String>,

    /// Sort order: featured, price-low, price-high, rating.
    #[arg(long, default_value = "featured")]
    pub sort: SortOption,

    /// List categories instead of products.
    #[arg(long)]
    pub categories: bool,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the cart command.
///
/// Operations run against a fresh cart: adds first, then quantity updates,
/// then removals.
#[derive(Args)]
pub struct CartArgs {
    /// Product IDs to add; repeat an ID to add it again.
    #[arg(short, long, num_args = 1..)]
    pub add: Vec<String>,

    /// Quantity updates as ID=N; N <= 0 removes the line.
    #[arg(short, long, num_args = 1.., value_parser = parse_quantity_update)]
    pub set: Vec<QuantityUpdate>,

    /// Product IDs to remove.
    #[arg(short, long, num_args = 1..)]
    pub remove: Vec<String>,

    /// Empty the cart after the other operations.
    #[arg(long)]
    pub clear: bool,
}

/// A `--set ID=N` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityUpdate {
    pub product_id: String,
    pub quantity: i64,
}

fn parse_quantity_update(s: &str) -> Result<QuantityUpdate, String> {
    let (id, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=QUANTITY, got '{}'", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing product id in '{}'", s));
    }
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid quantity in '{}': {}", s, e))?;
    Ok(QuantityUpdate {
        product_id: id.to_string(),
        quantity,
    })
}

/// Arguments for the shop command.
#[derive(Args)]
pub struct ShopArgs {
    /// Sign in before browsing.
    #[arg(long)]
    pub login: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    /// Status filter: all, pending, processing, shipped, delivered.
    #[arg(short, long, default_value = "all")]
    pub status: StatusFilter,

    /// Show only the last N orders.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    /// Order ID, e.g. ORD-001.
    pub id: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
