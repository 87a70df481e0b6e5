//! Storefront CLI - Command line front end for the storefront.
//!
//! Commands:
//! - `storefront products` - Browse and filter the catalog
//! - `storefront product` - Show one product
//! - `storefront cart` - Run cart operations and print the result
//! - `storefront shop` - Interactive shopping session
//! - `storefront orders` - List order history
//! - `storefront order` - Show one order with tracking
//! - `storefront config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CartArgs, ConfigArgs, OrderArgs, OrdersArgs, ProductArgs, ProductsArgs, ShopArgs};

/// Storefront CLI - Browse products, shop and track orders
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered and sorted
    Products(ProductsArgs),

    /// Show product details
    Product(ProductArgs),

    /// Apply cart operations to a fresh cart
    Cart(CartArgs),

    /// Start an interactive shopping session
    Shop(ShopArgs),

    /// List orders
    Orders(OrdersArgs),

    /// Show order details and tracking
    Order(OrderArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Products(args) => commands::products::list(args, &ctx).await,
        Commands::Product(args) => commands::products::show(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Shop(args) => commands::shop::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::list(args, &ctx).await,
        Commands::Order(args) => commands::orders::show(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Library events go to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
