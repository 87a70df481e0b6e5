//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use storefront_commerce::cart::{CartStore, PricingPolicy};
use storefront_commerce::catalog::Catalog;
use storefront_commerce::checkout::OrderHistory;
use storefront_commerce::{mock, Currency, SessionId};
use storefront_observability::{LogFormat, LogLevel, StructuredLogger};
use tracing::debug;

use crate::config::{StoreConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StoreConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (StoreConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match find_config(&cwd) {
                Some(path) => {
                    output.debug(&format!("Using config {}", path.display()));
                    (StoreConfig::load(&path.to_string_lossy())?, Some(path))
                }
                None => (StoreConfig::default(), None),
            }
        };
        debug!(
            config_path = ?config_path,
            currency = %config.store.currency,
            "context loaded"
        );

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    pub fn currency(&self) -> Result<Currency> {
        self.config
            .store
            .currency()
            .context("Invalid store.currency in config")
    }

    pub fn pricing(&self) -> PricingPolicy {
        self.config.pricing.policy()
    }

    /// The product catalog in the configured currency.
    pub fn catalog(&self) -> Result<Catalog> {
        mock::mock_catalog_in(self.currency()?).context("Failed to load catalog")
    }

    /// Order history for the signed-in customer.
    pub fn order_history(&self, catalog: &Catalog) -> Result<OrderHistory> {
        mock::mock_orders(catalog).context("Failed to load orders")
    }

    /// An empty cart in the configured currency.
    pub fn new_cart(&self) -> Result<CartStore> {
        Ok(CartStore::new(self.currency()?))
    }

    /// Activity logger for a session, following the `[logging]` settings.
    /// Without `--verbose` only warnings and errors are written; `--json`
    /// forces JSON log lines.
    pub fn logger(&self, session_id: SessionId) -> StructuredLogger {
        let format = if self.output.is_json() {
            LogFormat::Json
        } else {
            self.config.logging.format
        };
        let level = if self.output.is_verbose() {
            self.config.logging.level
        } else {
            self.config.logging.level.max(LogLevel::Warn)
        };
        StructuredLogger::new(session_id)
            .with_format(format)
            .with_min_level(level)
    }
}

/// Find a config file in the directory tree, starting at `start`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "storefront-cli-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = temp_dir("walk");
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("storefront.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(root.join("storefront.toml")));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let root = temp_dir("nearest");
        let nested = root.join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("storefront.toml"), "").unwrap();
        std::fs::write(nested.join(".storefront.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(nested.join(".storefront.toml")));
        let _ = std::fs::remove_dir_all(&root);
    }
}
