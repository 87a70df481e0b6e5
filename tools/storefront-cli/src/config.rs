//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::cart::PricingPolicy;
use storefront_commerce::session::DEFAULT_LOGIN_DELAY;
use storefront_commerce::{CommerceError, Currency};
use storefront_observability::{LogFormat, LogLevel};

/// Config file names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Storefront configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store-wide settings.
    #[serde(default)]
    pub store: StoreSection,

    /// Tax and shipping rules.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Simulated sign-in.
    #[serde(default)]
    pub session: SessionConfig,

    /// Structured activity log.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StoreConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&content, path.ends_with(".json"))
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    /// Check value ranges. Returns (errors, warnings).
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(e) = self.store.currency() {
            errors.push(format!("store.currency: {}", e));
        }

        let pricing = &self.pricing;
        for (key, value) in [
            ("pricing.tax_rate_percent", pricing.tax_rate_percent),
            ("pricing.free_shipping_threshold", pricing.free_shipping_threshold),
            ("pricing.flat_shipping_rate", pricing.flat_shipping_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{} must be a non-negative number", key));
            }
        }

        if pricing.tax_rate_percent > 100.0 {
            warnings.push(format!(
                "pricing.tax_rate_percent {} is above 100%",
                pricing.tax_rate_percent
            ));
        }

        if self.session.login_delay_ms > 10_000 {
            warnings.push(format!(
                "session.login_delay_ms {} makes sign-in very slow",
                self.session.login_delay_ms
            ));
        }

        (errors, warnings)
    }
}

/// Store-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    /// ISO currency code prices are shown in.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    Currency::default().code().to_string()
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

impl StoreSection {
    pub fn currency(&self) -> Result<Currency, CommerceError> {
        self.currency.parse()
    }
}

/// Pricing rules, mirrored into a [`PricingPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: f64,

    /// Subtotals strictly above this ship free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: f64,

    #[serde(default = "default_flat_shipping_rate")]
    pub flat_shipping_rate: f64,
}

fn default_tax_rate() -> f64 {
    PricingPolicy::default().tax_rate_percent
}

fn default_free_shipping_threshold() -> f64 {
    PricingPolicy::default().free_shipping_threshold
}

fn default_flat_shipping_rate() -> f64 {
    PricingPolicy::default().flat_shipping_rate
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate_percent: default_tax_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            flat_shipping_rate: default_flat_shipping_rate(),
        }
    }
}

impl PricingConfig {
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            tax_rate_percent: self.tax_rate_percent,
            free_shipping_threshold: self.free_shipping_threshold,
            flat_shipping_rate: self.flat_shipping_rate,
        }
    }
}

/// Simulated sign-in settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_login_delay_ms")]
    pub login_delay_ms: u64,
}

fn default_login_delay_ms() -> u64 {
    u64::try_from(DEFAULT_LOGIN_DELAY.as_millis()).unwrap_or(1000)
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: default_login_delay_ms(),
        }
    }
}

impl SessionConfig {
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

/// Activity log settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub level: LogLevel,
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    let pricing = PricingPolicy::default();
    format!(
        r#"# Storefront configuration

[store]
currency = "{currency}"

[pricing]
tax_rate_percent = {tax:.1}
# Subtotals above this amount ship free
free_shipping_threshold = {threshold:.1}
flat_shipping_rate = {flat}

[session]
login_delay_ms = {delay}

[logging]
format = "human"   # or "json"
level = "info"
"#,
        currency = Currency::default().code(),
        tax = pricing.tax_rate_percent,
        threshold = pricing.free_shipping_threshold,
        flat = pricing.flat_shipping_rate,
        delay = default_login_delay_ms(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = StoreConfig::parse("", false).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.store.currency().unwrap(), Currency::INR);
        assert_eq!(config.pricing.policy(), PricingPolicy::default());
        assert_eq!(config.session.login_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_generated_config_round_trips() {
        let config = StoreConfig::parse(&generate_default_config(), false).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = StoreConfig::parse(
            r#"
[pricing]
tax_rate_percent = 5.0

[logging]
format = "json"
"#,
            false,
        )
        .unwrap();
        assert_eq!(config.pricing.tax_rate_percent, 5.0);
        assert_eq!(config.pricing.flat_shipping_rate, 9.99);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_json_config() {
        let config =
            StoreConfig::parse(r#"{"store": {"currency": "USD"}}"#, true).unwrap();
        assert_eq!(config.store.currency().unwrap(), Currency::USD);
    }

    #[test]
    fn test_validate_reports_errors() {
        let mut config = StoreConfig::default();
        config.store.currency = "XYZ".to_string();
        config.pricing.flat_shipping_rate = -1.0;
        config.session.login_delay_ms = 60_000;

        let (errors, warnings) = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("store.currency"));
        assert!(errors[1].contains("flat_shipping_rate"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_default_config_is_valid() {
        let (errors, warnings) = StoreConfig::default().validate();
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }
}
