//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, StoreConfig, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults, no config file found)"),
    }

    let config = &ctx.config;

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("currency", &config.store.currency);

    ctx.output.info("");
    ctx.output.info("[pricing]");
    ctx.output
        .kv("tax_rate_percent", &config.pricing.tax_rate_percent.to_string());
    ctx.output.kv(
        "free_shipping_threshold",
        &config.pricing.free_shipping_threshold.to_string(),
    );
    ctx.output
        .kv("flat_shipping_rate", &config.pricing.flat_shipping_rate.to_string());

    ctx.output.info("");
    ctx.output.info("[session]");
    ctx.output
        .kv("login_delay_ms", &config.session.login_delay_ms.to_string());

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("format", config.logging.format.as_str());
    ctx.output.kv("level", config.logging.level.as_str());

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.validate();

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

fn get_config_value(config: &StoreConfig, key: &str) -> Result<serde_json::Value> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["store", "currency"] => serde_json::json!(config.store.currency),
        ["pricing", "tax_rate_percent"] => serde_json::json!(config.pricing.tax_rate_percent),
        ["pricing", "free_shipping_threshold"] => {
            serde_json::json!(config.pricing.free_shipping_threshold)
        }
        ["pricing", "flat_shipping_rate"] => serde_json::json!(config.pricing.flat_shipping_rate),
        ["session", "login_delay_ms"] => serde_json::json!(config.session.login_delay_ms),
        ["logging", "format"] => serde_json::json!(config.logging.format),
        ["logging", "level"] => serde_json::json!(config.logging.level),
        _ => bail!("Unknown config key: {}", key),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let config = StoreConfig::default();
        assert_eq!(
            get_config_value(&config, "store.currency").unwrap(),
            serde_json::json!("INR")
        );
        assert_eq!(
            get_config_value(&config, "pricing.tax_rate_percent").unwrap(),
            serde_json::json!(8.0)
        );
        assert_eq!(
            get_config_value(&config, "logging.format").unwrap(),
            serde_json::json!("human")
        );
        assert!(get_config_value(&config, "pricing").is_err());
    }
}
