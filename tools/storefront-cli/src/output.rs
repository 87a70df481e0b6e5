//! Output formatting for the CLI.

use chrono::{DateTime, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use storefront_commerce::checkout::OrderStatus;
use storefront_commerce::Money;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a step in a process.
    pub fn step(&self, num: u8, total: u8, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style(format!("[{}/{}]", num, total)).dim(), msg);
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Status badge for order states.
pub fn status_badge(status: OrderStatus) -> String {
    let label = status.display_name();
    match status {
        OrderStatus::Delivered => style(label).green().to_string(),
        OrderStatus::Shipped => style(label).blue().to_string(),
        OrderStatus::Processing => style(label).yellow().to_string(),
        OrderStatus::Pending => style(label).dim().to_string(),
    }
}

/// Price with the pre-discount amount struck through when there is one.
pub fn format_price(price: Money, original: Option<Money>) -> String {
    match original {
        Some(original) => format!(
            "{} {}",
            style(price.display()).bold(),
            style(original.display()).dim().strikethrough()
        ),
        None => style(price.display()).bold().to_string(),
    }
}

/// Five-star rating, e.g. "★★★★☆ 4.5 (128)".
pub fn format_rating(full_stars: u8, rating: f64, reviews: u32) -> String {
    let full = usize::from(full_stars.min(5));
    format!(
        "{}{} {:.1} ({})",
        "★".repeat(full),
        "☆".repeat(5 - full),
        rating,
        reviews
    )
}

/// Long date as shown on order pages, e.g. "January 15, 2024".
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(4, 4.5, 128), "★★★★☆ 4.5 (128)");
        assert_eq!(format_rating(9, 5.0, 1), "★★★★★ 5.0 (1)");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date), "January 5, 2024");
    }
}
