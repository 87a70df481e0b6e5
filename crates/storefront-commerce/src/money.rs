//! Money type for representing monetary values.
//!
//! Amounts are integers in the currency's minor unit (paise, cents), so
//! cart subtotals are exact sums rather than accumulated floats.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

/// Minor units in one major unit. Every supported currency has two decimal
/// places.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "INR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol (e.g., "₹").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Number of decimal places in the minor unit.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| CommerceError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a Money value from a decimal amount, rounding to the nearest
    /// minor unit.
    ///
    /// ```
    /// use storefront_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::INR);
    /// assert_eq!(price.amount_minor, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_minor = (amount * multiplier as f64).round() as i64;
        Self::new(amount_minor, currency)
    }

    /// Convert a decimal amount to minor units without rounding.
    ///
    /// Returns `None` when the amount is not finite or carries more
    /// precision than a minor unit.
    ///
    /// ```
    /// use storefront_commerce::money::Money;
    /// assert_eq!(Money::exact_minor_units(49.99), Some(4999));
    /// assert_eq!(Money::exact_minor_units(0.004), None);
    /// ```
    pub fn exact_minor_units(amount: f64) -> Option<i64> {
        let scaled = amount * MINOR_UNITS_PER_MAJOR as f64;
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        let rounded = scaled.round();
        let tolerance = 16.0 * f64::EPSILON * scaled.abs().max(1.0);
        ((scaled - rounded).abs() <= tolerance).then_some(rounded as i64)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_minor as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "₹49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.to_decimal())
    }

    /// Add another Money value, returning None if currencies don't match.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(
            self.amount_minor.saturating_add(other.amount_minor),
            self.currency,
        ))
    }

    /// Subtract another Money value, returning None if currencies don't match.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(
            self.amount_minor.saturating_sub(other.amount_minor),
            self.currency,
        ))
    }

    /// Multiply by a quantity. Saturates instead of overflowing.
    pub fn multiply(&self, factor: i64) -> Money {
        Money::new(self.amount_minor.saturating_mul(factor), self.currency)
    }

    /// Multiply by a decimal factor, rounding to the nearest minor unit.
    pub fn multiply_decimal(&self, factor: f64) -> Money {
        let new_amount = (self.amount_minor as f64 * factor).round() as i64;
        Money::new(new_amount, self.currency)
    }

    /// Calculate a percentage of this amount.
    pub fn percentage(&self, percent: f64) -> Money {
        self.multiply_decimal(percent / 100.0)
    }

    /// Sum an iterator of Money values, skipping values in other currencies.
    pub fn sum<'a>(iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Money {
        iter.filter(|m| m.currency == currency)
            .fold(Money::zero(currency), |acc, m| {
                Money::new(acc.amount_minor.saturating_add(m.amount_minor), currency)
            })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
