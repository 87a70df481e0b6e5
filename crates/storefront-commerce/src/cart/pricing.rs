//! Tax and shipping calculations over a cart subtotal.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Storefront pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Sales tax applied to the subtotal, in percent.
    pub tax_rate_percent: f64,
    /// Orders with a subtotal strictly above this ship free (decimal amount).
    pub free_shipping_threshold: f64,
    /// Shipping charged at or below the threshold (decimal amount).
    pub flat_shipping_rate: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate_percent: 8.0,
            free_shipping_threshold: 50.0,
            flat_shipping_rate: 9.99,
        }
    }
}

impl PricingPolicy {
    /// Tax on an amount.
    pub fn tax(&self, subtotal: Money) -> Money {
        subtotal.percentage(self.tax_rate_percent)
    }

    /// Shipping for a subtotal: free above the threshold, flat otherwise.
    pub fn shipping(&self, subtotal: Money) -> Money {
        let threshold = Money::from_decimal(self.free_shipping_threshold, subtotal.currency);
        if subtotal.amount_minor > threshold.amount_minor {
            Money::zero(subtotal.currency)
        } else {
            Money::from_decimal(self.flat_shipping_rate, subtotal.currency)
        }
    }

    /// Summary shown on the cart page and drawer (no shipping line).
    pub fn cart_summary(&self, subtotal: Money) -> CartSummary {
        let tax = self.tax(subtotal);
        CartSummary {
            subtotal,
            tax,
            total: add(subtotal, tax),
        }
    }

    /// Totals charged at checkout.
    pub fn checkout_totals(&self, subtotal: Money) -> CheckoutTotals {
        let shipping = self.shipping(subtotal);
        let tax = self.tax(subtotal);
        CheckoutTotals {
            subtotal,
            shipping,
            tax,
            total: add(add(subtotal, shipping), tax),
        }
    }

    /// Split a tax-inclusive order total back into subtotal and tax.
    pub fn order_breakdown(&self, total: Money) -> OrderBreakdown {
        let subtotal = total.multiply_decimal(1.0 / (1.0 + self.tax_rate_percent / 100.0));
        let tax = Money::new(
            total.amount_minor.saturating_sub(subtotal.amount_minor),
            total.currency,
        );
        OrderBreakdown {
            subtotal,
            tax,
            total,
        }
    }
}

fn add(a: Money, b: Money) -> Money {
    Money::new(a.amount_minor.saturating_add(b.amount_minor), a.currency)
}

/// Cart page summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Checkout order summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl CheckoutTotals {
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Subtotal and tax recovered from a stored order total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderBreakdown {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn inr(amount_minor: i64) -> Money {
        Money::new(amount_minor, Currency::INR)
    }

    #[test]
    fn test_cart_summary() {
        let summary = PricingPolicy::default().cart_summary(inr(3500));
        assert_eq!(summary.tax, inr(280));
        assert_eq!(summary.total, inr(3780));
    }

    #[test]
    fn test_checkout_totals_flat_shipping() {
        let totals = PricingPolicy::default().checkout_totals(inr(5000));
        assert_eq!(totals.shipping, inr(999));
        assert_eq!(totals.tax, inr(400));
        assert_eq!(totals.total, inr(6399));
        assert!(!totals.free_shipping());
    }

    #[test]
    fn test_checkout_totals_free_shipping_above_threshold() {
        let totals = PricingPolicy::default().checkout_totals(inr(5001));
        assert!(totals.free_shipping());
        assert_eq!(totals.total, inr(5001 + 400));
    }

    #[test]
    fn test_order_breakdown() {
        let breakdown = PricingPolicy::default().order_breakdown(inr(10800));
        assert_eq!(breakdown.subtotal, inr(10000));
        assert_eq!(breakdown.tax, inr(800));
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy {
            tax_rate_percent: 0.0,
            free_shipping_threshold: 0.0,
            flat_shipping_rate: 5.0,
        };
        let totals = policy.checkout_totals(inr(100));
        assert!(totals.tax.is_zero());
        assert!(totals.free_shipping());
    }
}
