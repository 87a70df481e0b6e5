//! Checkout flow state machine.
//!
//! Shipping -> Payment -> Review -> Confirmation. Placing the order reads
//! the cart once, builds an [`Order`] locally and clears the cart.

use crate::cart::{CartStore, CheckoutTotals, PricingPolicy};
use crate::checkout::address::DEFAULT_COUNTRY;
use crate::checkout::{Address, Order, OrderItem, OrderStatus};
use crate::ids::{OrderId, UserId};
use crate::session::User;
use crate::CommerceError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Review,
    Confirmation,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
            CheckoutStep::Confirmation => "confirmation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Review => 3,
            CheckoutStep::Confirmation => 4,
        }
    }

    /// Steps shown in the progress indicator.
    pub fn visible() -> [CheckoutStep; 3] {
        [
            CheckoutStep::Shipping,
            CheckoutStep::Payment,
            CheckoutStep::Review,
        ]
    }
}

/// Progress indicator entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub step: CheckoutStep,
    pub active: bool,
    pub completed: bool,
}

/// Shipping form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for ShippingDetails {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl ShippingDetails {
    /// Empty form with name and email taken from the signed-in user.
    pub fn prefilled(user: Option<&User>) -> Self {
        let mut details = Self::default();
        if let Some(user) = user {
            let mut parts = user.name.split_whitespace();
            details.first_name = parts.next().unwrap_or_default().to_string();
            details.last_name = parts.next().unwrap_or_default().to_string();
            details.email = user.email.clone();
        }
        details
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn to_address(&self) -> Address {
        Address::new(
            self.address.clone(),
            self.city.clone(),
            self.state.clone(),
            self.zip_code.clone(),
            self.country.clone(),
        )
    }

    /// Names of required fields that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Card payment form. Nothing is charged; the data is only echoed back on
/// the review step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub name_on_card: String,
    pub billing_same_as_shipping: bool,
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self {
            card_number: String::new(),
            expiry_date: String::new(),
            cvv: String::new(),
            name_on_card: String::new(),
            billing_same_as_shipping: true,
        }
    }
}

impl PaymentDetails {
    /// Last four characters of the card number.
    pub fn card_last_four(&self) -> &str {
        let digits = self.card_number.trim();
        let start = digits
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(index, _)| index);
        &digits[start..]
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("card number", &self.card_number),
            ("expiry date", &self.expiry_date),
            ("cvv", &self.cvv),
            ("name on card", &self.name_on_card),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Opt-ins collected on the shipping step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub save_address: bool,
    pub newsletter: bool,
    pub sms_updates: bool,
}

/// Checkout flow state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    user_id: Option<UserId>,
    pub shipping: ShippingDetails,
    pub payment: PaymentDetails,
    pub preferences: Preferences,
    policy: PricingPolicy,
    placed_order: Option<Order>,
}

impl CheckoutFlow {
    /// Begin checkout. Fails with `EmptyCart` when there is nothing to buy.
    pub fn start(
        cart: &CartStore,
        user: Option<&User>,
        policy: PricingPolicy,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        Ok(Self {
            step: CheckoutStep::Shipping,
            user_id: user.map(|u| u.id.clone()),
            shipping: ShippingDetails::prefilled(user),
            payment: PaymentDetails::default(),
            preferences: Preferences::default(),
            policy,
            placed_order: None,
        })
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Order summary for the current cart contents.
    pub fn totals(&self, cart: &CartStore) -> CheckoutTotals {
        self.policy.checkout_totals(cart.snapshot().subtotal)
    }

    /// The order placed on the final step.
    pub fn placed_order(&self) -> Option<&Order> {
        self.placed_order.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.step == CheckoutStep::Confirmation
    }

    /// Progress entries for the visible steps.
    pub fn progress(&self) -> Vec<StepProgress> {
        CheckoutStep::visible()
            .into_iter()
            .map(|step| StepProgress {
                step,
                active: step == self.step,
                completed: step.number() < self.step.number(),
            })
            .collect()
    }

    /// Move to the next step. Leaving Review places the order and clears
    /// the cart.
    pub fn advance(&mut self, cart: &mut CartStore) -> Result<CheckoutStep, CommerceError> {
        let next = match self.step {
            CheckoutStep::Shipping => {
                ensure_complete(self.shipping.missing_fields())?;
                CheckoutStep::Payment
            }
            CheckoutStep::Payment => {
                ensure_complete(self.payment.missing_fields())?;
                CheckoutStep::Review
            }
            CheckoutStep::Review => {
                let order = self.place_order(cart)?;
                self.placed_order = Some(order);
                CheckoutStep::Confirmation
            }
            CheckoutStep::Confirmation => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: self.step.as_str().to_string(),
                    to: "none".to_string(),
                })
            }
        };

        self.step = next;
        Ok(next)
    }

    /// Go back one step. Only Payment and Review have a previous step.
    pub fn go_back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = match self.step {
            CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Review => CheckoutStep::Payment,
            CheckoutStep::Shipping | CheckoutStep::Confirmation => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: self.step.as_str().to_string(),
                    to: "previous".to_string(),
                })
            }
        };

        self.step = prev;
        Ok(prev)
    }

    fn place_order(&self, cart: &mut CartStore) -> Result<Order, CommerceError> {
        let snapshot = cart.snapshot();
        if snapshot.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let totals = self.policy.checkout_totals(snapshot.subtotal);
        let created_at = Utc::now();
        let order = Order {
            id: OrderId::new(format!("ORD-{}", created_at.timestamp_millis())),
            user_id: self.user_id.clone(),
            items: snapshot.lines.iter().map(OrderItem::from).collect(),
            total: totals.total,
            status: OrderStatus::Pending,
            created_at,
            shipping_address: self.shipping.to_address(),
        };

        cart.clear();
        info!(order_id = %order.id, total = %order.total, items = order.item_count(), "order placed");
        Ok(order)
    }
}

fn ensure_complete(missing: Vec<&'static str>) -> Result<(), CommerceError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CommerceError::CheckoutIncomplete(missing.join(", ")))
    }
}
