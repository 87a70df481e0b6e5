//! Interactive shopping session.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Password, Select};
use storefront_commerce::cart::{CartStore, PricingPolicy};
use storefront_commerce::catalog::{Catalog, ProductQuery, SortOption, ALL_CATEGORIES};
use storefront_commerce::checkout::{CheckoutFlow, CheckoutStep, OrderHistory, StatusFilter};
use storefront_commerce::mock;
use storefront_commerce::session::{Profile, ProfileEditor, UserSession};
use storefront_commerce::{CommerceError, ProductId};
use storefront_observability::{CartActivityLog, StructuredLogger};

use super::cart::print_cart;
use super::orders::{print_order, print_orders};
use super::products::print_product;
use super::OrdersArgs;
use crate::context::Context;

/// State owned by one interactive session.
struct Shop<'a> {
    ctx: &'a Context,
    catalog: Catalog,
    cart: CartStore,
    history: OrderHistory,
    session: UserSession,
    profile: Option<ProfileEditor>,
    policy: PricingPolicy,
    logger: StructuredLogger,
}

/// Run the shop command.
pub async fn run(args: super::ShopArgs, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("`storefront shop` is interactive and does not support --json");
    }

    let catalog = ctx.catalog()?;
    let history = ctx.order_history(&catalog)?;
    let session = UserSession::new(mock::mock_user(), ctx.config.session.login_delay());
    let logger = ctx.logger(session.id().clone());

    let mut cart = ctx.new_cart()?;
    cart.subscribe(CartActivityLog::new(&logger));

    let mut shop = Shop {
        ctx,
        catalog,
        cart,
        history,
        session,
        profile: None,
        policy: ctx.pricing(),
        logger,
    };

    ctx.output.header("Welcome to the store");
    if args.login {
        shop.sign_in().await?;
    }

    shop.main_menu().await
}

impl Shop<'_> {
    async fn main_menu(&mut self) -> Result<()> {
        loop {
            let cart_label = format!("View cart ({})", self.cart.snapshot().item_count);
            let account_label = match self.session.current() {
                Some(user) => format!("Account ({})", user.name),
                None => "Sign in".to_string(),
            };
            let items = [
                "Browse products",
                cart_label.as_str(),
                "Checkout",
                "My orders",
                account_label.as_str(),
                "Quit",
            ];

            let choice = Select::new()
                .with_prompt("What would you like to do?")
                .items(&items)
                .default(0)
                .interact()?;

            match choice {
                0 => self.browse()?,
                1 => self.edit_cart()?,
                2 => self.checkout()?,
                3 => self.orders()?,
                4 => self.account().await?,
                _ => break,
            }
        }

        self.logger
            .info_builder("session ended")
            .field_u64("cart_items", self.cart.snapshot().item_count)
            .field_bool("signed_in", self.session.is_signed_in())
            .emit();
        Ok(())
    }

    fn browse(&mut self) -> Result<()> {
        let search: String = Input::new()
            .with_prompt("Search (leave empty for all)")
            .allow_empty(true)
            .interact_text()?;

        let categories = self.catalog.categories();
        let category = Select::new()
            .with_prompt("Category")
            .items(&categories)
            .default(0)
            .interact()?;

        let sorts = SortOption::all();
        let sort_names: Vec<&str> = sorts.iter().map(|s| s.display_name()).collect();
        let sort = Select::new()
            .with_prompt("Sort by")
            .items(&sort_names)
            .default(0)
            .interact()?;

        let mut query = ProductQuery::new().with_sort(sorts[sort]);
        if !search.trim().is_empty() {
            query = query.with_search(search.trim());
        }
        if categories[category] != ALL_CATEGORIES {
            query = query.with_category(categories[category].clone());
        }

        let ids: Vec<ProductId> = self
            .catalog
            .browse(&query)
            .into_iter()
            .map(|p| p.id().clone())
            .collect();
        if ids.is_empty() {
            self.ctx.output.info("No products found.");
            return Ok(());
        }

        let mut labels: Vec<String> = ids
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .map(|p| {
                let price = p.price_in(self.catalog.currency());
                format!("{}  {}", p.name(), price.display())
            })
            .collect();
        labels.push("Back".to_string());

        let picked = Select::new()
            .with_prompt(format!("{} products", ids.len()))
            .items(&labels)
            .default(0)
            .interact()?;
        match ids.get(picked) {
            Some(id) => self.product_page(id),
            None => Ok(()),
        }
    }

    fn product_page(&mut self, id: &ProductId) -> Result<()> {
        let product = self.catalog.require(id)?.clone();
        print_product(&product, self.catalog.currency(), self.ctx);

        if !product.in_stock() {
            self.ctx.output.warn("This product is out of stock.");
            return Ok(());
        }

        let quantity: u32 = Input::new()
            .with_prompt("Quantity to add (0 to go back)")
            .default(1)
            .interact_text()?;
        if quantity == 0 {
            return Ok(());
        }

        let snapshot = self.cart.add_many(&product, i64::from(quantity));
        self.ctx.output.success(&format!(
            "Added {} x {} to cart ({} items)",
            quantity,
            product.name(),
            snapshot.item_count
        ));
        Ok(())
    }

    fn edit_cart(&mut self) -> Result<()> {
        loop {
            let snapshot = self.cart.snapshot();
            print_cart(&snapshot, &self.policy, self.ctx);
            if snapshot.is_empty() {
                return Ok(());
            }

            let mut labels: Vec<String> = snapshot
                .lines
                .iter()
                .map(|l| format!("{} (x{})", l.product().name(), l.quantity()))
                .collect();
            labels.push("Clear cart".to_string());
            labels.push("Back".to_string());

            let picked = Select::new()
                .with_prompt("Select an item")
                .items(&labels)
                .default(0)
                .interact()?;

            let Some(line) = snapshot.lines.get(picked) else {
                if picked == snapshot.lines.len()
                    && Confirm::new()
                        .with_prompt("Remove every item from the cart?")
                        .default(false)
                        .interact()?
                {
                    self.cart.clear();
                }
                if picked > snapshot.lines.len() {
                    return Ok(());
                }
                continue;
            };

            let id = line.product_id().clone();
            let action = Select::new()
                .with_prompt(line.product().name())
                .items(&["Increase", "Decrease", "Set quantity", "Remove", "Back"])
                .default(0)
                .interact()?;

            match action {
                0 => {
                    self.cart.increment(&id);
                }
                1 => {
                    self.cart.decrement(&id);
                }
                2 => {
                    let quantity: i64 = Input::new()
                        .with_prompt("New quantity (0 removes)")
                        .default(i64::from(line.quantity()))
                        .interact_text()?;
                    self.cart.set_quantity(&id, quantity);
                }
                3 => {
                    self.cart.remove(&id);
                }
                _ => {}
            }
        }
    }

    fn checkout(&mut self) -> Result<()> {
        let mut flow = match CheckoutFlow::start(&self.cart, self.session.current(), self.policy)
        {
            Ok(flow) => flow,
            Err(CommerceError::EmptyCart) => {
                self.ctx
                    .output
                    .warn("Your cart is empty. Add some products before checking out.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        while !flow.is_complete() {
            let step = flow.step();
            self.ctx
                .output
                .step(step.number(), 3, step.display_name());

            let proceed = match step {
                CheckoutStep::Shipping => self.shipping_form(&mut flow)?,
                CheckoutStep::Payment => self.payment_form(&mut flow)?,
                CheckoutStep::Review => self.review(&flow)?,
                CheckoutStep::Confirmation => break,
            };

            match proceed {
                Some(true) => match flow.advance(&mut self.cart) {
                    Ok(_) => {}
                    Err(CommerceError::CheckoutIncomplete(missing)) => {
                        self.ctx
                            .output
                            .warn(&format!("Please fill in: {}", missing));
                    }
                    Err(e) => return Err(e.into()),
                },
                Some(false) => {
                    flow.go_back()?;
                }
                None => {
                    self.ctx.output.info("Checkout cancelled. Your cart was kept.");
                    return Ok(());
                }
            }
        }

        if let Some(order) = flow.placed_order() {
            self.logger.child("checkout").info_with(
                "order placed",
                &[("order_id", &order.id), ("total", &order.total)],
            );
            self.ctx.output.success("Order confirmed!");
            self.ctx.output.kv("Order number", order.id.as_str());
            self.ctx.output.kv("Email", &flow.shipping.email);
            self.ctx
                .output
                .info("You'll receive an email confirmation shortly.");
            self.history.record(order.clone());
        }
        Ok(())
    }

    /// `Some(true)` to continue, `None` to cancel.
    fn shipping_form(&self, flow: &mut CheckoutFlow) -> Result<Option<bool>> {
        let shipping = &mut flow.shipping;
        shipping.first_name = prompt("First name", &shipping.first_name)?;
        shipping.last_name = prompt("Last name", &shipping.last_name)?;
        shipping.email = prompt("Email", &shipping.email)?;
        shipping.phone = prompt("Phone", &shipping.phone)?;
        shipping.address = prompt("Address", &shipping.address)?;
        shipping.city = prompt("City", &shipping.city)?;
        shipping.state = prompt("State", &shipping.state)?;
        shipping.zip_code = prompt("ZIP code", &shipping.zip_code)?;
        shipping.country = prompt("Country", &shipping.country)?;

        let preferences = &mut flow.preferences;
        preferences.save_address = confirm("Save this address for future orders?", false)?;
        preferences.newsletter = confirm("Subscribe to the newsletter?", false)?;
        preferences.sms_updates = confirm("Receive SMS updates about your order?", false)?;

        let next = Select::new()
            .with_prompt("Next")
            .items(&["Continue to payment", "Cancel checkout"])
            .default(0)
            .interact()?;
        Ok((next == 0).then_some(true))
    }

    /// `Some(true)` to continue, `Some(false)` to go back, `None` to cancel.
    fn payment_form(&self, flow: &mut CheckoutFlow) -> Result<Option<bool>> {
        let payment = &mut flow.payment;
        payment.card_number = prompt("Card number", &payment.card_number)?;
        payment.expiry_date = prompt("Expiry date (MM/YY)", &payment.expiry_date)?;
        payment.cvv = Password::new()
            .with_prompt("CVV")
            .allow_empty_password(true)
            .interact()?;
        payment.name_on_card = prompt("Name on card", &payment.name_on_card)?;
        payment.billing_same_as_shipping =
            confirm("Billing address same as shipping?", payment.billing_same_as_shipping)?;

        navigation("Continue to review")
    }

    /// `Some(true)` to place the order, `Some(false)` to go back, `None` to
    /// cancel.
    fn review(&self, flow: &CheckoutFlow) -> Result<Option<bool>> {
        let output = &self.ctx.output;
        let totals = flow.totals(&self.cart);

        output.header("Review Your Order");
        output.info("Shipping to:");
        output.kv("Name", &flow.shipping.full_name());
        for line in flow.shipping.to_address().multi_line().lines() {
            output.list_item(line);
        }
        output.info("Payment:");
        output.kv(
            "Card",
            &format!("**** **** **** {}", flow.payment.card_last_four()),
        );
        output.info("Items:");
        for line in &self.cart.snapshot().lines {
            output.list_item(&format!(
                "{} x{}  {}",
                line.product().name(),
                line.quantity(),
                line.line_total().display()
            ));
        }
        output.info("Order summary:");
        output.kv("Subtotal", &totals.subtotal.display());
        let shipping = if totals.free_shipping() {
            "Free".to_string()
        } else {
            totals.shipping.display()
        };
        output.kv("Shipping", &shipping);
        output.kv("Tax", &totals.tax.display());
        output.kv("Total", &totals.total.display());

        navigation("Place order")
    }

    fn orders(&self) -> Result<()> {
        let statuses = ["all", "pending", "processing", "shipped", "delivered"];
        let picked = Select::new()
            .with_prompt("Show orders")
            .items(&statuses)
            .default(0)
            .interact()?;
        let status: StatusFilter = statuses[picked].parse()?;
        print_orders(
            &self.history,
            &OrdersArgs {
                status,
                limit: None,
            },
            self.ctx,
        );

        let shown = self.history.filter(status);
        if shown.is_empty() {
            return Ok(());
        }
        let mut labels: Vec<String> = shown.iter().map(|o| o.id.to_string()).collect();
        labels.push("Back".to_string());
        let picked = Select::new()
            .with_prompt("View order")
            .items(&labels)
            .default(0)
            .interact()?;
        if let Some(order) = shown.get(picked) {
            print_order(order, &self.policy, self.ctx);
        }
        Ok(())
    }

    async fn account(&mut self) -> Result<()> {
        if !self.session.is_signed_in() {
            return self.sign_in().await;
        }

        if let Some(editor) = &self.profile {
            print_profile(editor.profile(), self.ctx);
        }

        let choice = Select::new()
            .with_prompt("Account")
            .items(&["Edit profile", "Sign out", "Back"])
            .default(0)
            .interact()?;

        match choice {
            0 => self.edit_profile(),
            1 => {
                self.session.logout();
                self.profile = None;
                self.ctx.output.success("Signed out");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn sign_in(&mut self) -> Result<()> {
        let email: String = Input::new().with_prompt("Email").interact_text()?;
        let password = Password::new().with_prompt("Password").interact()?;

        let spinner = self.ctx.output.spinner("Signing in...");
        let user = self.session.login(&email, &password).await.clone();
        spinner.finish_and_clear();

        self.logger
            .child("session")
            .info_builder("signed in")
            .field("user_id", user.id.as_str())
            .emit();
        self.ctx
            .output
            .success(&format!("Welcome back, {} ({})", user.name, user.initials()));
        self.profile = Some(ProfileEditor::new(Profile::for_user(&user)));
        Ok(())
    }

    fn edit_profile(&mut self) -> Result<()> {
        let Some(editor) = self.profile.as_mut() else {
            return Ok(());
        };

        editor.begin_edit();
        if let Some(draft) = editor.draft_mut() {
            draft.name = prompt("Full name", &draft.name)?;
            draft.email = prompt("Email", &draft.email)?;
            draft.phone = prompt("Phone", &draft.phone)?;
            draft.address = prompt("Address", &draft.address)?;
        }

        if confirm("Save changes?", true)? {
            editor.save();
            self.ctx.output.success("Profile updated");
        } else {
            editor.cancel();
            self.ctx.output.info("Changes discarded");
        }
        print_profile(editor.profile(), self.ctx);
        Ok(())
    }
}

fn print_profile(profile: &Profile, ctx: &Context) {
    ctx.output.header("Profile");
    ctx.output.kv("Name", &profile.name);
    ctx.output.kv("Email", &profile.email);
    ctx.output.kv("Phone", &profile.phone);
    ctx.output.kv("Address", &profile.address);
}

fn prompt(label: &str, current: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn confirm(label: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(label)
        .default(default)
        .interact()?)
}

fn navigation(forward: &str) -> Result<Option<bool>> {
    let choice = Select::new()
        .with_prompt("Next")
        .items(&[forward, "Back", "Cancel checkout"])
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => Some(true),
        1 => Some(false),
        _ => None,
    })
}
