//! The storefront controller.
//!
//! [`Storefront`] is the single owner of the catalog, the cart, the session
//! and the checkout state. Every mutation goes through one of its methods,
//! and the [`Frontend`] is told about each change right after it happens.

use quickcart_core::{Cart, CartTotals, Catalog, OrderId, ProductId};
use tracing::instrument;

use crate::checkout::{CheckoutError, CheckoutOutcome, CheckoutState, prepare_order};
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError, add_breadcrumb};
use crate::frontend::Frontend;
use crate::gateway::{
    Credentials, Gateway, OrderConfirmation, OrderSummary, Registration, UserProfile,
};
use crate::session::{Session, SessionContext, SessionError};
use crate::storage::TokenStore;
use crate::view::{CartView, ProductGridView};

pub const REGISTERED_MESSAGE: &str = "Registration successful!";
pub const LOGGED_IN_MESSAGE: &str = "Login successful!";
pub const LOGGED_OUT_MESSAGE: &str = "Logged out.";

/// Top-level storefront state and operations.
pub struct Storefront<G, F> {
    config: StorefrontConfig,
    gateway: G,
    frontend: F,
    catalog: Catalog,
    cart: Cart,
    session: SessionContext,
    checkout: CheckoutState,
    grid: ProductGridView,
}

impl<G, F> std::fmt::Debug for Storefront<G, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("products", &self.catalog.len())
            .field("cart_lines", &self.cart.lines().len())
            .field("session", &self.session)
            .field("checkout", &self.checkout)
            .finish_non_exhaustive()
    }
}

impl<G: Gateway, F: Frontend> Storefront<G, F> {
    /// Create a storefront with an empty catalog and cart.
    ///
    /// The session is restored from `store` immediately; the token is not
    /// validated against the API.
    pub fn new(
        config: StorefrontConfig,
        gateway: G,
        frontend: F,
        store: Box<dyn TokenStore>,
    ) -> Self {
        Self {
            config,
            gateway,
            frontend,
            catalog: Catalog::new(),
            cart: Cart::new(),
            session: SessionContext::restore(store),
            checkout: CheckoutState::Idle,
            grid: ProductGridView::Loading,
        }
    }

    /// Paint the empty cart, then load the catalog.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the catalog could not be fetched. The
    /// grid already shows the failure by then.
    pub async fn start(&mut self) -> Result<()> {
        self.repaint_cart();
        self.refresh_catalog().await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the product list and replace the catalog wholesale.
    ///
    /// On failure the previous catalog is kept as it was.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&mut self) -> Result<()> {
        self.show_grid(ProductGridView::Loading);

        match self.gateway.fetch_products().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "Catalog loaded");
                self.catalog.replace(products);
                self.show_all();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog refresh failed");
                self.show_grid(ProductGridView::Failed(e.to_string()));
                Err(StorefrontError::Gateway(e))
            }
        }
    }

    /// Show the whole catalog.
    pub fn show_all(&mut self) -> &ProductGridView {
        let grid = ProductGridView::all(self.catalog.products());
        self.show_grid(grid)
    }

    /// Show products whose name, description or category contains `term`.
    ///
    /// A blank term shows the whole catalog.
    pub fn search(&mut self, term: &str) -> &ProductGridView {
        if term.trim().is_empty() {
            return self.show_all();
        }
        let grid = ProductGridView::filtered(&self.catalog.search(term));
        self.show_grid(grid)
    }

    /// Show products in exactly `category`.
    pub fn filter_by_category(&mut self, category: &str) -> &ProductGridView {
        let grid = ProductGridView::filtered(&self.catalog.filter_by_category(category));
        self.show_grid(grid)
    }

    fn show_grid(&mut self, grid: ProductGridView) -> &ProductGridView {
        self.frontend.catalog_changed(&grid);
        self.grid = grid;
        &self.grid
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a catalog product to the cart.
    ///
    /// Unknown ids are ignored. Returns whether anything was added.
    pub fn add_item(&mut self, id: ProductId) -> bool {
        let Some(product) = self.catalog.find_by_id(id) else {
            tracing::debug!(product_id = %id, "Ignoring add of unknown product");
            return false;
        };

        self.cart.add(product);
        let message = format!("{} added to cart!", product.name);
        let product_id = id.to_string();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

        self.repaint_cart();
        self.frontend.notify(&message);
        true
    }

    /// Remove a product's line from the cart. Returns whether it was present.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let removed = self.cart.remove(id);
        if removed {
            let product_id = id.to_string();
            add_breadcrumb(
                "cart",
                "Removed from cart",
                Some(&[("product_id", product_id.as_str())]),
            );
        }
        self.repaint_cart();
        removed
    }

    /// Adjust a line's quantity by `delta`, removing it at zero or below.
    ///
    /// Unknown ids are ignored. Returns whether the cart changed.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) -> bool {
        let changed = self.cart.change_quantity(id, delta);
        if changed {
            self.repaint_cart();
        }
        changed
    }

    /// Item count and unrounded total price.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.repaint_cart();
    }

    fn repaint_cart(&mut self) {
        let view = CartView::from(&self.cart);
        self.frontend.cart_changed(&view);
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged; the session is left as it was.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&mut self, registration: &Registration) -> Result<()> {
        let auth = self
            .gateway
            .register(registration)
            .await
            .map_err(SessionError::from)?;

        self.session.establish(auth);
        add_breadcrumb("auth", "Registered", None);
        self.frontend.notify(REGISTERED_MESSAGE);
        Ok(())
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged; the session is left as it was.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let auth = self
            .gateway
            .login(credentials)
            .await
            .map_err(SessionError::from)?;

        self.session.establish(auth);
        add_breadcrumb("auth", "Logged in", None);
        self.frontend.notify(LOGGED_IN_MESSAGE);
        Ok(())
    }

    /// Sign out locally. Never calls the API.
    pub fn logout(&mut self) {
        self.session.clear();
        add_breadcrumb("auth", "Logged out", None);
        self.frontend.notify(LOGGED_OUT_MESSAGE);
    }

    // =========================================================================
    // Checkout and orders
    // =========================================================================

    /// Submit the cart as an order.
    ///
    /// The user is notified of every outcome. The cart is cleared only when
    /// the API accepts the order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotLoggedIn` or `CheckoutError::EmptyCart`
    /// without calling the API, or `CheckoutError::Gateway` if the API call
    /// failed.
    #[instrument(skip(self), fields(lines = self.cart.lines().len()))]
    pub async fn place_order(&mut self) -> Result<OrderConfirmation> {
        let prepared = match prepare_order(
            self.session.session(),
            &self.cart,
            &self.config.fallback_delivery_address,
        ) {
            Ok(prepared) => prepared,
            Err(e) => {
                self.frontend.notify(&e.to_string());
                return Err(e.into());
            }
        };

        let line_count = prepared.request.items.len().to_string();
        let fallback = prepared.used_fallback_address.to_string();
        add_breadcrumb(
            "checkout",
            "Submitting order",
            Some(&[
                ("lines", line_count.as_str()),
                ("fallback_address", fallback.as_str()),
            ]),
        );
        self.checkout = CheckoutState::Submitting;

        let result = self
            .gateway
            .place_order(prepared.token, &prepared.request)
            .await;

        match result {
            Ok(confirmation) => {
                tracing::info!(order_id = ?confirmation.order_id, "Order placed");
                self.frontend
                    .notify(&format!("Order placed! ETA: {}", confirmation.eta_label()));
                self.clear_cart();
                self.checkout =
                    CheckoutState::Resolved(CheckoutOutcome::Placed(confirmation.clone()));
                Ok(confirmation)
            }
            Err(e) => {
                let err = CheckoutError::from(e);
                tracing::warn!(error = %err, "Order submission failed");
                let message = err.to_string();
                self.frontend.notify(&message);
                self.checkout = CheckoutState::Resolved(CheckoutOutcome::Failed(message));
                Err(err.into())
            }
        }
    }

    /// Past orders of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotLoggedIn` without calling the API when no
    /// token is held, or the gateway error unchanged.
    #[instrument(skip(self))]
    pub async fn order_history(&self) -> Result<Vec<OrderSummary>> {
        let token = self
            .session
            .session()
            .token()
            .ok_or(StorefrontError::NotLoggedIn)?;
        Ok(self.gateway.list_orders(token).await?)
    }

    /// A single past order of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotLoggedIn` without calling the API when no
    /// token is held, or the gateway error unchanged.
    #[instrument(skip(self))]
    pub async fn order_details(&self, id: OrderId) -> Result<OrderSummary> {
        let token = self
            .session
            .session()
            .token()
            .ok_or(StorefrontError::NotLoggedIn)?;
        Ok(self.gateway.fetch_order(token, id).await?)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        self.session.session()
    }

    /// Profile of the signed-in user, if the session has one.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.session.session().user()
    }

    #[must_use]
    pub const fn checkout_state(&self) -> &CheckoutState {
        &self.checkout
    }

    /// What the product grid currently shows.
    #[must_use]
    pub const fn grid(&self) -> &ProductGridView {
        &self.grid
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    #[must_use]
    pub const fn frontend(&self) -> &F {
        &self.frontend
    }

    pub const fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use askama::Template;
    use async_trait::async_trait;
    use quickcart_core::catalog::sample_products;
    use quickcart_core::{Product, UserId};
    use secrecy::{ExposeSecret, SecretString};

    use super::*;
    use crate::frontend::RecordingFrontend;
    use crate::gateway::{AuthResponse, GatewayError, OrderRequest};
    use crate::storage::MemoryTokenStore;
    use crate::view::{EMPTY_CART_MESSAGE, NO_MATCHES_MESSAGE};

    /// In-process gateway that records every call.
    #[derive(Default)]
    struct FakeGateway {
        calls: Mutex<Vec<String>>,
        orders: Mutex<Vec<OrderRequest>>,
        products_unavailable: bool,
        reject_orders: bool,
        user_address: Option<String>,
    }

    impl FakeGateway {
        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn called(&self, call: &str) -> bool {
            self.calls().iter().any(|c| c == call)
        }

        fn auth(&self, email: &str) -> AuthResponse {
            AuthResponse {
                token: format!("token-for-{email}"),
                user: UserProfile {
                    id: UserId::new(5),
                    name: "Jo".to_string(),
                    email: Some(email.to_string()),
                    address: self.user_address.clone(),
                },
                message: None,
            }
        }
    }

    #[async_trait]
    impl Gateway for FakeGateway {
        async fn fetch_products(&self) -> std::result::Result<Vec<Product>, GatewayError> {
            self.record("fetch_products");
            if self.products_unavailable {
                return Err(GatewayError::Api {
                    status: 503,
                    message: "maintenance".to_string(),
                });
            }
            Ok(sample_products())
        }

        async fn register(
            &self,
            registration: &Registration,
        ) -> std::result::Result<AuthResponse, GatewayError> {
            self.record("register");
            Ok(self.auth(&registration.email))
        }

        async fn login(
            &self,
            credentials: &Credentials,
        ) -> std::result::Result<AuthResponse, GatewayError> {
            self.record("login");
            if credentials.password.expose_secret() != "correct" {
                return Err(GatewayError::Api {
                    status: 401,
                    message: "Invalid credentials".to_string(),
                });
            }
            Ok(self.auth(&credentials.email))
        }

        async fn place_order(
            &self,
            token: &SecretString,
            order: &OrderRequest,
        ) -> std::result::Result<OrderConfirmation, GatewayError> {
            self.record("place_order");
            assert!(token.expose_secret().starts_with("token-for-"));
            if self.reject_orders {
                return Err(GatewayError::Api {
                    status: 400,
                    message: "Product 3 is out of stock".to_string(),
                });
            }
            self.orders.lock().unwrap().push(order.clone());
            Ok(OrderConfirmation {
                order_id: Some(OrderId::new(77)),
                estimated_delivery_time: Some("2025-03-01T10:10:00".to_string()),
                message: Some("Order created successfully".to_string()),
            })
        }

        async fn list_orders(
            &self,
            _token: &SecretString,
        ) -> std::result::Result<Vec<OrderSummary>, GatewayError> {
            self.record("list_orders");
            Ok(Vec::new())
        }

        async fn fetch_order(
            &self,
            _token: &SecretString,
            id: OrderId,
        ) -> std::result::Result<OrderSummary, GatewayError> {
            self.record("fetch_order");
            Err(GatewayError::Api {
                status: 404,
                message: format!("Order {id} not found"),
            })
        }
    }

    type TestStorefront = Storefront<FakeGateway, RecordingFrontend>;

    fn storefront_with(gateway: FakeGateway) -> TestStorefront {
        Storefront::new(
            StorefrontConfig::default(),
            gateway,
            RecordingFrontend::new(),
            Box::new(MemoryTokenStore::new()),
        )
    }

    async fn started() -> TestStorefront {
        let mut storefront = storefront_with(FakeGateway::default());
        storefront.start().await.unwrap();
        storefront
    }

    async fn signed_in(gateway: FakeGateway) -> TestStorefront {
        let mut storefront = storefront_with(gateway);
        storefront.start().await.unwrap();
        storefront
            .login(&Credentials {
                email: "jo@example.com".to_string(),
                password: SecretString::from("correct"),
            })
            .await
            .unwrap();
        storefront
    }

    const BANANAS: ProductId = ProductId::new(1);
    const BREAD: ProductId = ProductId::new(2);

    #[tokio::test]
    async fn test_start_paints_cart_then_catalog() {
        let storefront = started().await;
        let frontend = storefront.frontend();

        assert_eq!(frontend.carts.first(), Some(&CartView::empty()));
        assert_eq!(frontend.grids.first(), Some(&ProductGridView::Loading));
        assert_eq!(frontend.last_grid().unwrap().cards().len(), 8);
        assert_eq!(storefront.catalog().len(), 8);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_catalog() {
        let mut storefront = started().await;
        storefront.gateway.products_unavailable = true;

        let err = storefront.refresh_catalog().await.unwrap_err();
        assert_eq!(err.to_string(), "maintenance");
        assert_eq!(storefront.catalog().len(), 8);
        assert_eq!(
            storefront.grid(),
            &ProductGridView::Failed("maintenance".to_string())
        );
    }

    #[tokio::test]
    async fn test_search_and_filter_are_projections() {
        let mut storefront = started().await;

        let grid = storefront.search("choc");
        assert_eq!(grid.cards().len(), 1);
        assert_eq!(grid.cards()[0].name, "Dark Chocolate");

        assert_eq!(storefront.search("   ").cards().len(), 8);
        assert_eq!(storefront.search("zzz"), &ProductGridView::NoMatches);
        assert!(
            storefront
                .grid()
                .render()
                .unwrap()
                .contains(NO_MATCHES_MESSAGE)
        );

        assert_eq!(storefront.filter_by_category("Snacks").cards().len(), 1);
        assert_eq!(storefront.filter_by_category("snacks"), &ProductGridView::NoMatches);
        assert_eq!(storefront.catalog().len(), 8);
    }

    #[tokio::test]
    async fn test_add_item_notifies_and_repaints() {
        let mut storefront = started().await;

        assert!(storefront.add_item(BANANAS));
        assert_eq!(
            storefront.frontend().last_notification(),
            Some("Organic Bananas added to cart!")
        );
        assert_eq!(storefront.frontend().last_cart().unwrap().item_count, 1);
    }

    #[tokio::test]
    async fn test_add_unknown_item_is_silent() {
        let mut storefront = started().await;
        let carts_before = storefront.frontend().carts.len();

        assert!(!storefront.add_item(ProductId::new(999)));
        assert!(storefront.cart().is_empty());
        assert!(storefront.frontend().notifications.is_empty());
        assert_eq!(storefront.frontend().carts.len(), carts_before);
    }

    #[tokio::test]
    async fn test_add_add_remove_empties_cart() {
        let mut storefront = started().await;
        storefront.add_item(BANANAS);
        storefront.add_item(BANANAS);
        assert_eq!(storefront.cart().line(BANANAS).unwrap().quantity(), 2);

        assert!(storefront.remove_item(BANANAS));
        assert!(storefront.cart().is_empty());
        assert!(
            storefront
                .frontend()
                .last_cart()
                .unwrap()
                .render()
                .unwrap()
                .contains(EMPTY_CART_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_change_quantity_to_zero_removes_line() {
        let mut storefront = started().await;
        storefront.add_item(BREAD);
        storefront.change_quantity(BREAD, 2);
        assert_eq!(storefront.totals().item_count, 3);

        assert!(storefront.change_quantity(BREAD, -3));
        assert!(storefront.cart().line(BREAD).is_none());
        assert!(!storefront.change_quantity(BREAD, 1));
    }

    #[tokio::test]
    async fn test_totals_match_worked_example() {
        let mut storefront = started().await;
        storefront.add_item(BANANAS);
        storefront.add_item(BANANAS);
        storefront.add_item(BREAD);

        let totals = storefront.totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_price.display(), "$9.47");

        storefront.clear_cart();
        assert_eq!(storefront.totals(), CartTotals::default());
    }

    #[tokio::test]
    async fn test_checkout_as_guest_never_calls_api() {
        let mut storefront = started().await;
        storefront.add_item(BANANAS);

        let err = storefront.place_order().await.unwrap_err();
        assert_eq!(err.to_string(), "Please login to place an order.");
        assert_eq!(
            storefront.frontend().last_notification(),
            Some("Please login to place an order.")
        );
        assert!(!storefront.gateway().called("place_order"));
        assert_eq!(storefront.checkout_state(), &CheckoutState::Idle);
        assert!(!storefront.cart().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_with_restored_token_only_needs_login() {
        let mut storefront = Storefront::new(
            StorefrontConfig::default(),
            FakeGateway::default(),
            RecordingFrontend::new(),
            Box::new(MemoryTokenStore::with_token("token-for-old")),
        );
        storefront.start().await.unwrap();
        storefront.add_item(BANANAS);

        assert!(storefront.session().is_authenticated());
        let err = storefront.place_order().await.unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Checkout(CheckoutError::NotLoggedIn)
        ));
        assert!(!storefront.gateway().called("place_order"));
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_never_calls_api() {
        let mut storefront = signed_in(FakeGateway::default()).await;

        let err = storefront.place_order().await.unwrap_err();
        assert_eq!(err.to_string(), "Cart is empty.");
        assert!(!storefront.gateway().called("place_order"));
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart() {
        let gateway = FakeGateway {
            user_address: Some("4 Pine Rd".to_string()),
            ..FakeGateway::default()
        };
        let mut storefront = signed_in(gateway).await;
        storefront.add_item(BANANAS);
        storefront.add_item(BANANAS);
        storefront.add_item(BREAD);

        let confirmation = storefront.place_order().await.unwrap();
        assert_eq!(confirmation.order_id, Some(OrderId::new(77)));
        assert_eq!(
            storefront.frontend().last_notification(),
            Some("Order placed! ETA: 2025-03-01T10:10:00")
        );
        assert!(storefront.cart().is_empty());
        assert!(matches!(
            storefront.checkout_state(),
            CheckoutState::Resolved(CheckoutOutcome::Placed(_))
        ));

        let orders = storefront.gateway().orders.lock().unwrap().clone();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].delivery_address, "4 Pine Rd");
        assert_eq!(orders[0].items.len(), 2);
        assert_eq!(orders[0].items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_checkout_without_address_uses_fallback() {
        let mut storefront = signed_in(FakeGateway::default()).await;
        storefront.add_item(BREAD);
        storefront.place_order().await.unwrap();

        let orders = storefront.gateway().orders.lock().unwrap().clone();
        assert_eq!(
            orders[0].delivery_address,
            storefront.config().fallback_delivery_address
        );
    }

    #[tokio::test]
    async fn test_rejected_checkout_keeps_cart() {
        let gateway = FakeGateway {
            reject_orders: true,
            ..FakeGateway::default()
        };
        let mut storefront = signed_in(gateway).await;
        storefront.add_item(BREAD);

        let err = storefront.place_order().await.unwrap_err();
        assert_eq!(err.to_string(), "Order failed: Product 3 is out of stock");
        assert_eq!(
            storefront.frontend().last_notification(),
            Some("Order failed: Product 3 is out of stock")
        );
        assert_eq!(storefront.totals().item_count, 1);
        assert_eq!(
            storefront.checkout_state(),
            &CheckoutState::Resolved(CheckoutOutcome::Failed(
                "Order failed: Product 3 is out of stock".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_login_failure_leaves_guest() {
        let mut storefront = started().await;
        let err = storefront
            .login(&Credentials {
                email: "jo@example.com".to_string(),
                password: SecretString::from("wrong"),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!storefront.session().is_authenticated());
        assert!(storefront.frontend().notifications.is_empty());
    }

    #[tokio::test]
    async fn test_register_login_logout() {
        let mut storefront = started().await;
        storefront
            .register(&Registration {
                email: "new@example.com".to_string(),
                password: SecretString::from("pw"),
                name: "New".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(storefront.frontend().last_notification(), Some(REGISTERED_MESSAGE));
        assert!(storefront.user().is_some());

        storefront.logout();
        assert_eq!(storefront.frontend().last_notification(), Some(LOGGED_OUT_MESSAGE));
        assert!(!storefront.session().is_authenticated());
        assert_eq!(storefront.gateway().calls().last().unwrap(), "register");

        let mut storefront = signed_in(FakeGateway::default()).await;
        assert_eq!(storefront.frontend().last_notification(), Some(LOGGED_IN_MESSAGE));
        storefront.logout();
        assert!(storefront.user().is_none());
    }

    #[tokio::test]
    async fn test_order_history_requires_token() {
        let storefront = started().await;
        let err = storefront.order_history().await.unwrap_err();
        assert!(matches!(err, StorefrontError::NotLoggedIn));
        assert!(!storefront.gateway().called("list_orders"));
    }

    #[tokio::test]
    async fn test_order_history_and_details() {
        let storefront = signed_in(FakeGateway::default()).await;
        assert!(storefront.order_history().await.unwrap().is_empty());

        let err = storefront.order_details(OrderId::new(3)).await.unwrap_err();
        assert_eq!(err.to_string(), "Order 3 not found");
        assert!(storefront.gateway().called("fetch_order"));
    }
}
