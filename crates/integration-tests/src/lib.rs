//! Integration tests for QuickCart.
//!
//! [`MockBackend`] is an in-process Axum server that speaks the same JSON
//! API as the real QuickCart backend: products, register/login with bearer
//! tokens, order placement and order history. It records the headers of
//! every request so tests can check what the client actually sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quickcart-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::spawn().await;
//! let config = backend.config(&token_dir);
//! let gateway = HttpGateway::new(&config)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path as UrlPath, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, NaiveDateTime, Utc};
use quickcart_core::catalog::sample_products;
use quickcart_core::{OrderId, OrderStatus, Price, Product, UserId};
use quickcart_storefront::StorefrontConfig;
use quickcart_storefront::gateway::{
    OrderConfirmation, OrderLineSummary, OrderRequest, OrderSummary,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Email of the account every backend starts with.
pub const DEMO_EMAIL: &str = "demo@quickcart.test";
/// Password of the demo account.
pub const DEMO_PASSWORD: &str = "groceries";
/// Address on the demo profile.
pub const DEMO_ADDRESS: &str = "42 Market St, Springfield";

/// Minutes between order creation and estimated delivery.
const DELIVERY_MINUTES: i64 = 10;

/// One request as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
struct MockUser {
    id: UserId,
    email: String,
    password: String,
    name: String,
    address: Option<String>,
}

impl MockUser {
    fn token(&self) -> String {
        format!("mock-token-{}", self.id)
    }

    fn profile(&self) -> Value {
        let mut user = json!({"id": self.id, "email": self.email, "name": self.name});
        if let Some(address) = &self.address {
            user["address"] = json!(address);
        }
        user
    }
}

#[derive(Debug)]
struct StoredOrder {
    user_id: UserId,
    summary: OrderSummary,
}

#[derive(Debug)]
struct BackendState {
    products: Vec<Product>,
    users: Vec<MockUser>,
    orders: Vec<StoredOrder>,
    requests: Vec<RecordedRequest>,
    products_unavailable: bool,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            products: sample_products(),
            users: vec![MockUser {
                id: UserId::new(1),
                email: DEMO_EMAIL.to_string(),
                password: DEMO_PASSWORD.to_string(),
                name: "Demo Shopper".to_string(),
                address: Some(DEMO_ADDRESS.to_string()),
            }],
            orders: Vec::new(),
            requests: Vec::new(),
            products_unavailable: false,
        }
    }
}

type SharedState = Arc<Mutex<BackendState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, BackendState> {
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// A running mock of the QuickCart API.
pub struct MockBackend {
    addr: SocketAddr,
    state: SharedState,
}

impl MockBackend {
    /// Bind to an ephemeral port on localhost and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = SharedState::default();

        let api = Router::new()
            .route("/products", get(list_products))
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/orders", post(create_order).get(list_orders))
            .route("/orders/{id}", get(get_order));

        let app = Router::new()
            .nest("/api", api)
            .layer(middleware::from_fn_with_state(state.clone(), record_request))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock backend stopped");
            }
        });

        Self { addr, state }
    }

    /// Base URL including the `/api` prefix.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client configuration pointing at this backend, with the token kept in
    /// `token_dir`.
    ///
    /// # Panics
    ///
    /// Panics if the generated base URL is rejected.
    #[must_use]
    pub fn config(&self, token_dir: &Path) -> StorefrontConfig {
        StorefrontConfig::default()
            .with_api_base(&self.api_base())
            .expect("Mock backend URL is valid")
            .with_token_path(token_dir.join("token"))
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests received for `method` and `path` (path without `/api`).
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        let full = format!("/api{path}");
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == full)
            .collect()
    }

    /// Make `GET /products` fail with a 500.
    pub fn set_products_unavailable(&self, unavailable: bool) {
        lock(&self.state).products_unavailable = unavailable;
    }

    /// Replace the product list served by `GET /products`.
    pub fn set_products(&self, products: Vec<Product>) {
        lock(&self.state).products = products;
    }

    /// Number of orders stored for all users.
    #[must_use]
    pub fn order_count(&self) -> usize {
        lock(&self.state).orders.len()
    }

    /// Set the status of a stored order.
    pub fn set_order_status(&self, id: OrderId, status: OrderStatus) {
        let mut state = lock(&self.state);
        if let Some(order) = state.orders.iter_mut().find(|o| o.summary.id == id) {
            order.summary.status = status;
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn record_request(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let recorded = {
        let header = |name: HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            content_type: header(CONTENT_TYPE),
            authorization: header(AUTHORIZATION),
        }
    };
    lock(&state).requests.push(recorded);

    next.run(request).await
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

async fn list_products(State(state): State<SharedState>) -> Response {
    let state = lock(&state);
    if state.products_unavailable {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    Json(state.products.clone()).into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    password: String,
    name: String,
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

fn next_user_id(state: &BackendState) -> UserId {
    let max = state.users.iter().map(|u| u.id.as_i32()).max().unwrap_or(0);
    UserId::new(max + 1)
}

async fn register(State(state): State<SharedState>, Json(body): Json<RegisterBody>) -> Response {
    let mut state = lock(&state);
    if state.users.iter().any(|u| u.email == body.email) {
        return message(StatusCode::BAD_REQUEST, "Email already registered");
    }

    let user = MockUser {
        id: next_user_id(&state),
        email: body.email,
        password: body.password,
        name: body.name,
        address: None,
    };
    let response = json!({
        "message": "User registered successfully",
        "token": user.token(),
        "user": user.profile(),
    });
    state.users.push(user);

    (StatusCode::CREATED, Json(response)).into_response()
}

async fn login(State(state): State<SharedState>, Json(body): Json<LoginBody>) -> Response {
    let state = lock(&state);
    match state
        .users
        .iter()
        .find(|u| u.email == body.email && u.password == body.password)
    {
        Some(user) => Json(json!({
            "message": "Login successful",
            "token": user.token(),
            "user": user.profile(),
        }))
        .into_response(),
        None => message(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

/// Resolve the bearer token to a user, or the 401 the backend would send.
fn authenticate(state: &BackendState, headers: &HeaderMap) -> Result<MockUser, Response> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(message(StatusCode::UNAUTHORIZED, "Token is missing"));
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.users.iter().find(|u| u.token() == token))
        .cloned()
        .ok_or_else(|| message(StatusCode::UNAUTHORIZED, "Token is invalid"))
}

async fn create_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<OrderRequest>,
) -> Response {
    let mut state = lock(&state);
    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    if body.items.is_empty() {
        return message(StatusCode::BAD_REQUEST, "Order has no items");
    }

    let mut lines = Vec::with_capacity(body.items.len());
    for item in &body.items {
        let Some(product) = state.products.iter().find(|p| p.id == item.product_id) else {
            return message(
                StatusCode::BAD_REQUEST,
                &format!("Product {} not found", item.product_id),
            );
        };
        lines.push(OrderLineSummary {
            product_name: product.name.clone(),
            quantity: item.quantity,
            price: product.price,
        });
    }

    let total_amount: Price = lines.iter().map(|l| l.price.times(l.quantity)).sum();
    let created_at = now();
    let eta = created_at + Duration::minutes(DELIVERY_MINUTES);
    let id = OrderId::new(i32::try_from(state.orders.len()).unwrap_or(i32::MAX - 1) + 1);

    state.orders.push(StoredOrder {
        user_id: user.id,
        summary: OrderSummary {
            id,
            status: OrderStatus::Pending,
            total_amount,
            delivery_address: body.delivery_address,
            estimated_delivery_time: Some(eta),
            actual_delivery_time: None,
            created_at,
            mfu_id: Some(1),
            items: lines,
        },
    });

    let confirmation = OrderConfirmation {
        order_id: Some(id),
        estimated_delivery_time: Some(eta.format("%Y-%m-%dT%H:%M:%S").to_string()),
        message: Some("Order created successfully".to_string()),
    };
    (StatusCode::CREATED, Json(confirmation)).into_response()
}

async fn list_orders(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    // Newest first
    let orders: Vec<OrderSummary> = state
        .orders
        .iter()
        .rev()
        .filter(|o| o.user_id == user.id)
        .map(|o| OrderSummary {
            mfu_id: None,
            ..o.summary.clone()
        })
        .collect();
    Json(orders).into_response()
}

async fn get_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i32>,
) -> Response {
    let state = lock(&state);
    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    state
        .orders
        .iter()
        .find(|o| o.user_id == user.id && o.summary.id == OrderId::new(id))
        .map_or_else(
            || message(StatusCode::NOT_FOUND, "Order not found"),
            |o| Json(o.summary.clone()).into_response(),
        )
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
