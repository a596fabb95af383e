//! Remote gateway to the QuickCart API.
//!
//! # Architecture
//!
//! - [`Gateway`] is the seam between the storefront controller and the
//!   network; the controller only ever talks to this trait
//! - [`HttpGateway`] implements it with `reqwest`, sending JSON with
//!   `Content-Type: application/json` to a configured base URL
//! - Each call is a single request: no retry, no timeout, no cancellation
//!
//! # Endpoints
//!
//! - `GET /products` - full product list
//! - `POST /auth/register`, `POST /auth/login` - token + user profile
//! - `POST /orders` - place an order (Bearer token)
//! - `GET /orders`, `GET /orders/{id}` - order history (Bearer token)
//!
//! # Example
//!
//! ```rust,ignore
//! use quickcart_storefront::gateway::{Gateway, HttpGateway};
//!
//! let gateway = HttpGateway::new(&config)?;
//! let products = gateway.fetch_products().await?;
//! ```

mod http;
pub mod types;

pub use http::HttpGateway;
pub use types::*;

use async_trait::async_trait;
use quickcart_core::{OrderId, Product};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur when talking to the QuickCart API.
///
/// The `Display` output of `Http` and `Api` is the transport error text or
/// the response body, unmodified, so it can be shown to the user as-is.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure (connection refused, DNS, TLS, ...).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the raw response body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GatewayError {
    /// HTTP status of an API error, if there was a response at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }
}

/// Operations the storefront needs from the remote API.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch the full product list.
    async fn fetch_products(&self) -> Result<Vec<Product>, GatewayError>;

    /// Create an account and sign in.
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, GatewayError>;

    /// Sign in with email and password.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, GatewayError>;

    /// Submit an order on behalf of the token holder.
    async fn place_order(
        &self,
        token: &SecretString,
        order: &OrderRequest,
    ) -> Result<OrderConfirmation, GatewayError>;

    /// Orders of the token holder, newest first.
    async fn list_orders(&self, token: &SecretString) -> Result<Vec<OrderSummary>, GatewayError>;

    /// A single order of the token holder.
    async fn fetch_order(
        &self,
        token: &SecretString,
        id: OrderId,
    ) -> Result<OrderSummary, GatewayError>;
}
