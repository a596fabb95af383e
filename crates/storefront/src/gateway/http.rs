//! `reqwest` implementation of [`Gateway`].

use async_trait::async_trait;
use quickcart_core::{OrderId, Product};
use reqwest::RequestBuilder;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::types::{LoginBody, RegisterBody};
use super::{
    AuthResponse, Credentials, Gateway, GatewayError, OrderConfirmation, OrderRequest,
    OrderSummary, Registration,
};
use crate::config::StorefrontConfig;

/// Maximum number of body characters written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// JSON-over-HTTP client for the QuickCart API.
///
/// The underlying `reqwest::Client` is built without a timeout; a request
/// that never completes never resolves.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    api_base: String,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    fn get(&self, path: &str, token: Option<&SecretString>) -> RequestBuilder {
        authorize(self.client.get(self.url(path)), token)
    }

    fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> RequestBuilder {
        authorize(self.client.post(self.url(path)).json(body), token)
    }

    /// Send a request and decode a JSON response.
    ///
    /// Any non-2xx status becomes [`GatewayError::Api`] carrying the body text.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();

        // Body as text first so failures can be reported verbatim
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&body),
                "QuickCart API returned non-success status"
            );
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse QuickCart API response"
            );
            GatewayError::Parse(e)
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, GatewayError> {
        let products: Vec<Product> = self.execute(self.get("/products", None)).await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, GatewayError> {
        let body = RegisterBody {
            email: &registration.email,
            password: registration.password.expose_secret(),
            name: &registration.name,
        };
        self.execute(self.post("/auth/register", &body, None)).await
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, GatewayError> {
        let body = LoginBody {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
        };
        self.execute(self.post("/auth/login", &body, None)).await
    }

    #[instrument(skip(self, token, order), fields(lines = order.items.len()))]
    async fn place_order(
        &self,
        token: &SecretString,
        order: &OrderRequest,
    ) -> Result<OrderConfirmation, GatewayError> {
        self.execute(self.post("/orders", order, Some(token))).await
    }

    #[instrument(skip(self, token))]
    async fn list_orders(&self, token: &SecretString) -> Result<Vec<OrderSummary>, GatewayError> {
        self.execute(self.get("/orders", Some(token))).await
    }

    #[instrument(skip(self, token), fields(order_id = %id))]
    async fn fetch_order(
        &self,
        token: &SecretString,
        id: OrderId,
    ) -> Result<OrderSummary, GatewayError> {
        self.execute(self.get(&format!("/orders/{id}"), Some(token)))
            .await
    }
}

/// Attach `Authorization: Bearer <token>` when a token is given.
fn authorize(request: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.expose_secret()),
        None => request,
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
