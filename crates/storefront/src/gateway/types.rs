//! Request and response types for the QuickCart API.

use chrono::NaiveDateTime;
use quickcart_core::{CartLine, OrderId, OrderStatus, Price, ProductId, UserId};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// ETA shown when the order response carries none.
pub const UNKNOWN_ETA: &str = "soon";

// =============================================================================
// Auth
// =============================================================================

/// Email and password for `POST /auth/login`.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// New account details for `POST /auth/register`.
#[derive(Debug)]
pub struct Registration {
    pub email: String,
    pub password: SecretString,
    pub name: String,
}

/// Wire body for `POST /auth/login`.
#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Wire body for `POST /auth/register`.
#[derive(Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// Signed-in user as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Response of both auth endpoints.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
    #[serde(default)]
    pub message: Option<String>,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .field("message", &self.message)
            .finish()
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One product and quantity in an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id(),
            quantity: line.quantity(),
        }
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    pub delivery_address: String,
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub estimated_delivery_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl OrderConfirmation {
    /// Server-provided ETA, or [`UNKNOWN_ETA`].
    #[must_use]
    pub fn eta_label(&self) -> &str {
        self.estimated_delivery_time
            .as_deref()
            .filter(|eta| !eta.is_empty())
            .unwrap_or(UNKNOWN_ETA)
    }
}

/// A product line in a past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineSummary {
    pub product_name: String,
    pub quantity: u32,
    /// Unit price charged at order time.
    pub price: Price,
}

/// A past order from `GET /orders` or `GET /orders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    pub total_amount: Price,
    pub delivery_address: String,
    #[serde(default)]
    pub estimated_delivery_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub actual_delivery_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    /// Fulfilment unit assigned to the order (detail endpoint only).
    #[serde(default)]
    pub mfu_id: Option<i32>,
    #[serde(default)]
    pub items: Vec<OrderLineSummary>,
}

impl OrderSummary {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_debug_redacts_token() {
        let json = r#"{"message": "Login successful", "token": "eyJhbGciOiJIUzI1NiJ9.secret",
            "user": {"id": 4, "email": "sam@example.com", "name": "Sam"}}"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();

        let debug = format!("{auth:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("eyJhbGciOiJIUzI1NiJ9"));
        assert_eq!(auth.user.name, "Sam");
        assert!(auth.user.address.is_none());
    }

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            items: vec![OrderItem {
                product_id: ProductId::new(2),
                quantity: 3,
            }],
            delivery_address: "1 Elm St".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [{"product_id": 2, "quantity": 3}],
                "delivery_address": "1 Elm St"
            })
        );
    }

    #[test]
    fn test_confirmation_eta_label() {
        let confirmation: OrderConfirmation = serde_json::from_str(
            r#"{"message": "Order created successfully", "order_id": 12,
                "estimated_delivery_time": "2025-03-01T10:10:00"}"#,
        )
        .unwrap();
        assert_eq!(confirmation.eta_label(), "2025-03-01T10:10:00");
        assert_eq!(confirmation.order_id, Some(OrderId::new(12)));

        let bare: OrderConfirmation = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.eta_label(), UNKNOWN_ETA);
    }

    #[test]
    fn test_order_summary_from_backend_json() {
        let json = r#"{
            "id": 7,
            "status": "preparing",
            "total_amount": 9.469999999999999,
            "delivery_address": "123 Main St, New York, NY",
            "estimated_delivery_time": "2025-03-01T10:10:00.123456",
            "actual_delivery_time": null,
            "created_at": "2025-03-01T10:00:00",
            "items": [
                {"product_name": "Organic Bananas", "quantity": 2, "price": 2.99},
                {"product_name": "Whole Grain Bread", "quantity": 1, "price": 3.49}
            ]
        }"#;

        let order: OrderSummary = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.total_amount.display(), "$9.47");
        assert!(order.estimated_delivery_time.is_some());
        assert!(order.actual_delivery_time.is_none());
        assert!(order.mfu_id.is_none());
    }
}
