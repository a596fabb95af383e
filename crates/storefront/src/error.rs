//! Unified error handling with Sentry integration.
//!
//! Each concern has its own error enum; [`StorefrontError`] wraps them for
//! callers that just want one type. The `Display` text of every variant is
//! suitable for showing to the user unchanged.

use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::session::SessionError;
use crate::storage::StorageError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Sign-in or registration failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Token store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout was rejected locally or by the API.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// An operation needing a token was attempted as a guest.
    #[error("Please login to view your orders.")]
    NotLoggedIn,
}

impl StorefrontError {
    /// Whether this is a failure worth reporting to Sentry.
    ///
    /// Validation failures and API rejections are expected; transport, parse,
    /// config and storage failures are not.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Storage(_)
                | Self::Gateway(GatewayError::Http(_) | GatewayError::Parse(_))
        )
    }

    /// Report unexpected failures to Sentry.
    pub fn capture(&self) {
        if self.is_unexpected() {
            let event_id = sentry::capture_error(self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Storefront error");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a user action.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::from(*value));
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_display_user_facing_text() {
        assert_eq!(
            StorefrontError::NotLoggedIn.to_string(),
            "Please login to view your orders."
        );

        let err = StorefrontError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Cart is empty.");

        let err = StorefrontError::from(SessionError::from(GatewayError::Api {
            status: 401,
            message: "Invalid credentials".to_string(),
        }));
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_config_error_is_prefixed() {
        let err = StorefrontError::from(ConfigError::InvalidEnvVar(
            "QUICKCART_API_BASE".to_string(),
            "relative URL without a base".to_string(),
        ));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_only_unexpected_errors_are_reported() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(StorefrontError::from(GatewayError::Parse(parse)).is_unexpected());
        assert!(
            StorefrontError::from(ConfigError::InvalidEnvVar(
                "QUICKCART_API_BASE".to_string(),
                "bad".to_string(),
            ))
            .is_unexpected()
        );

        let rejected = GatewayError::Api {
            status: 500,
            message: "Database unavailable".to_string(),
        };
        assert!(!StorefrontError::from(rejected).is_unexpected());
        assert!(!StorefrontError::from(CheckoutError::EmptyCart).is_unexpected());
        assert!(!StorefrontError::NotLoggedIn.is_unexpected());
    }

    #[test]
    fn test_sentry_helpers_without_client() {
        // No client bound: these must be no-ops
        set_sentry_user(&42, Some("a@example.com"));
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
        add_breadcrumb("checkout", "Started", None);
        clear_sentry_user();
        StorefrontError::NotLoggedIn.capture();
    }
}
