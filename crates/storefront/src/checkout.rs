//! Checkout: precondition checks, order assembly and the submission state.
//!
//! A checkout moves `Idle -> Submitting -> Resolved`. The preconditions are
//! checked locally before any network call: the session must hold a token
//! and a profile, and the cart must not be empty. Login is checked first.

use quickcart_core::Cart;
use secrecy::SecretString;
use thiserror::Error;

use crate::gateway::{GatewayError, OrderConfirmation, OrderItem, OrderRequest};
use crate::session::Session;

/// Reasons a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Please login to place an order.")]
    NotLoggedIn,

    #[error("Cart is empty.")]
    EmptyCart,

    #[error("Order failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// How a submitted checkout ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Placed(OrderConfirmation),
    Failed(String),
}

/// Where the current checkout stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Resolved(CheckoutOutcome),
}

/// An order ready to send, with the token to send it under.
#[derive(Debug)]
pub struct PreparedOrder<'a> {
    pub token: &'a SecretString,
    pub request: OrderRequest,
    /// True when the profile had no address and the fallback was used.
    pub used_fallback_address: bool,
}

/// Check the preconditions and build the order request.
///
/// # Errors
///
/// Returns `CheckoutError::NotLoggedIn` if the session lacks a token or a
/// profile, and `CheckoutError::EmptyCart` if there is nothing to order.
pub fn prepare_order<'a>(
    session: &'a Session,
    cart: &Cart,
    fallback_address: &str,
) -> Result<PreparedOrder<'a>, CheckoutError> {
    let (Some(token), Some(user)) = (session.token(), session.user()) else {
        return Err(CheckoutError::NotLoggedIn);
    };

    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let profile_address = user
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());

    let delivery_address = if let Some(address) = profile_address {
        address.to_string()
    } else {
        tracing::warn!(
            user_id = %user.id,
            fallback = fallback_address,
            "Profile has no delivery address, using fallback"
        );
        fallback_address.to_string()
    };

    Ok(PreparedOrder {
        token,
        request: OrderRequest {
            items: cart.lines().iter().map(OrderItem::from).collect(),
            delivery_address,
        },
        used_fallback_address: profile_address.is_none(),
    })
}
