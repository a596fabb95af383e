//! One-shot order history.

use std::io::Write;

use askama::Template;
use quickcart_core::OrderId;
use quickcart_storefront::view::{OrderDetailView, OrderListView};
use quickcart_storefront::{Gateway, Storefront};

use crate::terminal::TerminalFrontend;

/// Print past orders of the saved session, or a single order.
///
/// # Errors
///
/// Returns `StorefrontError::NotLoggedIn` if no token is saved, or the
/// gateway error unchanged.
pub async fn show<G, W>(
    storefront: &mut Storefront<G, TerminalFrontend<W>>,
    id: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>>
where
    G: Gateway,
    W: Write,
{
    let rendered = match id {
        Some(id) => {
            let order = storefront.order_details(OrderId::new(id)).await?;
            OrderDetailView::from(&order).render()
        }
        None => {
            let orders = storefront.order_history().await?;
            OrderListView::from(orders.as_slice()).render()
        }
    };

    storefront.frontend_mut().print_rendered(rendered);
    Ok(())
}
