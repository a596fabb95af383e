//! Display projections of the catalog, the cart and past orders.
//!
//! Views are plain data with every price already formatted, so templates
//! never do arithmetic. Each view renders to text through an Askama
//! template in `templates/`.

use askama::Template;
use chrono::NaiveDateTime;
use quickcart_core::{Cart, CartLine, Price, Product};

use crate::gateway::{OrderLineSummary, OrderSummary};

pub const LOADING_MESSAGE: &str = "Loading products...";
pub const NO_MATCHES_MESSAGE: &str = "No products found matching your search";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load products.";
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";
pub const NO_ORDERS_MESSAGE: &str = "You have no orders yet";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// =============================================================================
// Product grid
// =============================================================================

/// One product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub description: String,
    pub icon: String,
    pub price: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description().to_string(),
            icon: product.icon().to_string(),
            price: product.price.display(),
        }
    }
}

/// What the product grid shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductGridView {
    /// A catalog fetch is in flight.
    Loading,
    /// Cards in catalog order.
    Products(Vec<ProductCardView>),
    /// A search or filter matched nothing.
    NoMatches,
    /// The last catalog fetch failed with this message.
    Failed(String),
}

impl ProductGridView {
    /// The full catalog, even when empty.
    #[must_use]
    pub fn all(products: &[Product]) -> Self {
        Self::Products(products.iter().map(ProductCardView::from).collect())
    }

    /// A search or filter result; empty results show the no-match message.
    #[must_use]
    pub fn filtered(products: &[&Product]) -> Self {
        if products.is_empty() {
            Self::NoMatches
        } else {
            Self::Products(products.iter().copied().map(ProductCardView::from).collect())
        }
    }

    /// Cards currently shown.
    #[must_use]
    pub fn cards(&self) -> &[ProductCardView] {
        match self {
            Self::Products(cards) => cards,
            _ => &[],
        }
    }

    /// Status line shown instead of cards, if any.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Products(_) => None,
            Self::Loading => Some(LOADING_MESSAGE.to_string()),
            Self::NoMatches => Some(NO_MATCHES_MESSAGE.to_string()),
            Self::Failed(error) => Some(format!("{LOAD_FAILED_MESSAGE}\n{error}")),
        }
    }

    /// Render as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render(&self) -> askama::Result<String> {
        let notice = self.notice().unwrap_or_default();
        ProductGridTemplate {
            notice: &notice,
            products: self.cards(),
        }
        .render()
    }
}

#[derive(Template)]
#[template(path = "product_grid.txt")]
struct ProductGridTemplate<'a> {
    notice: &'a str,
    products: &'a [ProductCardView],
}

// =============================================================================
// Cart
// =============================================================================

/// One cart line for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product_id().as_i32(),
            name: line.product.name.clone(),
            icon: line.product.icon().to_string(),
            quantity: line.quantity(),
            price: line.product.price.display(),
            line_price: line.line_total().display(),
        }
    }
}

/// Cart panel display data.
#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "cart.txt")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Price::ZERO.display(),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: totals.total_price.display(),
            item_count: totals.item_count,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// One row of the order history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRowView {
    pub id: i32,
    pub status: String,
    pub placed_at: String,
    pub item_count: u64,
    pub total: String,
}

impl From<&OrderSummary> for OrderRowView {
    fn from(order: &OrderSummary) -> Self {
        Self {
            id: order.id.as_i32(),
            status: order.status.label().to_string(),
            placed_at: format_timestamp(order.created_at),
            item_count: order.item_count(),
            total: order.total_amount.display(),
        }
    }
}

/// Order history list.
#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "orders.txt")]
pub struct OrderListView {
    pub orders: Vec<OrderRowView>,
    pub empty_message: &'static str,
}

impl From<&[OrderSummary]> for OrderListView {
    fn from(orders: &[OrderSummary]) -> Self {
        Self {
            orders: orders.iter().map(OrderRowView::from).collect(),
            empty_message: NO_ORDERS_MESSAGE,
        }
    }
}

/// One product line of a past order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&OrderLineSummary> for OrderLineView {
    fn from(line: &OrderLineSummary) -> Self {
        Self {
            name: line.product_name.clone(),
            quantity: line.quantity,
            price: line.price.display(),
            line_price: line.price.times(line.quantity).display(),
        }
    }
}

/// A single past order with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Template)]
#[template(path = "order_detail.txt")]
pub struct OrderDetailView {
    pub id: i32,
    pub status: String,
    pub placed_at: String,
    pub delivery_address: String,
    /// Expected or actual delivery time, already labelled.
    pub delivery: String,
    pub total: String,
    pub items: Vec<OrderLineView>,
}

impl From<&OrderSummary> for OrderDetailView {
    fn from(order: &OrderSummary) -> Self {
        let delivery = match (order.actual_delivery_time, order.estimated_delivery_time) {
            (Some(at), _) => format!("Delivered {}", format_timestamp(at)),
            (None, Some(eta)) => format!("ETA {}", format_timestamp(eta)),
            (None, None) => "ETA unknown".to_string(),
        };

        Self {
            id: order.id.as_i32(),
            status: order.status.label().to_string(),
            placed_at: format_timestamp(order.created_at),
            delivery_address: order.delivery_address.clone(),
            delivery,
            total: order.total_amount.display(),
            items: order.items.iter().map(OrderLineView::from).collect(),
        }
    }
}

fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quickcart_core::catalog::{Catalog, sample_products};
    use quickcart_core::{OrderId, OrderStatus};

    use super::*;

    fn order() -> OrderSummary {
        serde_json::from_str(
            r#"{
                "id": 31,
                "status": "delivering",
                "total_amount": 9.47,
                "delivery_address": "9 Oak Ave",
                "estimated_delivery_time": "2025-03-01T10:10:00",
                "created_at": "2025-03-01T10:00:00",
                "items": [
                    {"product_name": "Organic Bananas", "quantity": 2, "price": 2.99},
                    {"product_name": "Whole Grain Bread", "quantity": 1, "price": 3.49}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_grid_lists_every_product() {
        let products = sample_products();
        let grid = ProductGridView::all(&products);
        assert_eq!(grid.cards().len(), 8);

        let text = grid.render().unwrap();
        assert!(text.contains("Organic Bananas"));
        assert!(text.contains("$24.99"));
        assert!(!text.contains(NO_MATCHES_MESSAGE));
    }

    #[test]
    fn test_grid_empty_filter_shows_no_matches() {
        let grid = ProductGridView::filtered(&[]);
        assert_eq!(grid, ProductGridView::NoMatches);
        assert!(grid.render().unwrap().contains(NO_MATCHES_MESSAGE));
    }

    #[test]
    fn test_grid_search_result() {
        let catalog = Catalog::with_products(sample_products());
        let grid = ProductGridView::filtered(&catalog.search("choc"));
        let text = grid.render().unwrap();
        assert!(text.contains("Dark Chocolate"));
        assert!(!text.contains("Organic Bananas"));
    }

    #[test]
    fn test_grid_loading_and_failure() {
        assert!(ProductGridView::Loading.render().unwrap().contains(LOADING_MESSAGE));

        let text = ProductGridView::Failed("connection refused".to_string())
            .render()
            .unwrap();
        assert!(text.contains(LOAD_FAILED_MESSAGE));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert_eq!(view, CartView::empty());
        assert_eq!(view.subtotal, "$0.00");

        let text = view.render().unwrap();
        assert!(text.contains(EMPTY_CART_MESSAGE));
        assert!(text.contains("$0.00"));
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let products = sample_products();
        let mut cart = Cart::new();
        cart.add(&products[0]);
        cart.add(&products[0]);
        cart.add(&products[1]);

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "$9.47");
        assert_eq!(view.items[0].line_price, "$5.98");
        assert_eq!(view.items[1].price, "$3.49");

        let text = view.render().unwrap();
        assert!(text.contains("Organic Bananas"));
        assert!(text.contains("$9.47"));
        assert!(!text.contains(EMPTY_CART_MESSAGE));
    }

    #[test]
    fn test_order_list_view() {
        let orders = vec![order()];
        let view = OrderListView::from(orders.as_slice());
        assert_eq!(view.orders[0].id, 31);
        assert_eq!(view.orders[0].status, OrderStatus::Delivering.label());
        assert_eq!(view.orders[0].placed_at, "2025-03-01 10:00");

        let text = view.render().unwrap();
        assert!(text.contains("#31"));
        assert!(text.contains("$9.47"));

        let empty = OrderListView::from(&[] as &[OrderSummary]);
        assert!(empty.render().unwrap().contains(NO_ORDERS_MESSAGE));
    }

    #[test]
    fn test_order_detail_view() {
        let order = order();
        assert_eq!(order.id, OrderId::new(31));

        let view = OrderDetailView::from(&order);
        assert_eq!(view.delivery, "ETA 2025-03-01 10:10");
        assert_eq!(view.items[0].line_price, "$5.98");

        let text = view.render().unwrap();
        assert!(text.contains("9 Oak Ave"));
        assert!(text.contains("Whole Grain Bread"));
    }
}
