//! Terminal rendering of storefront views.

use std::io::{self, Stdout, Write};

use askama::Template;
use quickcart_storefront::Frontend;
use quickcart_storefront::view::{CartView, ProductGridView};

/// [`Frontend`] that writes rendered views to a terminal.
///
/// Grid changes are printed in full. Cart changes print a one-line summary;
/// the full cart is printed on request with [`TerminalFrontend::show_cart`].
pub struct TerminalFrontend<W> {
    out: W,
    cart: CartView,
    muted: bool,
}

impl TerminalFrontend<Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalFrontend<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cart: CartView::empty(),
            muted: false,
        }
    }

    /// Stop printing change notifications (views are still tracked).
    pub const fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Print the full cart.
    pub fn show_cart(&mut self) {
        let rendered = self.cart.render();
        self.print_rendered(rendered);
    }

    /// Print any rendered template, or the render error.
    pub fn print_rendered(&mut self, rendered: askama::Result<String>) {
        match rendered {
            Ok(text) => self.line(text.trim_end()),
            Err(e) => {
                tracing::error!(error = %e, "Template render failed");
                self.line(&format!("Could not display this view: {e}"));
            }
        }
    }

    /// Print an error from a failed operation.
    pub fn error(&mut self, error: &dyn std::error::Error) {
        self.line(&format!("Error: {error}"));
    }

    /// Print `text` without a newline.
    pub fn prompt(&mut self, text: &str) {
        if let Err(e) = write!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %e, "Terminal write failed");
        }
    }

    /// Print a plain line.
    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %e, "Terminal write failed");
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Frontend for TerminalFrontend<W> {
    fn catalog_changed(&mut self, grid: &ProductGridView) {
        if !self.muted {
            self.print_rendered(grid.render());
        }
    }

    fn cart_changed(&mut self, cart: &CartView) {
        self.cart = cart.clone();
        if !self.muted {
            let summary = format!("Cart: {} items, {}", cart.item_count, cart.subtotal);
            self.line(&summary);
        }
    }

    fn notify(&mut self, message: &str) {
        self.line(&format!("* {message}"));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quickcart_core::Cart;
    use quickcart_core::catalog::sample_products;

    use super::*;

    fn output(frontend: TerminalFrontend<Vec<u8>>) -> String {
        String::from_utf8(frontend.into_inner()).unwrap()
    }

    #[test]
    fn test_cart_change_prints_summary_only() {
        let products = sample_products();
        let mut cart = Cart::new();
        cart.add(&products[0]);
        cart.add(&products[1]);

        let mut frontend = TerminalFrontend::new(Vec::new());
        frontend.cart_changed(&CartView::from(&cart));
        let text = output(frontend);

        assert_eq!(text, "Cart: 2 items, $6.48\n");
    }

    #[test]
    fn test_show_cart_prints_lines() {
        let products = sample_products();
        let mut cart = Cart::new();
        cart.add(&products[5]);

        let mut frontend = TerminalFrontend::new(Vec::new());
        frontend.set_muted(true);
        frontend.cart_changed(&CartView::from(&cart));
        frontend.show_cart();
        let text = output(frontend);

        assert!(text.contains("Dark Chocolate"));
        assert!(text.contains("$3.99"));
        assert!(!text.contains("Cart: 1 items"));
    }

    #[test]
    fn test_grid_and_notifications() {
        let mut frontend = TerminalFrontend::new(Vec::new());
        frontend.catalog_changed(&ProductGridView::Loading);
        frontend.notify("Logged out.");
        let text = output(frontend);

        assert!(text.contains("Loading products..."));
        assert!(text.contains("* Logged out."));
    }

    #[test]
    fn test_muted_grid_is_silent() {
        let mut frontend = TerminalFrontend::new(Vec::new());
        frontend.set_muted(true);
        frontend.catalog_changed(&ProductGridView::NoMatches);
        assert!(output(frontend).is_empty());
    }
}
