//! Shopping cart state.
//!
//! The cart is an ordered list of lines, one per product, in the order the
//! products were first added. Each line owns a snapshot of the product taken
//! when it was added. Quantities are always at least one: any change that
//! would bring a line to zero or below removes the line instead.
//!
//! Operations on IDs the cart does not hold are silent no-ops. Each mutator
//! reports whether it changed anything so the caller can decide whether to
//! repaint.

use crate::product::Product;
use crate::types::{Price, ProductId};

/// One product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Product fields as they were when the line was created.
    pub product: Product,
    quantity: u32,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity, full precision.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Item count and price derived from the cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of all line quantities.
    pub item_count: u64,
    /// Sum of price × quantity over all lines, unrounded.
    pub total_price: Price,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == id)
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// holding a snapshot of `product` with quantity 1.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id() == product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine::new(product.clone()));
        }
    }

    /// Remove the line for `id`. Returns `false` if there was none.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id() != id);
        self.lines.len() != before
    }

    /// Adjust the quantity of the line for `id` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line. Returns `false`
    /// if there was no line for `id`.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) -> bool {
        let Some(index) = self.lines.iter().position(|l| l.product_id() == id) else {
            return false;
        };

        let Some(line) = self.lines.get_mut(index) else {
            return false;
        };
        let updated = i64::from(line.quantity).saturating_add(delta);

        if updated <= 0 {
            self.lines.remove(index);
        } else {
            line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Item count and total price.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.lines.iter().map(|l| u64::from(l.quantity)).sum(),
            total_price: self.lines.iter().map(CartLine::line_total).sum(),
        }
    }
}
