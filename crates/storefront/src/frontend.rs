//! Render adapter between the controller and a display surface.

use crate::view::{CartView, ProductGridView};

/// Display surface notified after every state change.
///
/// The controller calls these synchronously; implementations should only
/// draw, never call back into the controller.
pub trait Frontend {
    /// The product grid changed.
    fn catalog_changed(&mut self, grid: &ProductGridView);

    /// The cart changed.
    fn cart_changed(&mut self, cart: &CartView);

    /// Show a short, transient message to the user.
    fn notify(&mut self, message: &str);
}

/// Frontend that keeps everything it was shown.
#[derive(Debug, Default)]
pub struct RecordingFrontend {
    pub grids: Vec<ProductGridView>,
    pub carts: Vec<CartView>,
    pub notifications: Vec<String>,
}

impl RecordingFrontend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_grid(&self) -> Option<&ProductGridView> {
        self.grids.last()
    }

    #[must_use]
    pub fn last_cart(&self) -> Option<&CartView> {
        self.carts.last()
    }

    #[must_use]
    pub fn last_notification(&self) -> Option<&str> {
        self.notifications.last().map(String::as_str)
    }
}

impl Frontend for RecordingFrontend {
    fn catalog_changed(&mut self, grid: &ProductGridView) {
        self.grids.push(grid.clone());
    }

    fn cart_changed(&mut self, cart: &CartView) {
        self.carts.push(cart.clone());
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}
