//! Product records served by the catalog API.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Icon shown for products that do not specify one.
pub const DEFAULT_ICON: &str = "fas fa-box";

/// A product in the catalog.
///
/// Products are immutable once loaded. The catalog replaces the whole list
/// on every refresh, and the cart keeps its own snapshot of each product it
/// holds, so edits on the server never reach lines already in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Category label, e.g. "Dairy & Eggs".
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Icon class reference, e.g. "fas fa-egg".
    #[serde(default)]
    pub icon: Option<String>,
}

impl Product {
    /// Description, or an empty string when the API sent none.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Icon reference, falling back to [`DEFAULT_ICON`].
    #[must_use]
    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }

    /// Case-insensitive substring match on name, description and category.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description().to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}
