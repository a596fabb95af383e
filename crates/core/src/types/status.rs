//! Order lifecycle status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order status as reported by the orders API.
///
/// The backend moves an order through `pending → confirmed → preparing →
/// delivering → delivered`. Values this client does not know about
/// deserialize to [`OrderStatus::Unknown`] instead of failing the whole
/// order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivering,
    Delivered,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Delivering => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
