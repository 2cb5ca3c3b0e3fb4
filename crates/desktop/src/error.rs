use thiserror::Error;

use tillpoint_cart::CartError;
use tillpoint_catalog::InventoryError;
use tillpoint_core::StockId;

pub const LOAD_FAILED_TITLE: &str = "Failed to load data";

#[derive(Debug, Error)]
pub enum ShopError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Catalog(#[from] InventoryError),

    #[error("stock {0} is not in the catalog")]
    UnknownItem(StockId),

    #[error("quantity must be between 1 and {max} (got {requested})")]
    QuantityOutOfRange { requested: i64, max: i64 },

    #[error("the cart is empty")]
    EmptyCart,
}

/// A blocking, user-facing message (what a desktop front-end shows as a
/// modal dialog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl ShopError {
    pub fn title(&self) -> &'static str {
        match self {
            ShopError::Cart(err) => err.title(),
            ShopError::Catalog(_) => LOAD_FAILED_TITLE,
            ShopError::UnknownItem(_) => "Unknown item",
            ShopError::QuantityOutOfRange { .. } => "Invalid quantity",
            ShopError::EmptyCart => "Cart is empty",
        }
    }

    pub fn notice(&self) -> Notice {
        Notice::new(self.title(), self.to_string())
    }
}
