use thiserror::Error;

use tillpoint_core::StockId;

/// Why a cart command was rejected.
///
/// Every variant is recoverable: the cart is left exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity for stock {stock_id} cannot go below zero (attempted {attempted})")]
    NegativeQuantity { stock_id: StockId, attempted: i64 },

    #[error("insufficient stock for {stock_id}: requested {attempted}, only {available} available")]
    InsufficientStock {
        stock_id: StockId,
        attempted: i64,
        available: i64,
    },

    #[error("stock {0} is not in the cart")]
    ItemNotFound(StockId),

    #[error("stock {0} is already in the cart")]
    DuplicateItem(StockId),
}

impl CartError {
    /// Short title for a user-facing error dialog.
    pub fn title(&self) -> &'static str {
        match self {
            CartError::NegativeQuantity { .. } => "Negative quantity",
            CartError::InsufficientStock { .. } => "Insufficient stock",
            CartError::ItemNotFound(_) => "Item not in cart",
            CartError::DuplicateItem(_) => "Item already in cart",
        }
    }
}
