//! Shared types between the shop model and its front-ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tillpoint_catalog::{CatalogSnapshot, FilterKind, InventoryMetadataDto};
use tillpoint_core::{CartId, Money, StockId};

/// What the product browser currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    /// A catalog fetch is in flight.
    Loading,
    /// Listings matching the current query, in catalog order.
    Ready(Vec<InventoryMetadataDto>),
    /// The catalog loaded but nothing matches the current query.
    NoResults,
    /// The last fetch failed; the message is user-facing.
    Failed(String),
}

impl CatalogView {
    pub fn items(&self) -> &[InventoryMetadataDto] {
        match self {
            CatalogView::Ready(items) => items,
            _ => &[],
        }
    }
}

/// A brand or category checkbox in the filter menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub kind: FilterKind,
    pub name: String,
    pub selected: bool,
}

/// Messages delivered to the shop's owning loop by background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopMessage {
    CatalogLoaded(CatalogSnapshot),
    CatalogFailed(String),
    /// The search debounce window elapsed; recompute the catalog view.
    SearchSettled,
}

/// Answer to "the cart is not empty, save it?" when closing the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    /// Keep the cart as it is and close.
    Save,
    /// Clear the cart and close.
    Discard,
    /// Stay on the screen.
    Cancel,
}

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub stock_id: StockId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Snapshot of the cart handed to whatever completes the sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub id: Uuid,
    pub cart_id: CartId,
    pub lines: Vec<CheckoutLine>,
    pub total_quantity: i64,
    pub total_price: Money,
    pub requested_at: DateTime<Utc>,
}
