use serde::{Deserialize, Serialize};

use tillpoint_catalog::InventoryMetadataDto;
use tillpoint_core::{Entity, Money, StockId};

/// One cart line, keyed by the stock record it sells from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub stock_id: StockId,
    pub product_name: String,
    pub category: String,
    pub brand: String,
    /// Stock ceiling: the quantity may never exceed this.
    pub stock: i64,
    pub quantity: i64,
    pub unit_price: Money,
}

impl CartItem {
    pub fn new(
        stock_id: StockId,
        product_name: impl Into<String>,
        category: impl Into<String>,
        brand: impl Into<String>,
        stock: i64,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        Self {
            stock_id,
            product_name: product_name.into(),
            category: category.into(),
            brand: brand.into(),
            stock,
            quantity,
            unit_price,
        }
    }

    /// Cart line for `quantity` units of a catalog listing. The listing's
    /// available quantity becomes the stock ceiling.
    pub fn from_listing(listing: &InventoryMetadataDto, quantity: i64) -> Self {
        Self::new(
            listing.stock_id,
            listing.item_name.clone(),
            listing.category_name.clone(),
            listing.brand_name.clone(),
            listing.quantity,
            quantity,
            listing.unit_price,
        )
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    pub fn with_quantity(&self, quantity: i64) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

impl Entity for CartItem {
    type Id = StockId;

    fn id(&self) -> &Self::Id {
        &self.stock_id
    }
}
