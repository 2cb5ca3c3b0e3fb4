use serde::{Deserialize, Serialize};

use tillpoint_core::{BrandId, CategoryId, DomainError, DomainResult, Money, StockId};

/// Image shown for listings that do not carry their own.
pub const DEFAULT_DISPLAY_IMAGE: &str = "placeholder-product.png";

/// Brand record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBrandDto {
    pub id: BrandId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCategoryDto {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A sellable stock record as listed by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryMetadataDto {
    pub stock_id: StockId,
    pub item_name: String,
    pub category_name: String,
    pub brand_name: String,
    /// Units currently available; this becomes the cart's stock ceiling.
    pub quantity: i64,
    pub unit_price: Money,
    #[serde(default)]
    pub display_image: Option<String>,
}

impl InventoryMetadataDto {
    pub fn display_image_or_default(&self) -> &str {
        match self.display_image.as_deref() {
            Some(image) if !image.trim().is_empty() => image,
            _ => DEFAULT_DISPLAY_IMAGE,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Reject records the shop cannot sell from.
    pub fn validate(&self) -> DomainResult<()> {
        if self.item_name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "stock {}: item_name cannot be empty",
                self.stock_id
            )));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation(format!(
                "stock {}: quantity cannot be negative",
                self.stock_id
            )));
        }
        Ok(())
    }
}
