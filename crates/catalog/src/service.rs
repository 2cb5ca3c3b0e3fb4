//! The inventory service seam.

use std::path::PathBuf;

use thiserror::Error;

use tillpoint_core::DomainError;

use crate::dto::{InventoryMetadataDto, ItemBrandDto, ItemCategoryDto};

/// Failure while fetching catalog data.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("inventory service unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog record: {0}")]
    Invalid(#[from] DomainError),
}

/// Read-only access to the inventory catalog.
///
/// Implementations may block (disk, network); callers run them off the UI
/// thread.
pub trait InventoryService: Send + Sync {
    fn show_all_brands(&self) -> Result<Vec<ItemBrandDto>, InventoryError>;

    fn show_all_categories(&self) -> Result<Vec<ItemCategoryDto>, InventoryError>;

    fn get_all_items(&self) -> Result<Vec<InventoryMetadataDto>, InventoryError>;
}

/// Everything the shop screen needs from one catalog load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub brands: Vec<ItemBrandDto>,
    pub categories: Vec<ItemCategoryDto>,
    pub items: Vec<InventoryMetadataDto>,
}

impl CatalogSnapshot {
    pub fn find(&self, stock_id: tillpoint_core::StockId) -> Option<&InventoryMetadataDto> {
        self.items.iter().find(|item| item.stock_id == stock_id)
    }
}

/// Fetch brands, categories and items, in that order, stopping at the first
/// failure.
pub fn fetch_snapshot<S>(service: &S) -> Result<CatalogSnapshot, InventoryError>
where
    S: InventoryService + ?Sized,
{
    let brands = service.show_all_brands()?;
    let categories = service.show_all_categories()?;
    let items = service.get_all_items()?;

    tracing::debug!(
        brands = brands.len(),
        categories = categories.len(),
        items = items.len(),
        "catalog snapshot fetched"
    );

    Ok(CatalogSnapshot {
        brands,
        categories,
        items,
    })
}
