//! Inventory service backed by a JSON catalog file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dto::{InventoryMetadataDto, ItemBrandDto, ItemCategoryDto};
use crate::service::{InventoryError, InventoryService};

/// On-disk catalog layout.
///
/// ```json
/// { "brands": [...], "categories": [...], "items": [...] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub brands: Vec<ItemBrandDto>,
    #[serde(default)]
    pub categories: Vec<ItemCategoryDto>,
    #[serde(default)]
    pub items: Vec<InventoryMetadataDto>,
}

/// Reads the catalog file on every call, so edits show up on the next refresh.
#[derive(Debug, Clone)]
pub struct JsonFileInventoryService {
    path: PathBuf,
}

impl JsonFileInventoryService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CatalogDocument, InventoryError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| InventoryError::Io {
            path: self.path.clone(),
            source,
        })?;

        let document: CatalogDocument =
            serde_json::from_str(&raw).map_err(|source| InventoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        for item in &document.items {
            item.validate()?;
        }

        Ok(document)
    }
}

impl InventoryService for JsonFileInventoryService {
    fn show_all_brands(&self) -> Result<Vec<ItemBrandDto>, InventoryError> {
        Ok(self.load()?.brands)
    }

    fn show_all_categories(&self) -> Result<Vec<ItemCategoryDto>, InventoryError> {
        Ok(self.load()?.categories)
    }

    fn get_all_items(&self) -> Result<Vec<InventoryMetadataDto>, InventoryError> {
        let items = self.load()?.items;
        tracing::debug!(path = %self.path.display(), count = items.len(), "loaded catalog items");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tillpoint_core::{Money, StockId};

    const CATALOG: &str = r#"{
        "brands": [{ "id": 1, "name": "Acer" }, { "id": 2, "name": "Logitech" }],
        "categories": [{ "id": 1, "name": "Laptops", "description": "Portable computers" }],
        "items": [
            {
                "stock_id": 100,
                "item_name": "Acer Nitro 5 Laptop",
                "category_name": "Laptops",
                "brand_name": "Acer",
                "quantity": 5,
                "unit_price": 5499900,
                "display_image": "nitro.png"
            }
        ]
    }"#;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_all_three_lists() {
        let file = write_catalog(CATALOG);
        let service = JsonFileInventoryService::new(file.path());

        assert_eq!(service.show_all_brands().unwrap().len(), 2);
        let categories = service.show_all_categories().unwrap();
        assert_eq!(categories[0].description.as_deref(), Some("Portable computers"));

        let items = service.get_all_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].stock_id, StockId::new(100));
        assert_eq!(items[0].unit_price, Money::new(54_999, 0));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = JsonFileInventoryService::new(dir.path().join("nope.json"));

        assert!(matches!(service.get_all_items(), Err(InventoryError::Io { .. })));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_catalog("{ not json");
        let service = JsonFileInventoryService::new(file.path());

        assert!(matches!(service.show_all_brands(), Err(InventoryError::Parse { .. })));
    }

    #[test]
    fn negative_stock_records_are_rejected() {
        let file = write_catalog(
            r#"{ "items": [{
                "stock_id": 1, "item_name": "Broken", "category_name": "X",
                "brand_name": "Y", "quantity": -3, "unit_price": 100
            }] }"#,
        );
        let service = JsonFileInventoryService::new(file.path());

        assert!(matches!(service.get_all_items(), Err(InventoryError::Invalid(_))));
    }
}
