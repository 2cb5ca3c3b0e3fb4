//! Inventory catalog: read-only records fetched from the inventory service,
//! the service seam itself, and catalog search.
//!
//! Nothing in here mutates inventory; the point-of-sale screen only reads it.

pub mod dto;
pub mod in_memory;
pub mod json_file;
pub mod search;
pub mod service;

pub use dto::{InventoryMetadataDto, ItemBrandDto, ItemCategoryDto};
pub use in_memory::InMemoryInventoryService;
pub use json_file::{CatalogDocument, JsonFileInventoryService};
pub use search::{CatalogQuery, FilterKind, DEFAULT_SIMILARITY_THRESHOLD, filter_items, similarity};
pub use service::{CatalogSnapshot, InventoryError, InventoryService, fetch_snapshot};
