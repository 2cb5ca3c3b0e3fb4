//! In-memory inventory service for tests/dev.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::dto::{InventoryMetadataDto, ItemBrandDto, ItemCategoryDto};
use crate::service::{InventoryError, InventoryService};

/// Fixed catalog held in memory.
///
/// Can be flipped into a failing mode to exercise error paths, and can be
/// slowed down to exercise "fetch already in flight" handling.
#[derive(Debug, Default)]
pub struct InMemoryInventoryService {
    brands: Vec<ItemBrandDto>,
    categories: Vec<ItemCategoryDto>,
    items: Vec<InventoryMetadataDto>,
    failure: RwLock<Option<String>>,
    delay: Option<Duration>,
    item_fetches: AtomicUsize,
}

impl InMemoryInventoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brands(mut self, brands: Vec<ItemBrandDto>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_categories(mut self, categories: Vec<ItemCategoryDto>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_items(mut self, items: Vec<InventoryMetadataDto>) -> Self {
        self.items = items;
        self
    }

    /// Sleep this long inside `get_all_items`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every call fail with `message` (or succeed again with `None`).
    pub fn set_failure(&self, message: Option<String>) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = message;
        }
    }

    /// How many times `get_all_items` has been called.
    pub fn item_fetches(&self) -> usize {
        self.item_fetches.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), InventoryError> {
        let failure = self
            .failure
            .read()
            .map_err(|_| InventoryError::Unavailable("failure flag poisoned".to_string()))?;
        match failure.as_ref() {
            Some(message) => Err(InventoryError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl InventoryService for InMemoryInventoryService {
    fn show_all_brands(&self) -> Result<Vec<ItemBrandDto>, InventoryError> {
        self.check_failure()?;
        Ok(self.brands.clone())
    }

    fn show_all_categories(&self) -> Result<Vec<ItemCategoryDto>, InventoryError> {
        self.check_failure()?;
        Ok(self.categories.clone())
    }

    fn get_all_items(&self) -> Result<Vec<InventoryMetadataDto>, InventoryError> {
        self.item_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.check_failure()?;
        Ok(self.items.clone())
    }
}
