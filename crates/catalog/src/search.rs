//! Catalog search: fuzzy name matching plus brand/category filters.

use std::collections::BTreeSet;

use crate::dto::InventoryMetadataDto;

/// Minimum Jaro-Winkler similarity for a name to count as a match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Which filter list a selection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Brand,
    Category,
}

/// Current search text and filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub text: String,
    pub brands: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Select or deselect `name` in the given filter list.
    pub fn set_filter(&mut self, kind: FilterKind, name: &str, selected: bool) {
        let set = match kind {
            FilterKind::Brand => &mut self.brands,
            FilterKind::Category => &mut self.categories,
        };
        if selected {
            set.insert(name.to_string());
        } else {
            set.remove(name);
        }
    }

    pub fn is_selected(&self, kind: FilterKind, name: &str) -> bool {
        match kind {
            FilterKind::Brand => self.brands.contains(name),
            FilterKind::Category => self.categories.contains(name),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.text.is_empty() && self.brands.is_empty() && self.categories.is_empty()
    }
}

/// Jaro-Winkler similarity in `[0, 1]`.
pub fn similarity(item_name: &str, text: &str) -> f64 {
    strsim::jaro_winkler(item_name, text)
}

/// Items matching `query`, in catalog order.
///
/// An empty text matches every name; an empty brand or category selection
/// matches every brand or category.
pub fn filter_items<'a>(
    items: &'a [InventoryMetadataDto],
    query: &CatalogQuery,
    threshold: f64,
) -> Vec<&'a InventoryMetadataDto> {
    if query.is_unfiltered() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| {
            let name_matches =
                query.text.is_empty() || similarity(&item.item_name, &query.text) >= threshold;
            let brand_matches = query.brands.is_empty() || query.brands.contains(&item.brand_name);
            let category_matches =
                query.categories.is_empty() || query.categories.contains(&item.category_name);

            name_matches && brand_matches && category_matches
        })
        .collect()
}
