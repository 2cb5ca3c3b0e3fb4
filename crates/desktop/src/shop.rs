//! Headless point-of-sale screen.
//!
//! `PosShop` owns the cart and everything the shop screen displays. It is
//! driven from one loop: user actions are method calls, background results
//! arrive as [`ShopMessage`]s on the receiver returned by [`PosShop::new`].
//! Front-ends drain [`PosShop::take_patches`] and [`PosShop::take_notices`]
//! after each step.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use uuid::Uuid;

use tillpoint_cart::{Cart, CartError, CartEvent, CartItem};
use tillpoint_catalog::{
    CatalogQuery, CatalogSnapshot, FilterKind, InventoryService, filter_items,
};
use tillpoint_core::StockId;
use tillpoint_events::Subscription;

use crate::cart_view::{CartView, CartViewPatch};
use crate::config::ShopConfig;
use crate::debounce::Debouncer;
use crate::error::{LOAD_FAILED_TITLE, Notice, ShopError};
use crate::loader::CatalogLoader;
use crate::types::{
    CatalogView, CheckoutLine, CheckoutRequest, CloseChoice, FilterOption, ShopMessage,
};

pub const CLEAR_CART_PROMPT: &str = "Are you sure you want to clear your cart?";
pub const CLOSE_PROMPT: &str = "Cart is not empty. Would you like to save the current cart's state?";
pub const LOGOUT_PROMPT: &str = "Cart is not empty. Would you like to continue logging out?";

pub struct PosShop {
    config: ShopConfig,
    tx: UnboundedSender<ShopMessage>,
    loader: CatalogLoader,
    debouncer: Debouncer,

    snapshot: Option<CatalogSnapshot>,
    query: CatalogQuery,
    view: CatalogView,
    brand_options: Vec<FilterOption>,
    category_options: Vec<FilterOption>,

    cart: Cart,
    cart_events: Subscription<CartEvent>,
    cart_view: CartView,
    patches: Vec<CartViewPatch>,
    notices: Vec<Notice>,
}

impl PosShop {
    /// Build the screen. Nothing is fetched until [`PosShop::refresh`].
    pub fn new(
        config: ShopConfig,
        service: Arc<dyn InventoryService>,
    ) -> (Self, UnboundedReceiver<ShopMessage>) {
        let (tx, rx) = unbounded_channel();
        let mut cart = Cart::new();
        let cart_events = cart.subscribe_channel();
        let debouncer = Debouncer::new(config.search_debounce, tx.clone());

        let shop = Self {
            config,
            loader: CatalogLoader::new(service),
            debouncer,
            tx,
            snapshot: None,
            query: CatalogQuery::new(),
            view: CatalogView::Loading,
            brand_options: Vec::new(),
            category_options: Vec::new(),
            cart_view: CartView::from_cart(&cart),
            cart,
            cart_events,
            patches: Vec::new(),
            notices: Vec::new(),
        };
        (shop, rx)
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_view(&self) -> &CartView {
        &self.cart_view
    }

    pub fn catalog_view(&self) -> &CatalogView {
        &self.view
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn brand_options(&self) -> &[FilterOption] {
        &self.brand_options
    }

    pub fn category_options(&self) -> &[FilterOption] {
        &self.category_options
    }

    pub fn is_fetching(&self) -> bool {
        self.loader.is_fetching()
    }

    /// Cart view patches produced since the last call.
    pub fn take_patches(&mut self) -> Vec<CartViewPatch> {
        std::mem::take(&mut self.patches)
    }

    /// Notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Reload brands, categories and items. Returns `false` when a fetch is
    /// already running.
    pub fn refresh(&mut self) -> bool {
        if !self.loader.refresh(self.tx.clone()) {
            return false;
        }
        self.view = CatalogView::Loading;
        true
    }

    pub fn handle_message(&mut self, message: ShopMessage) {
        match message {
            ShopMessage::CatalogLoaded(snapshot) => {
                self.brand_options = snapshot
                    .brands
                    .iter()
                    .map(|brand| self.option(FilterKind::Brand, &brand.name))
                    .collect();
                self.category_options = snapshot
                    .categories
                    .iter()
                    .map(|category| self.option(FilterKind::Category, &category.name))
                    .collect();
                self.snapshot = Some(snapshot);
                self.recompute_view();
            }
            ShopMessage::CatalogFailed(reason) => {
                self.notices.push(Notice::new(LOAD_FAILED_TITLE, reason.clone()));
                self.view = CatalogView::Failed(reason);
            }
            ShopMessage::SearchSettled if self.view == CatalogView::Loading => {
                tracing::debug!("search settled while the catalog is loading");
            }
            ShopMessage::SearchSettled => self.recompute_view(),
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
        self.debouncer.schedule();
    }

    pub fn toggle_filter(&mut self, kind: FilterKind, name: &str, selected: bool) {
        self.query.set_filter(kind, name, selected);

        let options = match kind {
            FilterKind::Brand => &mut self.brand_options,
            FilterKind::Category => &mut self.category_options,
        };
        for option in options.iter_mut().filter(|option| option.name == name) {
            option.selected = selected;
        }

        self.debouncer.schedule();
    }

    /// Put `quantity` units of a listing in the cart, merging with an
    /// existing entry for the same stock.
    pub fn add_to_cart(&mut self, stock_id: StockId, quantity: i64) -> Result<(), ShopError> {
        let result = self.try_add_to_cart(stock_id, quantity);
        self.settle(result)
    }

    pub fn increment(&mut self, stock_id: StockId) -> Result<(), ShopError> {
        let result = self.cart.increment_item(stock_id).map_err(ShopError::from);
        self.settle(result)
    }

    /// Minus button: removes the entry at quantity 1, decrements otherwise.
    pub fn decrement(&mut self, stock_id: StockId) -> Result<(), ShopError> {
        let result = match self.cart.get(stock_id).map(|item| item.quantity) {
            Some(1) => self.cart.remove_item(stock_id),
            Some(_) => self.cart.decrement_item(stock_id),
            None => Err(CartError::ItemNotFound(stock_id)),
        };
        self.settle(result.map_err(ShopError::from))
    }

    /// Clear the cart if `confirm` agrees. Returns whether it was cleared.
    pub fn clear_cart<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(CLEAR_CART_PROMPT) {
            return false;
        }
        self.cart.clear_cart();
        self.sync_cart_view();
        true
    }

    /// Snapshot the cart for the sale. The cart itself is left untouched.
    pub fn checkout(&mut self) -> Result<CheckoutRequest, ShopError> {
        let result = self.build_checkout();
        if let Ok(request) = &result {
            tracing::info!(
                checkout_id = %request.id,
                lines = request.lines.len(),
                total_quantity = request.total_quantity,
                total_price = %request.total_price,
                "checkout requested"
            );
        }
        self.settle(result)
    }

    /// Whether the screen may close. A non-empty cart asks first.
    pub fn before_close<F>(&mut self, ask: F) -> bool
    where
        F: FnOnce(&str) -> CloseChoice,
    {
        if self.cart.is_empty() {
            return true;
        }

        let choice = ask(CLOSE_PROMPT);
        tracing::info!(?choice, items = self.cart.len(), "close requested with items in cart");
        match choice {
            CloseChoice::Save => true,
            CloseChoice::Discard => {
                self.cart.clear_cart();
                self.sync_cart_view();
                true
            }
            CloseChoice::Cancel => false,
        }
    }

    /// Whether logging out may proceed. A non-empty cart asks first.
    pub fn before_logout<F>(&mut self, ask: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if self.cart.is_empty() {
            return true;
        }
        let proceed = ask(LOGOUT_PROMPT);
        tracing::info!(proceed, items = self.cart.len(), "logout requested with items in cart");
        proceed
    }

    fn try_add_to_cart(&mut self, stock_id: StockId, quantity: i64) -> Result<(), ShopError> {
        let listing = self
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.find(stock_id))
            .ok_or(ShopError::UnknownItem(stock_id))?;

        if quantity < 1 || quantity > listing.quantity {
            return Err(ShopError::QuantityOutOfRange {
                requested: quantity,
                max: listing.quantity,
            });
        }

        if self.cart.exists(stock_id) {
            self.cart.increase_item_qty(stock_id, quantity)?;
        } else {
            let item = CartItem::from_listing(listing, quantity);
            self.cart.add_item(item)?;
        }
        Ok(())
    }

    fn build_checkout(&self) -> Result<CheckoutRequest, ShopError> {
        if self.cart.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let lines: Vec<CheckoutLine> = self
            .cart
            .items()
            .iter()
            .filter(|item| item.quantity > 0)
            .map(|item| CheckoutLine {
                stock_id: item.stock_id,
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total(),
            })
            .collect();

        if lines.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        Ok(CheckoutRequest {
            id: Uuid::now_v7(),
            cart_id: self.cart.id_typed(),
            total_quantity: lines.iter().map(|line| line.quantity).sum(),
            total_price: lines.iter().map(|line| line.line_total).sum(),
            lines,
            requested_at: Utc::now(),
        })
    }

    /// Fold pending cart events into the view, and turn an error into a
    /// notice.
    fn settle<T>(&mut self, result: Result<T, ShopError>) -> Result<T, ShopError> {
        self.sync_cart_view();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "shop action rejected");
            self.notices.push(err.notice());
        }
        result
    }

    fn sync_cart_view(&mut self) {
        for event in self.cart_events.drain() {
            let patches = self.cart_view.apply(&event);
            self.patches.extend(patches);
        }
    }

    fn option(&self, kind: FilterKind, name: &str) -> FilterOption {
        FilterOption {
            kind,
            name: name.to_string(),
            selected: self.query.is_selected(kind, name),
        }
    }

    fn recompute_view(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };

        let matches = filter_items(&snapshot.items, &self.query, self.config.search_threshold);
        self.view = if matches.is_empty() {
            CatalogView::NoResults
        } else {
            CatalogView::Ready(matches.into_iter().cloned().collect())
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::cart_view::{CartTotals, DecrementAction};
    use tillpoint_catalog::{
        InMemoryInventoryService, InventoryMetadataDto, ItemBrandDto, ItemCategoryDto,
    };
    use tillpoint_core::{BrandId, CategoryId, Money};

    fn listing(id: u64, name: &str, brand: &str, category: &str, qty: i64) -> InventoryMetadataDto {
        InventoryMetadataDto {
            stock_id: StockId::new(id),
            item_name: name.to_string(),
            category_name: category.to_string(),
            brand_name: brand.to_string(),
            quantity: qty,
            unit_price: Money::from_minor(2_500),
            display_image: None,
        }
    }

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            brands: vec![
                ItemBrandDto {
                    id: BrandId::new(1),
                    name: "Nestle".to_string(),
                    description: None,
                },
                ItemBrandDto {
                    id: BrandId::new(2),
                    name: "Oishi".to_string(),
                    description: None,
                },
            ],
            categories: vec![
                ItemCategoryDto {
                    id: CategoryId::new(1),
                    name: "Beverages".to_string(),
                    description: None,
                },
                ItemCategoryDto {
                    id: CategoryId::new(2),
                    name: "Snacks".to_string(),
                    description: None,
                },
            ],
            items: vec![
                listing(1, "Milo", "Nestle", "Beverages", 5),
                listing(2, "Nescafe", "Nestle", "Beverages", 10),
                listing(3, "Prawn Crackers", "Oishi", "Snacks", 3),
            ],
        }
    }

    /// A loaded shop, outside any runtime so the debouncer fires at once.
    fn loaded_shop() -> (PosShop, UnboundedReceiver<ShopMessage>) {
        let service = Arc::new(InMemoryInventoryService::new());
        let (mut shop, rx) = PosShop::new(ShopConfig::default(), service);
        shop.handle_message(ShopMessage::CatalogLoaded(snapshot()));
        (shop, rx)
    }

    fn settle_search(shop: &mut PosShop, rx: &mut UnboundedReceiver<ShopMessage>) {
        while let Ok(message) = rx.try_recv() {
            shop.handle_message(message);
        }
    }

    #[test]
    fn starts_loading_and_shows_everything_once_loaded() {
        let service = Arc::new(InMemoryInventoryService::new());
        let (mut shop, _rx) = PosShop::new(ShopConfig::default(), service);
        assert_eq!(shop.catalog_view(), &CatalogView::Loading);

        shop.handle_message(ShopMessage::CatalogLoaded(snapshot()));
        assert_eq!(shop.catalog_view().items().len(), 3);
        assert_eq!(shop.brand_options().len(), 2);
        assert_eq!(shop.category_options().len(), 2);
        assert!(shop.brand_options().iter().all(|option| !option.selected));
    }

    #[test]
    fn failed_load_raises_a_notice() {
        let service = Arc::new(InMemoryInventoryService::new());
        let (mut shop, _rx) = PosShop::new(ShopConfig::default(), service);

        shop.handle_message(ShopMessage::CatalogFailed("connection refused".to_string()));

        assert_eq!(
            shop.catalog_view(),
            &CatalogView::Failed("connection refused".to_string())
        );
        let notices = shop.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Failed to load data");
        assert!(notices[0].message.contains("connection refused"));
    }

    #[test]
    fn refresh_through_the_loader_delivers_the_catalog() {
        let service = Arc::new(InMemoryInventoryService::new().with_items(snapshot().items));
        let (mut shop, mut rx) = PosShop::new(ShopConfig::default(), service);

        assert!(shop.refresh());
        let message = rx.blocking_recv().unwrap();
        shop.handle_message(message);

        assert_eq!(shop.catalog_view().items().len(), 3);
        assert!(!shop.is_fetching());
    }

    #[test]
    fn refresh_after_load_shows_loading_again() {
        let service = Arc::new(InMemoryInventoryService::new().with_items(snapshot().items));
        let (mut shop, mut rx) = PosShop::new(ShopConfig::default(), service);
        shop.handle_message(ShopMessage::CatalogLoaded(snapshot()));
        assert_eq!(shop.catalog_view().items().len(), 3);

        assert!(shop.refresh());
        assert_eq!(shop.catalog_view(), &CatalogView::Loading);

        let message = rx.blocking_recv().unwrap();
        shop.handle_message(message);
        assert_eq!(shop.catalog_view().items().len(), 3);
    }

    #[test]
    fn settled_search_waits_for_the_running_fetch() {
        let service = Arc::new(
            InMemoryInventoryService::new()
                .with_items(vec![listing(3, "Prawn Crackers", "Oishi", "Snacks", 3)])
                .with_delay(Duration::from_millis(100)),
        );
        let (mut shop, mut rx) = PosShop::new(ShopConfig::default(), service);
        shop.handle_message(ShopMessage::CatalogLoaded(snapshot()));

        assert!(shop.refresh());
        shop.set_search_text("Milo");
        shop.handle_message(ShopMessage::SearchSettled);
        assert_eq!(shop.catalog_view(), &CatalogView::Loading);

        loop {
            let message = rx.blocking_recv().unwrap();
            let loaded = matches!(message, ShopMessage::CatalogLoaded(_));
            shop.handle_message(message);
            if loaded {
                break;
            }
        }
        assert_eq!(shop.catalog_view(), &CatalogView::NoResults);
    }

    #[test]
    fn search_and_filters_narrow_the_view() {
        let (mut shop, mut rx) = loaded_shop();

        shop.toggle_filter(FilterKind::Brand, "Oishi", true);
        settle_search(&mut shop, &mut rx);
        let names: Vec<_> = shop
            .catalog_view()
            .items()
            .iter()
            .map(|item| item.item_name.as_str())
            .collect();
        assert_eq!(names, vec!["Prawn Crackers"]);
        assert!(
            shop.brand_options()
                .iter()
                .any(|option| option.name == "Oishi" && option.selected)
        );

        shop.set_search_text("Milo");
        settle_search(&mut shop, &mut rx);
        assert_eq!(shop.catalog_view(), &CatalogView::NoResults);

        shop.toggle_filter(FilterKind::Brand, "Oishi", false);
        settle_search(&mut shop, &mut rx);
        assert_eq!(shop.catalog_view().items()[0].item_name, "Milo");
    }

    #[test]
    fn reload_keeps_filter_selection() {
        let (mut shop, mut rx) = loaded_shop();
        shop.toggle_filter(FilterKind::Category, "Snacks", true);
        settle_search(&mut shop, &mut rx);

        shop.handle_message(ShopMessage::CatalogLoaded(snapshot()));

        let snacks = shop
            .category_options()
            .iter()
            .find(|option| option.name == "Snacks")
            .unwrap();
        assert!(snacks.selected);
        assert_eq!(shop.catalog_view().items().len(), 1);
    }

    #[test]
    fn add_merges_repeat_listings() {
        let (mut shop, _rx) = loaded_shop();

        shop.add_to_cart(StockId::new(1), 2).unwrap();
        shop.add_to_cart(StockId::new(1), 1).unwrap();

        assert_eq!(shop.cart().len(), 1);
        assert_eq!(shop.cart().total_quantity(), 3);
        assert_eq!(shop.cart_view().displayed_rows()[0].quantity_label, "x3");

        let patches = shop.take_patches();
        assert!(matches!(patches[0], CartViewPatch::Rebuild(_)));
        assert!(matches!(patches[2], CartViewPatch::UpdateRow(_)));
    }

    #[test]
    fn add_checks_the_quantity_range() {
        let (mut shop, _rx) = loaded_shop();

        let err = shop.add_to_cart(StockId::new(3), 4).unwrap_err();
        assert!(matches!(err, ShopError::QuantityOutOfRange { requested: 4, max: 3 }));

        let err = shop.add_to_cart(StockId::new(3), 0).unwrap_err();
        assert!(matches!(err, ShopError::QuantityOutOfRange { .. }));

        let err = shop.add_to_cart(StockId::new(99), 1).unwrap_err();
        assert!(matches!(err, ShopError::UnknownItem(_)));

        assert!(shop.cart().is_empty());
        assert_eq!(shop.take_notices().len(), 3);
    }

    #[test]
    fn merge_past_the_ceiling_is_insufficient_stock() {
        let (mut shop, _rx) = loaded_shop();
        shop.add_to_cart(StockId::new(1), 3).unwrap();

        let err = shop.add_to_cart(StockId::new(1), 3).unwrap_err();
        assert!(matches!(
            err,
            ShopError::Cart(CartError::InsufficientStock { available: 5, .. })
        ));
        assert_eq!(shop.cart().total_quantity(), 3);

        let notices = shop.take_notices();
        assert_eq!(notices[0].title, "Insufficient stock");
    }

    #[test]
    fn decrement_removes_at_one() {
        let (mut shop, _rx) = loaded_shop();
        shop.add_to_cart(StockId::new(2), 2).unwrap();
        shop.take_patches();

        shop.decrement(StockId::new(2)).unwrap();
        let row = &shop.cart_view().displayed_rows()[0];
        assert_eq!(row.decrement, DecrementAction::Remove);

        shop.decrement(StockId::new(2)).unwrap();
        assert!(shop.cart().is_empty());
        assert!(shop.cart_view().shows_placeholder());

        let err = shop.decrement(StockId::new(2)).unwrap_err();
        assert!(matches!(err, ShopError::Cart(CartError::ItemNotFound(_))));
    }

    #[test]
    fn increment_stops_at_stock() {
        let (mut shop, _rx) = loaded_shop();
        shop.add_to_cart(StockId::new(3), 3).unwrap();

        let err = shop.increment(StockId::new(3)).unwrap_err();
        assert!(matches!(err, ShopError::Cart(CartError::InsufficientStock { .. })));
        assert_eq!(shop.cart().total_quantity(), 3);
    }

    #[test]
    fn clear_asks_first() {
        let (mut shop, _rx) = loaded_shop();
        shop.add_to_cart(StockId::new(1), 1).unwrap();

        let mut asked = None;
        assert!(!shop.clear_cart(|prompt| {
            asked = Some(prompt.to_string());
            false
        }));
        assert_eq!(asked.as_deref(), Some(CLEAR_CART_PROMPT));
        assert!(!shop.cart().is_empty());

        assert!(shop.clear_cart(|_| true));
        assert!(shop.cart().is_empty());
        assert_eq!(shop.cart_view().totals(), CartTotals::default());
    }

    #[test]
    fn checkout_snapshots_without_clearing() {
        let (mut shop, _rx) = loaded_shop();

        let err = shop.checkout().unwrap_err();
        assert!(matches!(err, ShopError::EmptyCart));

        shop.add_to_cart(StockId::new(1), 2).unwrap();
        shop.add_to_cart(StockId::new(3), 1).unwrap();
        let request = shop.checkout().unwrap();

        assert_eq!(request.lines.len(), 2);
        assert_eq!(request.total_quantity, 3);
        assert_eq!(request.total_price, Money::from_minor(7_500));
        assert_eq!(request.cart_id, shop.cart().id_typed());
        assert_eq!(shop.cart().total_quantity(), 3);
    }

    #[test]
    fn checkout_skips_zero_quantity_lines() {
        let (mut shop, _rx) = loaded_shop();
        shop.add_to_cart(StockId::new(1), 2).unwrap();
        shop.add_to_cart(StockId::new(2), 1).unwrap();
        shop.cart.decrease_item_qty(StockId::new(1), 2).unwrap();

        let request = shop.checkout().unwrap();
        assert_eq!(request.lines.len(), 1);
        assert_eq!(request.lines[0].stock_id, StockId::new(2));
        assert_eq!(request.total_quantity, 1);
        assert_eq!(request.total_price, Money::from_minor(2_500));

        shop.cart.decrease_item_qty(StockId::new(2), 1).unwrap();
        assert!(!shop.cart().is_empty());
        let err = shop.checkout().unwrap_err();
        assert!(matches!(err, ShopError::EmptyCart));
    }

    #[test]
    fn close_and_logout_prompts() {
        let (mut shop, _rx) = loaded_shop();
        assert!(shop.before_close(|_| panic!("empty cart must not ask")));
        assert!(shop.before_logout(|_| panic!("empty cart must not ask")));

        shop.add_to_cart(StockId::new(1), 1).unwrap();

        assert!(!shop.before_close(|prompt| {
            assert_eq!(prompt, CLOSE_PROMPT);
            CloseChoice::Cancel
        }));
        assert!(shop.before_close(|_| CloseChoice::Save));
        assert!(!shop.cart().is_empty());

        assert!(!shop.before_logout(|prompt| {
            assert_eq!(prompt, LOGOUT_PROMPT);
            false
        }));

        assert!(shop.before_close(|_| CloseChoice::Discard));
        assert!(shop.cart().is_empty());
    }
}
