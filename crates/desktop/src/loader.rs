//! Background catalog loading.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::UnboundedSender;

use tillpoint_catalog::{InventoryService, fetch_snapshot};

use crate::types::ShopMessage;

/// Fetches the catalog off the UI loop and reports back over a channel.
///
/// At most one fetch is in flight at a time.
pub struct CatalogLoader {
    service: Arc<dyn InventoryService>,
    fetching: Arc<AtomicBool>,
}

impl CatalogLoader {
    pub fn new(service: Arc<dyn InventoryService>) -> Self {
        Self {
            service,
            fetching: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::SeqCst)
    }

    /// Start a fetch unless one is already running. Returns whether a fetch
    /// was started.
    ///
    /// Inside a tokio runtime the fetch runs on the blocking pool; otherwise
    /// it gets a plain thread.
    pub fn refresh(&self, tx: UnboundedSender<ShopMessage>) -> bool {
        if self
            .fetching
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("catalog fetch already in flight");
            return false;
        }

        let service = self.service.clone();
        let fetching = self.fetching.clone();
        let job = move || {
            let message = match fetch_snapshot(service.as_ref()) {
                Ok(snapshot) => {
                    tracing::info!(items = snapshot.items.len(), "catalog loaded");
                    ShopMessage::CatalogLoaded(snapshot)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "catalog fetch failed");
                    ShopMessage::CatalogFailed(err.to_string())
                }
            };

            fetching.store(false, Ordering::SeqCst);
            if tx.send(message).is_err() {
                tracing::debug!("shop closed before catalog fetch finished");
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                std::thread::spawn(job);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tillpoint_catalog::{InMemoryInventoryService, InventoryMetadataDto};
    use tillpoint_core::{Money, StockId};
    use tokio::sync::mpsc::unbounded_channel;

    fn listing(id: u64, name: &str) -> InventoryMetadataDto {
        InventoryMetadataDto {
            stock_id: StockId::new(id),
            item_name: name.to_string(),
            category_name: "Snacks".to_string(),
            brand_name: "Oishi".to_string(),
            quantity: 10,
            unit_price: Money::from_minor(1_500),
            display_image: None,
        }
    }

    #[tokio::test]
    async fn delivers_snapshot_and_clears_flag() {
        let service = Arc::new(
            InMemoryInventoryService::new().with_items(vec![listing(1, "Prawn Crackers")]),
        );
        let loader = CatalogLoader::new(service);
        let (tx, mut rx) = unbounded_channel();

        assert!(loader.refresh(tx));
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();

        match message {
            ShopMessage::CatalogLoaded(snapshot) => assert_eq!(snapshot.items.len(), 1),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(!loader.is_fetching());
    }

    #[tokio::test]
    async fn second_refresh_is_ignored_while_in_flight() {
        let service = Arc::new(
            InMemoryInventoryService::new()
                .with_items(vec![listing(1, "Prawn Crackers")])
                .with_delay(Duration::from_millis(200)),
        );
        let loader = CatalogLoader::new(service.clone());
        let (tx, mut rx) = unbounded_channel();

        assert!(loader.refresh(tx.clone()));
        assert!(loader.is_fetching());
        assert!(!loader.refresh(tx));

        let _ = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(service.item_fetches(), 1);
    }

    #[tokio::test]
    async fn failures_are_reported_as_messages() {
        let service = Arc::new(InMemoryInventoryService::new());
        service.set_failure(Some("inventory offline".to_string()));
        let loader = CatalogLoader::new(service);
        let (tx, mut rx) = unbounded_channel();

        assert!(loader.refresh(tx));
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();

        match message {
            ShopMessage::CatalogFailed(reason) => assert!(reason.contains("inventory offline")),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(!loader.is_fetching());
    }

    #[test]
    fn works_without_a_runtime() {
        let service = Arc::new(InMemoryInventoryService::new());
        let loader = CatalogLoader::new(service);
        let (tx, mut rx) = unbounded_channel();

        assert!(loader.refresh(tx));
        let message = rx.blocking_recv().unwrap();
        assert_eq!(message, ShopMessage::CatalogLoaded(Default::default()));
    }
}
