use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tillpoint_core::StockId;
use tillpoint_events::Event;

use crate::item::CartItem;

/// What kind of change an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartEventKind {
    Add,
    Remove,
    IncreaseQty,
    Increment,
    DecreaseQty,
    Decrement,
    Clear,
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: CartItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved. Carries the entry as it was when removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub item: CartItem,
    pub occurred_at: DateTime<Utc>,
}

/// Payload shared by the four quantity events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub current: CartItem,
    pub previous: CartItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub removed: Vec<CartItem>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    ItemRemoved(ItemRemoved),
    QuantityIncreased(QuantityChanged),
    ItemIncremented(QuantityChanged),
    QuantityDecreased(QuantityChanged),
    ItemDecremented(QuantityChanged),
    CartCleared(CartCleared),
}

impl CartEvent {
    pub fn kind(&self) -> CartEventKind {
        match self {
            CartEvent::ItemAdded(_) => CartEventKind::Add,
            CartEvent::ItemRemoved(_) => CartEventKind::Remove,
            CartEvent::QuantityIncreased(_) => CartEventKind::IncreaseQty,
            CartEvent::ItemIncremented(_) => CartEventKind::Increment,
            CartEvent::QuantityDecreased(_) => CartEventKind::DecreaseQty,
            CartEvent::ItemDecremented(_) => CartEventKind::Decrement,
            CartEvent::CartCleared(_) => CartEventKind::Clear,
        }
    }

    /// Current item state (the removed entry for removals, nothing for clears).
    pub fn payload(&self) -> Option<&CartItem> {
        match self {
            CartEvent::ItemAdded(e) => Some(&e.item),
            CartEvent::ItemRemoved(e) => Some(&e.item),
            CartEvent::QuantityIncreased(e)
            | CartEvent::ItemIncremented(e)
            | CartEvent::QuantityDecreased(e)
            | CartEvent::ItemDecremented(e) => Some(&e.current),
            CartEvent::CartCleared(_) => None,
        }
    }

    /// Pre-mutation snapshot, for quantity changes only.
    pub fn previous_payload(&self) -> Option<&CartItem> {
        match self {
            CartEvent::QuantityIncreased(e)
            | CartEvent::ItemIncremented(e)
            | CartEvent::QuantityDecreased(e)
            | CartEvent::ItemDecremented(e) => Some(&e.previous),
            _ => None,
        }
    }

    pub fn stock_id(&self) -> Option<StockId> {
        self.payload().map(|item| item.stock_id)
    }
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
            CartEvent::QuantityIncreased(_) => "cart.item.quantity_increased",
            CartEvent::ItemIncremented(_) => "cart.item.incremented",
            CartEvent::QuantityDecreased(_) => "cart.item.quantity_decreased",
            CartEvent::ItemDecremented(_) => "cart.item.decremented",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::QuantityIncreased(e)
            | CartEvent::ItemIncremented(e)
            | CartEvent::QuantityDecreased(e)
            | CartEvent::ItemDecremented(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}
