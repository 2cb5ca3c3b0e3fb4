use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tillpoint_core::{Aggregate, AggregateId, AggregateRoot, CartId, Money, StockId};
use tillpoint_events::{Event, EventBus, InMemoryEventBus, Subscription, execute};

use crate::error::CartError;
use crate::event::{CartCleared, CartEvent, ItemAdded, ItemRemoved, QuantityChanged};
use crate::item::CartItem;
use crate::listener::{ListenerId, Listeners};

/// Aggregate root: Cart.
///
/// Entries keep insertion order and are unique by stock id. Totals are always
/// computed from the current entries.
#[derive(Debug)]
pub struct Cart {
    id: CartId,
    items: Vec<CartItem>,
    version: u64,
    listeners: Listeners,
    bus: Option<Arc<InMemoryEventBus<CartEvent>>>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::with_id(CartId::new(AggregateId::new()))
    }

    pub fn with_id(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
            version: 0,
            listeners: Listeners::default(),
            bus: None,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn exists(&self, stock_id: StockId) -> bool {
        self.position(stock_id).is_some()
    }

    pub fn get(&self, stock_id: StockId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.stock_id == stock_id)
    }

    /// All entries in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, item| total.saturating_add(item.quantity))
    }

    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        self.dispatch(CartCommand::AddItem(AddItem {
            item,
            occurred_at: Utc::now(),
        }))
    }

    pub fn increase_item_qty(&mut self, stock_id: StockId, delta: i64) -> Result<(), CartError> {
        self.dispatch(CartCommand::IncreaseItemQty(IncreaseItemQty {
            stock_id,
            delta,
            occurred_at: Utc::now(),
        }))
    }

    pub fn increment_item(&mut self, stock_id: StockId) -> Result<(), CartError> {
        self.dispatch(CartCommand::IncrementItem(IncrementItem {
            stock_id,
            occurred_at: Utc::now(),
        }))
    }

    pub fn decrease_item_qty(&mut self, stock_id: StockId, delta: i64) -> Result<(), CartError> {
        self.dispatch(CartCommand::DecreaseItemQty(DecreaseItemQty {
            stock_id,
            delta,
            occurred_at: Utc::now(),
        }))
    }

    pub fn decrement_item(&mut self, stock_id: StockId) -> Result<(), CartError> {
        self.dispatch(CartCommand::DecrementItem(DecrementItem {
            stock_id,
            occurred_at: Utc::now(),
        }))
    }

    pub fn remove_item(&mut self, stock_id: StockId) -> Result<(), CartError> {
        self.dispatch(CartCommand::RemoveItem(RemoveItem {
            stock_id,
            occurred_at: Utc::now(),
        }))
    }

    /// Empty the cart. Emits a clear event even when already empty.
    pub fn clear_cart(&mut self) {
        let event = self.decide_clear(&ClearCart {
            occurred_at: Utc::now(),
        });
        self.apply(&event);
        self.announce(&event);
    }

    /// Register a listener, called synchronously after every applied event on
    /// the thread that made the change.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CartEvent) + Send + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// A channel receiving a copy of every event applied from now on.
    ///
    /// Unlike listeners, the receiving end can be drained from any thread.
    pub fn subscribe_channel(&mut self) -> Subscription<CartEvent> {
        let bus = self
            .bus
            .get_or_insert_with(|| Arc::new(InMemoryEventBus::new()));
        EventBus::<CartEvent>::subscribe(bus.as_ref())
    }

    fn dispatch(&mut self, command: CartCommand) -> Result<(), CartError> {
        let events = execute(self, &command).inspect_err(|err| {
            tracing::warn!(cart_id = %self.id, error = %err, "cart command rejected");
        })?;

        for event in &events {
            self.announce(event);
        }
        Ok(())
    }

    fn announce(&mut self, event: &CartEvent) {
        tracing::debug!(
            cart_id = %self.id,
            event_type = event.event_type(),
            stock_id = ?event.stock_id(),
            version = self.version,
            "cart event applied"
        );

        self.listeners.notify(event);

        if let Some(bus) = &self.bus {
            let Ok(()) = bus.publish(event.clone());
        }
    }

    fn position(&self, stock_id: StockId) -> Option<usize> {
        self.items.iter().position(|item| item.stock_id == stock_id)
    }

    fn replace(&mut self, item: &CartItem) {
        if let Some(idx) = self.position(item.stock_id) {
            if let Some(slot) = self.items.get_mut(idx) {
                *slot = item.clone();
            }
        }
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub item: CartItem,
    pub occurred_at: DateTime<Utc>,
}

/// Command: IncreaseItemQty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseItemQty {
    pub stock_id: StockId,
    pub delta: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: IncrementItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementItem {
    pub stock_id: StockId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DecreaseItemQty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecreaseItemQty {
    pub stock_id: StockId,
    pub delta: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DecrementItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecrementItem {
    pub stock_id: StockId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub stock_id: StockId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    IncreaseItemQty(IncreaseItemQty),
    IncrementItem(IncrementItem),
    DecreaseItemQty(DecreaseItemQty),
    DecrementItem(DecrementItem),
    RemoveItem(RemoveItem),
    ClearCart(ClearCart),
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = CartError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            CartEvent::QuantityIncreased(e)
            | CartEvent::ItemIncremented(e)
            | CartEvent::QuantityDecreased(e)
            | CartEvent::ItemDecremented(e) => {
                self.replace(&e.current);
            }
            CartEvent::ItemRemoved(e) => {
                self.items.retain(|item| item.stock_id != e.item.stock_id);
            }
            CartEvent::CartCleared(_) => {
                self.items.clear();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::IncreaseItemQty(cmd) => {
                let (current, previous) = self.quantity_change(cmd.stock_id, cmd.delta)?;
                Ok(vec![CartEvent::QuantityIncreased(QuantityChanged {
                    current,
                    previous,
                    occurred_at: cmd.occurred_at,
                })])
            }
            CartCommand::IncrementItem(cmd) => {
                let (current, previous) = self.quantity_change(cmd.stock_id, 1)?;
                Ok(vec![CartEvent::ItemIncremented(QuantityChanged {
                    current,
                    previous,
                    occurred_at: cmd.occurred_at,
                })])
            }
            CartCommand::DecreaseItemQty(cmd) => {
                let (current, previous) =
                    self.quantity_change(cmd.stock_id, cmd.delta.saturating_neg())?;
                Ok(vec![CartEvent::QuantityDecreased(QuantityChanged {
                    current,
                    previous,
                    occurred_at: cmd.occurred_at,
                })])
            }
            CartCommand::DecrementItem(cmd) => {
                let (current, previous) = self.quantity_change(cmd.stock_id, -1)?;
                Ok(vec![CartEvent::ItemDecremented(QuantityChanged {
                    current,
                    previous,
                    occurred_at: cmd.occurred_at,
                })])
            }
            CartCommand::RemoveItem(cmd) => self.handle_remove(cmd),
            CartCommand::ClearCart(cmd) => Ok(vec![self.decide_clear(cmd)]),
        }
    }
}

impl Cart {
    fn ensure_within_stock(
        stock_id: StockId,
        attempted: i64,
        available: i64,
    ) -> Result<(), CartError> {
        if attempted < 0 {
            return Err(CartError::NegativeQuantity {
                stock_id,
                attempted,
            });
        }
        if attempted > available {
            return Err(CartError::InsufficientStock {
                stock_id,
                attempted,
                available,
            });
        }
        Ok(())
    }

    /// New and previous snapshots for a quantity change of `delta`.
    fn quantity_change(
        &self,
        stock_id: StockId,
        delta: i64,
    ) -> Result<(CartItem, CartItem), CartError> {
        let previous = self
            .get(stock_id)
            .ok_or(CartError::ItemNotFound(stock_id))?;

        let attempted = previous.quantity.saturating_add(delta);
        Self::ensure_within_stock(stock_id, attempted, previous.stock)?;

        Ok((previous.with_quantity(attempted), previous.clone()))
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, CartError> {
        let item = &cmd.item;
        Self::ensure_within_stock(item.stock_id, item.quantity, item.stock)?;

        if self.exists(item.stock_id) {
            return Err(CartError::DuplicateItem(item.stock_id));
        }

        Ok(vec![CartEvent::ItemAdded(ItemAdded {
            item: item.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Result<Vec<CartEvent>, CartError> {
        let item = self
            .get(cmd.stock_id)
            .ok_or(CartError::ItemNotFound(cmd.stock_id))?;

        Ok(vec![CartEvent::ItemRemoved(ItemRemoved {
            item: item.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn decide_clear(&self, cmd: &ClearCart) -> CartEvent {
        CartEvent::CartCleared(CartCleared {
            removed: self.items.clone(),
            occurred_at: cmd.occurred_at,
        })
    }
}
