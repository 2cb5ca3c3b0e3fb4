//! Shopping cart domain module.
//!
//! The cart is an in-memory aggregate: commands are decided without touching
//! state, accepted events are applied, and every applied event is announced to
//! listeners (synchronous callbacks) and to channel subscriptions.

pub mod cart;
pub mod error;
pub mod event;
pub mod item;
pub mod listener;

pub use cart::{
    AddItem, Cart, CartCommand, ClearCart, DecreaseItemQty, DecrementItem, IncreaseItemQty,
    IncrementItem, RemoveItem,
};
pub use error::CartError;
pub use event::{CartCleared, CartEvent, CartEventKind, ItemAdded, ItemRemoved, QuantityChanged};
pub use item::CartItem;
pub use listener::ListenerId;
