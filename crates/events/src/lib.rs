//! Domain events and the in-process channels that carry them.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::{Event, execute};
pub use in_memory_bus::InMemoryEventBus;
