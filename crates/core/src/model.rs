//! Modelling traits shared by the domain crates.
//!
//! State changes go through an [`Aggregate`]: a command is turned into zero
//! or more events by [`Aggregate::handle`], which only reads, and each event
//! is then folded in by [`Aggregate::apply`]. Anything that rejects a command
//! does so before a single field changes.

use core::fmt::Debug;
use core::hash::Hash;

/// Something with a stable key, such as a cart line keyed by its stock id.
pub trait Entity {
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> &Self::Id;
}

/// Compared by value only. Two `Money` amounts of 12.50 are the same thing.
pub trait ValueObject: Clone + PartialEq + Debug {}

/// Identity and version of an aggregate.
pub trait AggregateRoot {
    type Id: Clone + Eq + Hash + Debug;

    fn id(&self) -> &Self::Id;

    /// Number of events applied since creation.
    fn version(&self) -> u64;
}

pub trait Aggregate: AggregateRoot {
    type Command: Clone + Debug;
    type Event: Clone + Debug;
    type Error: Debug;

    /// Decide; must not mutate.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Fold one accepted event into state and bump the version.
    fn apply(&mut self, event: &Self::Event);
}
