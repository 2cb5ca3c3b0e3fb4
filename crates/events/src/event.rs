use chrono::{DateTime, Utc};

use tillpoint_core::Aggregate;

/// A fact recorded by an aggregate. Every subscriber gets its own clone.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name such as `"cart.item.added"`, stable across releases.
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Run `command` against `aggregate`: decide, then apply each event in
/// order. A rejected command leaves the aggregate exactly as it was.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: Aggregate,
{
    let events = aggregate.handle(command)?;
    for event in &events {
        aggregate.apply(event);
    }
    Ok(events)
}
