//! Channel fan-out for handing events to other threads.

use std::convert::Infallible;
use std::sync::mpsc::{self, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::bus::{EventBus, Subscription};

/// Fans every published event out to each live [`Subscription`].
///
/// A cart creates one of these the first time something asks for an event
/// channel. Every subscriber owns an unbounded queue, so publishing never
/// blocks; a queue whose receiver was dropped is forgotten on the next
/// publish.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    senders: Mutex<Vec<Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live subscriptions as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.senders().len()
    }

    // The sender list holds no invariant a panicking holder could break.
    fn senders(&self) -> MutexGuard<'_, Vec<Sender<M>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = Infallible;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        self.senders()
            .retain(|sender| sender.send(message.clone()).is_ok());
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (sender, receiver) = mpsc::channel();
        self.senders().push(sender);
        Subscription::new(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_a_copy() {
        let bus = InMemoryEventBus::new();
        let view = bus.subscribe();
        let audit = bus.subscribe();

        bus.publish("cart.item.added").unwrap();
        bus.publish("cart.cleared").unwrap();

        assert_eq!(view.drain(), vec!["cart.item.added", "cart.cleared"]);
        assert_eq!(audit.drain(), vec!["cart.item.added", "cart.cleared"]);
    }

    #[test]
    fn late_subscribers_miss_earlier_messages() {
        let bus = InMemoryEventBus::new();
        bus.publish(1).unwrap();

        let sub = bus.subscribe();
        bus.publish(2).unwrap();

        assert_eq!(sub.drain(), vec![2]);
    }

    #[test]
    fn dropped_subscriptions_are_forgotten_on_publish() {
        let bus = InMemoryEventBus::new();
        let keep = bus.subscribe();
        let gone = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(gone);
        bus.publish(()).unwrap();

        assert_eq!(bus.subscriber_count(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn keeps_delivering_after_a_holder_panicked() {
        let bus = InMemoryEventBus::new();
        let before = bus.subscribe();

        std::thread::scope(|scope| {
            let poisoner = scope.spawn(|| {
                let _guard = bus.senders.lock();
                panic!("holder panicked");
            });
            assert!(poisoner.join().is_err());
        });
        assert!(bus.senders.is_poisoned());

        let after = bus.subscribe();
        bus.publish(7u8).unwrap();

        assert_eq!(before.drain(), vec![7]);
        assert_eq!(after.drain(), vec![7]);
    }

    #[test]
    fn subscription_can_be_drained_on_another_thread() {
        let bus = InMemoryEventBus::new();
        let sub = bus.subscribe();

        let handle = std::thread::spawn(move || sub.recv().unwrap());
        bus.publish(99u32).unwrap();

        assert_eq!(handle.join().unwrap(), 99);
    }
}
