//! Search debouncing.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::types::ShopMessage;

/// Collapses a burst of search edits into a single `SearchSettled` message,
/// sent `delay` after the last edit.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    tx: UnboundedSender<ShopMessage>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration, tx: UnboundedSender<ShopMessage>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    /// Restart the timer. Outside a tokio runtime the message is sent
    /// immediately.
    pub fn schedule(&mut self) {
        self.cancel();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let tx = self.tx.clone();
                let delay = self.delay;
                self.pending = Some(handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(ShopMessage::SearchSettled);
                }));
            }
            Err(_) => {
                let _ = self.tx.send(ShopMessage::SearchSettled);
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
