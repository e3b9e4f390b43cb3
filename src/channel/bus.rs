use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::message::BroadcastMessage;

/// Best-effort, at-most-once pub/sub between contexts.
///
/// Publishing never fails: with no live subscriber the message is simply
/// gone, and a subscriber that falls more than `capacity` messages behind
/// loses the oldest ones. Neither case is an error.
/// Largest per-subscriber buffer a bus accepts. Larger requests are clamped.
pub const MAX_CAPACITY: usize = 1 << 16;

#[derive(Clone)]
pub struct BroadcastBus {
    tx: broadcast::Sender<BroadcastMessage>,
    next_id: Arc<AtomicU64>,
}

impl BroadcastBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.clamp(1, MAX_CAPACITY));
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Send `message` to whoever is listening right now.
    ///
    /// Returns the number of subscriptions that will see it.
    pub fn publish(&self, message: BroadcastMessage) -> usize {
        match self.tx.send(message) {
            Ok(receivers) => {
                tracing::trace!(action = message.action_id(), receivers, "Broadcast sent");
                receivers
            }
            Err(_) => {
                tracing::trace!(action = message.action_id(), "Broadcast dropped: no listeners");
                0
            }
        }
    }

    /// Start listening. The subscription is released when dropped.
    pub fn subscribe(&self, name: &'static str) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(subscriber = name, id, "Broadcast subscription acquired");
        Subscription {
            rx: self.tx.subscribe(),
            name,
            id,
        }
    }

    pub fn live_subscriptions(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Scoped listener on a [`BroadcastBus`].
///
/// Holding the value keeps the subscription alive; dropping it (on any exit
/// path) stops delivery immediately.
pub struct Subscription {
    rx: broadcast::Receiver<BroadcastMessage>,
    name: &'static str,
    id: u64,
}

impl Subscription {
    /// Wait for the next message. `None` once every publisher is gone.
    ///
    /// Messages lost to lag are skipped.
    pub async fn recv(&mut self) -> Option<BroadcastMessage> {
        loop {
            match self.rx.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(missed)) => {
                    tracing::debug!(subscriber = self.name, missed, "Broadcast delivery lost");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-delivered message, if any.
    pub fn try_recv(&mut self) -> Option<BroadcastMessage> {
        loop {
            match self.rx.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::debug!(subscriber = self.name, missed, "Broadcast delivery lost");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Explicit release. Equivalent to dropping.
    pub fn release(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::debug!(subscriber = self.name, id = self.id, "Broadcast subscription released");
    }
}
