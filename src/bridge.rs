//! Single-subscriber fan-out of world events.
//!
//! The world connection publishes every inbound event here. At most one
//! [`Subscription`] is attached at a time; with none attached, events are
//! dropped. Subscriptions are scoped handles: dropping one detaches it, so a
//! task releases its slot on every exit path, including panics.

use crate::error::BridgeError;
use crate::world::WorldEvent;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

#[derive(Default)]
struct BridgeState {
    next_id: u64,
    slot: Option<Slot>,
}

struct Slot {
    id: u64,
    tx: mpsc::UnboundedSender<WorldEvent>,
}

/// Shared handle to the subscription slot.
#[derive(Clone, Default)]
pub struct EventBridge {
    inner: Arc<Mutex<BridgeState>>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach the single subscriber.
    ///
    /// Fails while a previous subscription is still alive; the slot is never
    /// taken over implicitly.
    pub fn subscribe(&self) -> Result<Subscription, BridgeError> {
        let mut state = self.lock();
        if state.slot.is_some() {
            return Err(BridgeError::Occupied);
        }
        state.next_id += 1;
        let id = state.next_id;
        let (tx, rx) = mpsc::unbounded_channel();
        state.slot = Some(Slot { id, tx });
        tracing::debug!(subscription = id, "event bridge subscriber attached");
        Ok(Subscription {
            id,
            rx,
            bridge: self.clone(),
        })
    }

    /// Deliver one event to the current subscriber.
    ///
    /// Returns `false` when nobody is attached and the event was dropped.
    pub fn publish(&self, event: WorldEvent) -> bool {
        let mut state = self.lock();
        let Some(slot) = state.slot.as_ref() else {
            return false;
        };
        if slot.tx.send(event).is_ok() {
            return true;
        }
        // Receiver is gone without its handle having been dropped; free the slot.
        state.slot = None;
        false
    }

    /// True while a subscription holds the slot.
    pub fn has_subscriber(&self) -> bool {
        self.lock().slot.is_some()
    }

    fn release(&self, id: u64) {
        let mut state = self.lock();
        if state.slot.as_ref().is_some_and(|slot| slot.id == id) {
            state.slot = None;
            tracing::debug!(subscription = id, "event bridge subscriber released");
        }
    }
}

/// Scoped receiving end of the event bridge.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<WorldEvent>,
    bridge: EventBridge,
}

impl Subscription {
    /// Generation id of this subscription.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next event. Cancel-safe.
    pub async fn recv(&mut self) -> Option<WorldEvent> {
        self.rx.recv().await
    }

    /// Next already-delivered event, if any.
    pub fn try_recv(&mut self) -> Option<WorldEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bridge.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ChatEvent, WorldPosition};

    fn chat(text: &str) -> WorldEvent {
        WorldEvent::Chat(ChatEvent::new("steve", text))
    }

    #[test]
    fn publish_without_subscriber_is_dropped() {
        let bridge = EventBridge::new();
        assert!(!bridge.publish(chat("hello")));
        assert!(!bridge.has_subscriber());
    }

    #[test]
    fn delivers_only_to_current_subscriber() {
        let bridge = EventBridge::new();
        let mut first = bridge.subscribe().expect("first");
        assert!(bridge.publish(chat("one")));
        assert_eq!(first.try_recv(), Some(chat("one")));
        drop(first);

        let mut second = bridge.subscribe().expect("second");
        assert!(bridge.publish(WorldEvent::Position(WorldPosition::new(1.0, 2.0, 3.0))));
        assert_eq!(
            second.try_recv(),
            Some(WorldEvent::Position(WorldPosition::new(1.0, 2.0, 3.0)))
        );
        assert_eq!(second.try_recv(), None);
    }

    #[test]
    fn second_subscribe_is_refused_while_attached() {
        let bridge = EventBridge::new();
        let held = bridge.subscribe().expect("subscribe");
        assert_eq!(bridge.subscribe().err(), Some(BridgeError::Occupied));
        drop(held);
        assert!(bridge.subscribe().is_ok());
    }

    #[test]
    fn drop_releases_slot_exactly_once() {
        let bridge = EventBridge::new();
        let first = bridge.subscribe().expect("first");
        let first_id = first.id();
        drop(first);
        let second = bridge.subscribe().expect("second");
        assert_ne!(second.id(), first_id);
        // A stale release for the old id must not detach the new subscriber.
        bridge.release(first_id);
        assert!(bridge.has_subscriber());
        drop(second);
        assert!(!bridge.has_subscriber());
    }

    #[tokio::test]
    async fn release_on_panic_unwind() {
        let bridge = EventBridge::new();
        let sub = bridge.subscribe().expect("subscribe");
        let handle = tokio::spawn(async move {
            let _sub = sub;
            panic!("task failed");
        });
        assert!(handle.await.is_err());
        assert!(!bridge.has_subscriber());
    }
}
