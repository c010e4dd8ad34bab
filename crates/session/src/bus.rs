//! Scan event bus with scoped, revocable subscriptions.
//!
//! Publishing is the single atomic write-and-notify step; each subscriber
//! owns a FIFO queue drained on its own schedule. Dropping a subscription
//! deregisters it, so events are never delivered to a torn-down session.
//! The bus is single-threaded by design; handles are not `Send`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use shelfmark_core::ScanEvent;

type Queue = Rc<RefCell<VecDeque<ScanEvent>>>;

#[derive(Debug, Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<(u64, Queue)>,
}

/// Routes decoded scan events to live subscriptions.
#[derive(Debug, Clone, Default)]
pub struct ScanBus {
    inner: Rc<RefCell<BusInner>>,
}

impl ScanBus {
    /// New bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; the handle revokes itself on drop.
    pub fn subscribe(&self) -> ScanSubscription {
        let queue: Queue = Rc::new(RefCell::new(VecDeque::new()));
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::clone(&queue)));
        ScanSubscription {
            bus: Rc::downgrade(&self.inner),
            id,
            queue,
        }
    }

    /// Deliver an event to every live subscriber.
    pub fn publish(&self, event: ScanEvent) {
        let inner = self.inner.borrow();
        for (_, queue) in &inner.subscribers {
            queue.borrow_mut().push_back(event.clone());
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// Revocable handle to a bus registration.
pub struct ScanSubscription {
    bus: Weak<RefCell<BusInner>>,
    id: u64,
    queue: Queue,
}

impl ScanSubscription {
    /// Pop the oldest undelivered event, if any.
    pub fn try_recv(&self) -> Option<ScanEvent> {
        self.queue.borrow_mut().pop_front()
    }

    /// Number of queued, undelivered events.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Drop for ScanSubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut()
                .subscribers
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for ScanSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSubscription")
            .field("id", &self.id)
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_drain_in_fifo_order() {
        let bus = ScanBus::new();
        let sub = bus.subscribe();
        bus.publish(ScanEvent::new("1", "EAN13"));
        bus.publish(ScanEvent::new("2", "EAN13"));

        assert_eq!(sub.try_recv().unwrap().data, "1");
        assert_eq!(sub.try_recv().unwrap().data, "2");
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn every_live_subscriber_receives_a_copy() {
        let bus = ScanBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(ScanEvent::new("shared", "EAN13"));

        assert_eq!(a.try_recv().unwrap().data, "shared");
        assert_eq!(b.try_recv().unwrap().data, "shared");
    }

    #[test]
    fn dropping_the_handle_deregisters() {
        let bus = ScanBus::new();
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        // Publishing after teardown reaches nobody and does not panic.
        bus.publish(ScanEvent::new("ghost", "EAN13"));
    }

    #[test]
    fn soft_trigger_flag_survives_delivery() {
        let bus = ScanBus::new();
        let sub = bus.subscribe();
        bus.publish(ScanEvent::soft("cam", "QRCODE"));
        assert!(sub.try_recv().unwrap().soft_triggered);
    }
}
