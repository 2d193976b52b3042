use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::events::Event;

/// Default number of queued events before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 256;

/// Process-wide append/notify channel for [`Event`] records.
///
/// `push` is fire-and-forget: it never blocks on a receiver and never fails
/// when no receiver exists. The queue is bounded; once full, the oldest
/// event is dropped so an unpolled bus cannot grow without limit. Events
/// from one producer are observed by any one receiver in emission order.
pub struct EventBus {
    queue: Mutex<VecDeque<Event>>,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Queue an event for its receiver. Non-blocking, infallible.
    pub fn push(&self, event: Event) {
        let mut queue = self.lock();
        if queue.len() >= self.capacity {
            queue.pop_front();
            tracing::warn!(capacity = self.capacity, "event bus full, dropped oldest event");
        }
        tracing::debug!(receiver = %event.receiver, kind = ?event.kind, "event pushed");
        queue.push_back(event);
    }

    /// Remove and return all events addressed to `receiver`, in emission
    /// order, marked acknowledged. Events for other receivers stay queued.
    pub fn take(&self, receiver: &str) -> Vec<Event> {
        let mut queue = self.lock();
        let mut taken = Vec::new();
        let mut kept = VecDeque::with_capacity(queue.len());
        for mut event in queue.drain(..) {
            if event.receiver == receiver {
                event.acknowledged = true;
                taken.push(event);
            } else {
                kept.push_back(event);
            }
        }
        *queue = kept;
        taken
    }

    /// Number of queued (unacknowledged) events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Event>> {
        // A poisoned queue still holds valid events.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, UI_RECEIVER};
    use std::path::Path;

    fn event(receiver: &str, kind: EventKind) -> Event {
        Event::lifecycle(receiver, "plan", kind, Path::new("/work"), uuid::Uuid::new_v4())
    }

    #[test]
    fn take_preserves_emission_order_and_acknowledges() {
        let bus = EventBus::new();
        bus.push(event(UI_RECEIVER, EventKind::Begin));
        bus.push(event(UI_RECEIVER, EventKind::End));

        let taken = bus.take(UI_RECEIVER);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].kind, EventKind::Begin);
        assert_eq!(taken[1].kind, EventKind::End);
        assert!(taken.iter().all(|e| e.acknowledged));
        assert!(bus.is_empty());
    }

    #[test]
    fn take_filters_by_receiver() {
        let bus = EventBus::new();
        bus.push(event(UI_RECEIVER, EventKind::Begin));
        bus.push(event("other", EventKind::Begin));

        let taken = bus.take(UI_RECEIVER);
        assert_eq!(taken.len(), 1);
        assert_eq!(bus.len(), 1);
        assert_eq!(bus.take("other").len(), 1);
    }

    #[test]
    fn push_with_no_receiver_never_blocks_or_fails() {
        let bus = EventBus::new();
        for _ in 0..10 {
            bus.push(event(UI_RECEIVER, EventKind::Begin));
        }
        assert_eq!(bus.len(), 10);
    }

    #[test]
    fn full_bus_evicts_oldest() {
        let bus = EventBus::with_capacity(2);
        bus.push(event(UI_RECEIVER, EventKind::Begin));
        bus.push(event(UI_RECEIVER, EventKind::End));
        bus.push(event(UI_RECEIVER, EventKind::Begin));

        let taken = bus.take(UI_RECEIVER);
        assert_eq!(taken.len(), 2);
        // The original begin was evicted.
        assert_eq!(taken[0].kind, EventKind::End);
        assert_eq!(taken[1].kind, EventKind::Begin);
    }

    #[test]
    fn concurrent_push_keeps_events_intact() {
        use std::sync::Arc;
        let bus = Arc::new(EventBus::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let bus = Arc::clone(&bus);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        bus.push(event(UI_RECEIVER, EventKind::Begin));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let taken = bus.take(UI_RECEIVER);
        assert_eq!(taken.len(), 100);
        assert!(taken.iter().all(|e| e.command == "plan"));
    }
}
