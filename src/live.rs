//! In-process stand-in for the hosted platform's real-time channel:
//! register interest in request-collection events with an optional
//! status filter, receive them over a channel, unsubscribe on drop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{EmergencyRequest, RequestStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum RequestEvent {
    Insert(EmergencyRequest),
    Update(EmergencyRequest),
    Delete(String),
}

impl RequestEvent {
    pub fn request_id(&self) -> &str {
        match self {
            RequestEvent::Insert(r) | RequestEvent::Update(r) => &r.id,
            RequestEvent::Delete(id) => id,
        }
    }

    /// Status carried by the event's row. Deletes have none: the old
    /// row is gone, so they pass every filter.
    fn status(&self) -> Option<RequestStatus> {
        match self {
            RequestEvent::Insert(r) | RequestEvent::Update(r) => Some(r.status),
            RequestEvent::Delete(_) => None,
        }
    }
}

struct Entry {
    id: u64,
    filter: Option<RequestStatus>,
    tx: Sender<RequestEvent>,
}

impl Entry {
    fn wants(&self, event: &RequestEvent) -> bool {
        match (self.filter, event.status()) {
            (Some(want), Some(got)) => want == got,
            _ => true,
        }
    }
}

#[derive(Default)]
struct HubInner {
    subs: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
}

/// Fan-out point for request-store events. Cheap to clone.
#[derive(Clone, Default)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest. The guard unsubscribes when dropped; events
    /// arrive on the returned receiver.
    pub fn subscribe(
        &self,
        filter: Option<RequestStatus>,
    ) -> (Subscription, Receiver<RequestEvent>) {
        let (tx, rx) = channel();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subs
            .lock()
            .expect("hub subscriber list poisoned")
            .push(Entry { id, filter, tx });
        let guard = Subscription {
            id,
            inner: Arc::clone(&self.inner),
        };
        (guard, rx)
    }

    /// Deliver an event to every matching subscriber. Subscribers whose
    /// receiving end is gone are pruned here.
    pub fn publish(&self, event: &RequestEvent) {
        let mut subs = self.inner.subs.lock().expect("hub subscriber list poisoned");
        subs.retain(|entry| {
            if !entry.wants(event) {
                return true;
            }
            match entry.tx.send(event.clone()) {
                Ok(()) => true,
                Err(_) => {
                    debug!("pruning disconnected subscriber {}", entry.id);
                    false
                }
            }
        });
    }

    /// Drop every subscription, closing all receivers. Used on shutdown.
    pub fn close(&self) {
        self.inner
            .subs
            .lock()
            .expect("hub subscriber list poisoned")
            .clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subs
            .lock()
            .expect("hub subscriber list poisoned")
            .len()
    }
}

/// A registered interest; dropping it releases the hub-side entry.
pub struct Subscription {
    id: u64,
    inner: Arc<HubInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut subs) = self.inner.subs.lock() {
            subs.retain(|entry| entry.id != self.id);
        }
    }
}
