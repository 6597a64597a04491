//! Caregiver-facing live feed: a typed store of open requests keyed by
//! id, updated incrementally from subscription events instead of
//! re-fetching the whole list on every change.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::domain::{CaregiverProfile, EmergencyRequest, RequestStatus};
use crate::geo::{haversine_km, round2};
use crate::live::{Hub, RequestEvent};

/// Client-side mirror of the live slice of the request collection.
#[derive(Default)]
pub struct FeedStore {
    by_id: HashMap<String, EmergencyRequest>,
    /// Bumped on every applied change; the feed partial polls against it.
    version: u64,
    /// Version at which a new live request last arrived (audio cue).
    alert_version: u64,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the initial "list live requests" query result.
    pub fn seed(&mut self, requests: Vec<EmergencyRequest>) {
        self.by_id = requests
            .into_iter()
            .filter(|r| r.status == RequestStatus::Live)
            .map(|r| (r.id.clone(), r))
            .collect();
        self.version += 1;
    }

    /// Incremental update: insert adds, update replaces (or removes once
    /// the request is no longer live), delete removes.
    pub fn apply(&mut self, event: &RequestEvent) {
        let newly_live = match event {
            RequestEvent::Insert(r) | RequestEvent::Update(r) => {
                if r.status == RequestStatus::Live {
                    self.by_id.insert(r.id.clone(), r.clone()).is_none()
                } else {
                    self.by_id.remove(&r.id);
                    false
                }
            }
            RequestEvent::Delete(id) => {
                self.by_id.remove(id);
                false
            }
        };

        self.version += 1;
        if newly_live {
            self.alert_version = self.version;
        }
    }

    /// Live requests, newest first.
    pub fn snapshot(&self) -> Vec<EmergencyRequest> {
        let mut out: Vec<_> = self.by_id.values().cloned().collect();
        out.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        out
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn alert_version(&self) -> u64 {
        self.alert_version
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// One feed row, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub request: EmergencyRequest,
    pub distance_km: Option<f64>,
    pub offer_sent: bool,
}

/// Radius gating. With a known position the caregiver sees requests
/// within their radius (boundary inclusive), closest last-arrival first;
/// with no position, every live request is shown undistanced.
pub fn visible_for(
    requests: Vec<EmergencyRequest>,
    profile: &CaregiverProfile,
    default_radius_km: f64,
    offered: &HashSet<String>,
) -> Vec<FeedItem> {
    let position = profile.position();
    let radius = profile.radius_km.unwrap_or(default_radius_km);

    requests
        .into_iter()
        .filter_map(|request| {
            let distance_km = position.map(|p| round2(haversine_km(p, request.coordinate())));
            if let Some(d) = distance_km {
                if d > radius {
                    return None;
                }
            }
            let offer_sent = offered.contains(&request.id);
            Some(FeedItem {
                request,
                distance_km,
                offer_sent,
            })
        })
        .collect()
}

/// Owns the process-wide feed subscription: applies hub events to the
/// shared store until the hub side goes away.
pub struct FeedWorker;

impl FeedWorker {
    pub fn spawn(hub: &Hub, store: Arc<Mutex<FeedStore>>) -> JoinHandle<()> {
        let (guard, rx) = hub.subscribe(None);
        thread::spawn(move || {
            let _guard = guard;
            for event in rx.iter() {
                match store.lock() {
                    Ok(mut feed) => feed.apply(&event),
                    Err(e) => {
                        warn!("feed store lock poisoned, dropping event: {e}");
                        return;
                    }
                }
            }
            debug!("feed worker: hub closed, exiting");
        })
    }
}
