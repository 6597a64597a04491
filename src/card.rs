//! Flash notification card for an incoming request: a bounded decision
//! window with a pausable countdown, an inline offer form, and forced
//! dismissal when the request stops being live under the caregiver.
//!
//! The state machine is driven by explicit events (ticks arrive from the
//! page's 1 Hz poll) so every transition is testable without a clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::config::Config;
use crate::domain::{CaregiverProfile, EmergencyRequest, RequestStatus};
use crate::geo::{eta_minutes, haversine_km, round2};
use crate::live::{Hub, RequestEvent};

pub mod boundary;

/// Entrance/exit transition lengths, carried as rendering metadata.
pub const ENTER_MS: u32 = 400;
pub const EXIT_MS: u32 = 300;

/// Ticks the success confirmation stays up before auto-dismissing.
const ACCEPT_GRACE_TICKS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Declined, closed, or auto-hidden after the countdown ran out.
    Declined,
    /// The request stopped being live while the card was up.
    NoLongerAvailable,
    /// The caregiver's own offer went through.
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardState {
    Entering,
    Counting,
    OfferInput,
    Submitting,
    Accepted { grace: u32 },
    Dismissed(DismissReason),
}

#[derive(Debug, Clone)]
pub struct FlashCard {
    pub request: EmergencyRequest,
    pub distance_km: Option<f64>,
    /// Offer form fields, pre-filled on accept and kept across errors.
    pub price_input: String,
    pub eta_input: String,
    pub message_input: String,
    pub error: Option<String>,
    state: CardState,
    remaining: u32,
    invalidated: bool,
}

impl FlashCard {
    pub fn open(request: EmergencyRequest, profile: &CaregiverProfile, auto_hide_secs: u32) -> Self {
        let distance_km = profile
            .position()
            .map(|p| round2(haversine_km(p, request.coordinate())));

        // Price: the patient's proposed price wins, else the caregiver's
        // usual fee. ETA: ~3 minutes per kilometer when we know how far.
        let price_input = request
            .offered_price
            .or(profile.default_fee)
            .map(|p| p.to_string())
            .unwrap_or_default();
        let eta_input = distance_km
            .map(|d| eta_minutes(d).to_string())
            .unwrap_or_default();

        Self {
            request,
            distance_km,
            price_input,
            eta_input,
            message_input: String::new(),
            error: None,
            state: CardState::Entering,
            remaining: auto_hide_secs,
            invalidated: false,
        }
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_dismissed(&self) -> bool {
        matches!(self.state, CardState::Dismissed(_))
    }

    /// One-second heartbeat. The countdown only runs in `Counting`:
    /// while the caregiver is typing an offer (or one is in flight) the
    /// window must not close underneath them.
    pub fn tick(&mut self) {
        match self.state {
            CardState::Entering => self.state = CardState::Counting,
            CardState::Counting => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.state = CardState::Dismissed(DismissReason::Declined);
                }
            }
            CardState::OfferInput | CardState::Submitting => {}
            CardState::Accepted { grace } => {
                if grace <= 1 {
                    self.state = CardState::Dismissed(DismissReason::Completed);
                } else {
                    self.state = CardState::Accepted { grace: grace - 1 };
                }
            }
            CardState::Dismissed(_) => {}
        }
    }

    /// "Accept" opens the offer form; the countdown freezes.
    pub fn accept(&mut self) {
        if matches!(self.state, CardState::Entering | CardState::Counting) {
            self.state = CardState::OfferInput;
        }
    }

    /// Back out of the offer form; the countdown resumes where it was.
    pub fn cancel(&mut self) {
        if self.state == CardState::OfferInput {
            self.state = CardState::Counting;
        }
    }

    pub fn begin_submit(&mut self, price: String, eta: String, message: String) {
        if self.state == CardState::OfferInput {
            self.price_input = price;
            self.eta_input = eta;
            self.message_input = message;
            self.error = None;
            self.state = CardState::Submitting;
        }
    }

    pub fn submit_ok(&mut self) {
        if self.state == CardState::Submitting {
            self.state = CardState::Accepted {
                grace: ACCEPT_GRACE_TICKS,
            };
        }
    }

    /// A failed submission returns to the form with the error shown —
    /// unless the request was invalidated while the attempt was in
    /// flight, in which case the deferred dismissal lands now.
    pub fn submit_err(&mut self, message: impl Into<String>) {
        if self.state != CardState::Submitting {
            return;
        }
        if self.invalidated {
            self.state = CardState::Dismissed(DismissReason::NoLongerAvailable);
        } else {
            self.error = Some(message.into());
            self.state = CardState::OfferInput;
        }
    }

    pub fn dismiss(&mut self) {
        if !self.is_dismissed() {
            self.state = CardState::Dismissed(DismissReason::Declined);
        }
    }

    /// External status change for this card's request. Anything away
    /// from `live` force-dismisses from any sub-state, except while this
    /// caregiver's own submission is resolving (`Submitting`/`Accepted`):
    /// yanking the card mid-flight would hide the outcome of their own
    /// action, so the dismissal is deferred until the flow settles.
    pub fn request_update(&mut self, status: RequestStatus) {
        if status == RequestStatus::Live {
            return;
        }
        self.request.status = status;
        match self.state {
            CardState::Submitting | CardState::Accepted { .. } => self.invalidated = true,
            CardState::Dismissed(_) => {}
            _ => self.state = CardState::Dismissed(DismissReason::NoLongerAvailable),
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    cards: HashMap<u64, FlashCard>,
}

/// Process-wide set of mounted flash cards, shared between the HTTP
/// workers and the hub listener thread.
#[derive(Clone, Default)]
pub struct CardRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(
        &self,
        request: EmergencyRequest,
        profile: &CaregiverProfile,
        config: &Config,
    ) -> u64 {
        let card = FlashCard::open(request, profile, config.auto_hide_secs);
        let mut inner = self.inner.lock().expect("card registry poisoned");
        inner.next_id += 1;
        let id = inner.next_id;
        inner.cards.insert(id, card);
        id
    }

    /// Run `f` against a mounted card, if it is still there.
    pub fn with_card<T>(&self, id: u64, f: impl FnOnce(&mut FlashCard) -> T) -> Option<T> {
        let mut inner = self.inner.lock().expect("card registry poisoned");
        inner.cards.get_mut(&id).map(f)
    }

    pub fn snapshot(&self, id: u64) -> Option<FlashCard> {
        let inner = self.inner.lock().expect("card registry poisoned");
        inner.cards.get(&id).cloned()
    }

    pub fn remove(&self, id: u64) -> Option<FlashCard> {
        let mut inner = self.inner.lock().expect("card registry poisoned");
        inner.cards.remove(&id)
    }

    /// Route a request event to every card showing that request.
    pub fn apply_event(&self, event: &RequestEvent) {
        let (request_id, status) = match event {
            RequestEvent::Update(r) => (r.id.as_str(), r.status),
            // A deleted request is gone for good; treat it as cancelled.
            RequestEvent::Delete(id) => (id.as_str(), RequestStatus::Cancelled),
            RequestEvent::Insert(_) => return,
        };

        let mut inner = self.inner.lock().expect("card registry poisoned");
        for card in inner
            .cards
            .values_mut()
            .filter(|c| c.request.id == request_id)
        {
            card.request_update(status);
        }
    }

    /// Listen for request events until the hub closes.
    pub fn spawn_worker(&self, hub: &Hub) -> JoinHandle<()> {
        let registry = self.clone();
        let (guard, rx) = hub.subscribe(None);
        thread::spawn(move || {
            let _guard = guard;
            for event in rx.iter() {
                registry.apply_event(&event);
            }
            debug!("card registry worker: hub closed, exiting");
        })
    }
}
