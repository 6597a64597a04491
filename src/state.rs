use std::sync::{Arc, Mutex};

use tracing::info;

use crate::audio::alert_tone_wav;
use crate::card::CardRegistry;
use crate::config::Config;
use crate::db::{init_db, requests, Database};
use crate::domain::{EmergencyRequest, RequestStatus};
use crate::errors::ServerError;
use crate::feed::{FeedStore, FeedWorker};
use crate::live::{Hub, RequestEvent};

/// Everything the router needs, shared across astra's worker threads.
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub hub: Hub,
    pub feed: Arc<Mutex<FeedStore>>,
    pub cards: CardRegistry,
    pub alert_wav: Vec<u8>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, ServerError> {
        let db = Database::new(config.db_path.as_str());
        init_db(&db)?;

        let hub = Hub::new();
        let feed = Arc::new(Mutex::new(FeedStore::new()));
        FeedWorker::spawn(&hub, Arc::clone(&feed));

        let cards = CardRegistry::new();
        cards.spawn_worker(&hub);

        // Mirror the current live slice before any events flow.
        let live = db.with_conn(|conn| requests::list_live(conn))?;
        info!("seeding feed with {} live requests", live.len());
        feed.lock()
            .map_err(|_| ServerError::InternalError)?
            .seed(live);

        Ok(Arc::new(Self {
            db,
            config,
            hub,
            feed,
            cards,
            alert_wav: alert_tone_wav(),
        }))
    }

    /// Seam for the patient-facing flow (and tests): a request write
    /// that also notifies every live-feed and card subscriber.
    pub fn create_request(&self, req: EmergencyRequest) -> Result<(), ServerError> {
        self.db.with_conn(|conn| requests::insert(conn, &req))?;
        self.hub.publish(&RequestEvent::Insert(req));
        Ok(())
    }

    /// Status transition seam. Returns false if the request is unknown.
    pub fn transition_request(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<bool, ServerError> {
        let updated = self
            .db
            .with_conn(|conn| requests::set_status(conn, id, status))?;
        match updated {
            Some(request) => {
                self.hub.publish(&RequestEvent::Update(request));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
