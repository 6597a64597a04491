//! Offer submission: validate caregiver input, best-effort geolocate,
//! write the offer. One durable write; notifying the patient is the
//! platform's job, not ours.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{offers, requests, Database};
use crate::domain::{CaregiverOffer, OfferDraft, OfferStatus, RequestStatus};
use crate::errors::ServerError;
use crate::geo::{haversine_km, round2};
use crate::geoloc::Locator;

pub fn submit_offer(
    db: &Database,
    locator: &dyn Locator,
    caregiver_id: &str,
    draft: &OfferDraft,
) -> Result<CaregiverOffer, ServerError> {
    // Validation gates everything: an invalid draft never reaches storage.
    let valid = draft.validate()?;

    let request = db
        .with_conn(|conn| requests::get(conn, &valid.request_id))?
        .ok_or_else(|| ServerError::Validation("this request no longer exists".into()))?;

    if request.status != RequestStatus::Live {
        return Err(ServerError::Validation(
            "this request is no longer taking offers".into(),
        ));
    }

    // Geolocation is best-effort: any failure means null coordinates,
    // never a blocked submission.
    let position = match locator.locate() {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("geolocation failed for caregiver {caregiver_id}: {e}");
            None
        }
    };
    let distance_km = position.map(|p| round2(haversine_km(p, request.coordinate())));

    let offer = CaregiverOffer {
        id: Uuid::new_v4().to_string(),
        request_id: request.id.clone(),
        caregiver_id: caregiver_id.to_string(),
        price: valid.price,
        eta_minutes: valid.eta_minutes,
        message: valid.message,
        latitude: position.map(|p| p.lat),
        longitude: position.map(|p| p.lon),
        distance_km,
        status: OfferStatus::Pending,
        created_at: Utc::now().timestamp(),
    };

    db.with_conn(|conn| offers::insert_offer(conn, &offer))?;

    info!(
        "offer {} submitted by {} for request {}",
        offer.id, caregiver_id, request.id
    );
    Ok(offer)
}
