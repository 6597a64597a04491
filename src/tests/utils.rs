use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use astra::{Body, Response};
use chrono::Utc;
use http::{Method, Request};

use crate::auth::sessions::create_session;
use crate::config::Config;
use crate::db::caregivers;
use crate::domain::{CaregiverProfile, EmergencyRequest, RequestStatus, Urgency};
use crate::state::AppState;

static NEXT_DB: AtomicU64 = AtomicU64::new(0);

/// Fresh app state over a throwaway database using the production schema.
pub fn init_test_state() -> Arc<AppState> {
    let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "router_test_{}_{n}.sqlite",
        std::process::id()
    ));
    let config = Config {
        db_path: path.to_string_lossy().to_string(),
        ..Config::default()
    };
    AppState::new(config).expect("failed to build test state")
}

/// Insert a caregiver and hand back a valid session token.
pub fn seed_caregiver(
    state: &AppState,
    id: &str,
    position: Option<(f64, f64)>,
    radius_km: Option<f64>,
) -> String {
    let now = Utc::now().timestamp();
    state
        .db
        .with_conn(|conn| {
            caregivers::insert_profile(
                conn,
                &CaregiverProfile {
                    id: id.into(),
                    display_name: format!("Caregiver {id}"),
                    city: "Cairo".into(),
                    service_codes: vec!["wound_care".into()],
                    radius_km,
                    default_fee: Some(300),
                    latitude: position.map(|p| p.0),
                    longitude: position.map(|p| p.1),
                },
                now,
            )?;
            create_session(conn, id, now)
        })
        .expect("failed to seed caregiver")
}

pub fn live_request(id: &str, patient: &str, lat: f64, lon: f64) -> EmergencyRequest {
    EmergencyRequest {
        id: id.into(),
        patient_name: patient.into(),
        latitude: lat,
        longitude: lon,
        address: "12 Nile St".into(),
        city: "Cairo".into(),
        service_codes: vec!["injection".into()],
        urgency: Urgency::Critical,
        offered_price: Some(250),
        notes: None,
        status: RequestStatus::Live,
        created_at: Utc::now().timestamp(),
    }
}

pub fn get(path: &str, session: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("Cookie", format!("session={session}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post(path: &str, session: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Cookie", format!("session={session}"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

/// Poll until the background workers caught up.
pub fn wait_for(what: &str, cond: impl Fn() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("timed out waiting for {what}");
}
