use std::sync::Arc;

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::*;

#[test]
fn feed_requires_a_session() {
    let state = init_test_state();

    let req = http::Request::builder()
        .method(http::Method::GET)
        .uri("/feed")
        .body(astra::Body::empty())
        .unwrap();

    match handle(req, &state) {
        Err(err) => assert!(matches!(err, ServerError::Unauthorized(_))),
        Ok(_) => panic!("feed must not render without a session"),
    }
}

#[test]
fn feed_shows_nearby_requests_and_hides_far_ones() {
    let state = init_test_state();
    // Caregiver at the origin with a 50 km radius.
    let session = seed_caregiver(&state, "cg1", Some((0.0, 0.0)), Some(50.0));

    // ~11 km and ~111 km away.
    state
        .create_request(live_request("near", "Amal Near", 0.1, 0.0))
        .unwrap();
    state
        .create_request(live_request("far", "Farid Far", 1.0, 0.0))
        .unwrap();
    let feed = Arc::clone(&state.feed);
    wait_for("feed to absorb both requests", || {
        feed.lock().unwrap().len() == 2
    });

    let resp = handle(get("/feed", &session), &state).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("Amal Near"), "nearby request missing");
    assert!(!body.contains("Farid Far"), "out-of-radius request shown");
    assert!(body.contains("km away"));
}

#[test]
fn feed_without_position_shows_everything() {
    let state = init_test_state();
    let session = seed_caregiver(&state, "cg1", None, Some(1.0));

    state
        .create_request(live_request("far", "Farid Far", 50.0, 50.0))
        .unwrap();
    let feed = Arc::clone(&state.feed);
    wait_for("feed to absorb the request", || {
        feed.lock().unwrap().len() == 1
    });

    let body = body_string(handle(get("/feed", &session), &state).unwrap());
    assert!(body.contains("Farid Far"));
}

#[test]
fn matched_request_drops_out_of_the_feed() {
    let state = init_test_state();
    let session = seed_caregiver(&state, "cg1", None, None);

    state
        .create_request(live_request("r1", "Amal", 0.1, 0.0))
        .unwrap();
    let feed = Arc::clone(&state.feed);
    wait_for("feed to absorb the request", || {
        feed.lock().unwrap().len() == 1
    });

    state
        .transition_request("r1", crate::domain::RequestStatus::Matched)
        .unwrap();
    wait_for("feed to drop the matched request", || {
        feed.lock().unwrap().is_empty()
    });

    let body = body_string(handle(get("/feed", &session), &state).unwrap());
    assert!(body.contains("No live requests right now."));
}

#[test]
fn feed_partial_cues_audio_only_for_new_arrivals() {
    let state = init_test_state();
    let session = seed_caregiver(&state, "cg1", None, None);

    state
        .create_request(live_request("r1", "Amal", 0.1, 0.0))
        .unwrap();
    let feed = Arc::clone(&state.feed);
    wait_for("feed to absorb the request", || {
        feed.lock().unwrap().len() == 1
    });
    let version = feed.lock().unwrap().version();

    // Polling from before the arrival hears the chime.
    let body = body_string(handle(get("/feed/cards?since=0", &session), &state).unwrap());
    assert!(body.contains("/assets/alert.wav"));

    // Polling from the current version does not.
    let uri = format!("/feed/cards?since={version}");
    let body = body_string(handle(get(&uri, &session), &state).unwrap());
    assert!(!body.contains("/assets/alert.wav"));
}

#[test]
fn alert_asset_is_served_as_wav() {
    let state = init_test_state();
    let session = seed_caregiver(&state, "cg1", None, None);

    let resp = handle(get("/assets/alert.wav", &session), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "audio/wav"
    );
}
