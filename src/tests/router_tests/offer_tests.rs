use std::sync::Arc;

use crate::db::offers;
use crate::router::handle;
use crate::tests::utils::*;

fn state_with_request() -> (Arc<crate::state::AppState>, String) {
    let state = init_test_state();
    let session = seed_caregiver(&state, "cg1", Some((0.0, 0.0)), None);
    state
        .create_request(live_request("r1", "Amal", 0.1, 0.0))
        .unwrap();
    (state, session)
}

#[test]
fn posting_an_offer_persists_and_confirms() {
    let (state, session) = state_with_request();

    let form = "request_id=r1&price=300&eta_minutes=30&message=On+my+way";
    let resp = handle(post("/offers", &session, form), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Offer sent"));

    let count = state
        .db
        .with_conn(|conn| offers::count_for_request(conn, "r1"))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn second_offer_gets_the_already_sent_message() {
    let (state, session) = state_with_request();

    let form = "request_id=r1&price=300&eta_minutes=30";
    handle(post("/offers", &session, form), &state).unwrap();

    let body = body_string(handle(post("/offers", &session, form), &state).unwrap());
    assert!(
        body.contains("already sent an offer"),
        "duplicate must be called out specifically, got: {body}"
    );
    assert!(!body.contains("try again"));

    let count = state
        .db
        .with_conn(|conn| offers::count_for_request(conn, "r1"))
        .unwrap();
    assert_eq!(count, 1, "duplicate attempt must not persist a second offer");
}

#[test]
fn missing_eta_blocks_submission_without_a_write() {
    let (state, session) = state_with_request();

    let form = "request_id=r1&price=300&eta_minutes=";
    let body = body_string(handle(post("/offers", &session, form), &state).unwrap());
    assert!(body.contains("ETA is required"));

    let count = state
        .db
        .with_conn(|conn| offers::count_for_request(conn, "r1"))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn offer_marks_the_feed_row_as_sent() {
    let (state, session) = state_with_request();
    let feed = Arc::clone(&state.feed);
    wait_for("feed to absorb the request", || {
        feed.lock().unwrap().len() == 1
    });

    let form = "request_id=r1&price=300&eta_minutes=30";
    handle(post("/offers", &session, form), &state).unwrap();

    let body = body_string(handle(get("/feed", &session), &state).unwrap());
    assert!(body.contains("Offer sent"));
    assert!(!body.contains("Send offer"), "action button should be gone");
}
