use std::sync::Arc;

use crate::db::offers;
use crate::domain::RequestStatus;
use crate::router::handle;
use crate::tests::utils::*;

fn state_with_card() -> (Arc<crate::state::AppState>, String) {
    let state = init_test_state();
    let session = seed_caregiver(&state, "cg1", Some((0.0, 0.0)), None);
    state
        .create_request(live_request("r1", "Amal", 0.1, 0.0))
        .unwrap();

    let resp = handle(post("/flash/open", &session, "request_id=r1"), &state).unwrap();
    let body = body_string(resp);
    assert!(body.contains("Emergency request"));
    assert!(body.contains("id=\"flash-1\""));

    (state, session)
}

#[test]
fn open_card_counts_down_on_polls() {
    let (state, session) = state_with_card();

    // First poll leaves the entrance state, later polls count down.
    handle(get("/flash/1", &session), &state).unwrap();
    let body = body_string(handle(get("/flash/1", &session), &state).unwrap());
    assert!(body.contains("44s"), "expected countdown in: {body}");
}

#[test]
fn accept_freezes_the_countdown_and_prefills_the_form() {
    let (state, session) = state_with_card();
    handle(get("/flash/1", &session), &state).unwrap();

    let body = body_string(handle(post("/flash/1/accept", &session, ""), &state).unwrap());
    // Patient proposed 250; ETA derived from ~11 km at 3 min/km.
    assert!(body.contains("value=\"250\""), "price prefill missing: {body}");
    assert!(body.contains("name=\"eta_minutes\""));

    // Polls while typing must not advance the countdown.
    for _ in 0..5 {
        handle(get("/flash/1", &session), &state).unwrap();
    }
    let remaining = state.cards.snapshot(1).unwrap().remaining_secs();
    assert_eq!(remaining, 45);
}

#[test]
fn submitting_from_the_card_persists_and_confirms() {
    let (state, session) = state_with_card();
    handle(get("/flash/1", &session), &state).unwrap();
    handle(post("/flash/1/accept", &session, ""), &state).unwrap();

    let body = body_string(
        handle(
            post("/flash/1/submit", &session, "price=300&eta_minutes=20"),
            &state,
        )
        .unwrap(),
    );
    assert!(body.contains("Offer sent"), "no confirmation in: {body}");

    let count = state
        .db
        .with_conn(|conn| offers::count_for_request(conn, "r1"))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn duplicate_submit_returns_to_the_form_with_the_specific_error() {
    let (state, session) = state_with_card();
    handle(get("/flash/1", &session), &state).unwrap();

    // An offer already exists from the plain feed form.
    handle(
        post("/offers", &session, "request_id=r1&price=300&eta_minutes=30"),
        &state,
    )
    .unwrap();

    handle(post("/flash/1/accept", &session, ""), &state).unwrap();
    let body = body_string(
        handle(
            post("/flash/1/submit", &session, "price=350&eta_minutes=20"),
            &state,
        )
        .unwrap(),
    );
    assert!(body.contains("already sent an offer"), "got: {body}");
    // Still on the form, able to back out.
    assert!(body.contains("name=\"price\""));
}

#[test]
fn external_match_force_dismisses_the_card() {
    let (state, session) = state_with_card();
    handle(get("/flash/1", &session), &state).unwrap();

    state
        .transition_request("r1", RequestStatus::Matched)
        .unwrap();
    let cards = state.cards.clone();
    wait_for("card to hear the status change", || {
        cards.snapshot(1).map(|c| c.is_dismissed()).unwrap_or(true)
    });

    // The final frame explains why, then the card unmounts.
    let body = body_string(handle(get("/flash/1", &session), &state).unwrap());
    assert!(body.contains("no longer available"), "got: {body}");

    let body = body_string(handle(get("/flash/1", &session), &state).unwrap());
    assert!(!body.contains("flash-card"), "card should be unmounted");
}

#[test]
fn unknown_card_renders_nothing() {
    let state = init_test_state();
    let session = seed_caregiver(&state, "cg1", None, None);

    let body = body_string(handle(get("/flash/99", &session), &state).unwrap());
    assert_eq!(body, "");
}
