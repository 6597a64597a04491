use std::collections::HashMap;
use std::io::Read;

use astra::Request;
use chrono::Utc;
use maud::html;

use crate::auth::{self, sessions};
use crate::card::boundary;
use crate::db::{caregivers, offers as offer_store};
use crate::domain::{CaregiverProfile, OfferDraft};
use crate::errors::{ResultResp, ServerError};
use crate::feed::visible_for;
use crate::geoloc::ProfileLocator;
use crate::offers::submit_offer;
use crate::responses::{css_response, html_fragment, html_response, wav_response};
use crate::state::AppState;
use crate::templates::components::flash::flash_card;
use crate::templates::components::request_card::{offer_form_with_error, offer_sent_mark};
use crate::templates::error_toast;
use crate::templates::pages::{feed_list, feed_page, home_page, FeedVm};

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    // Session resolution happens before any body reads.
    let caregiver = current_caregiver(&req, state)?;

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => html_response(home_page(caregiver.is_some())),

        ("GET", "/feed") => {
            let profile = require_caregiver(caregiver)?;
            let vm = feed_vm(state, &profile, None)?;
            html_response(feed_page(&vm))
        }

        ("GET", "/feed/cards") => {
            let profile = require_caregiver(caregiver)?;
            let since = parse_query(&req)
                .get("since")
                .and_then(|v| v.parse::<u64>().ok());
            let vm = feed_vm(state, &profile, since)?;
            html_fragment(feed_list(&vm))
        }

        ("GET", "/assets/alert.wav") => wav_response(state.alert_wav.clone()),

        ("GET", "/static/main.css") => css_response(include_str!("../static/main.css")),

        ("POST", "/offers") => {
            let profile = require_caregiver(caregiver)?;
            let form = parse_form(&mut req)?;
            post_offer(state, &profile, &form)
        }

        ("POST", "/flash/open") => {
            let profile = require_caregiver(caregiver)?;
            let form = parse_form(&mut req)?;
            open_flash(state, &profile, &form)
        }

        _ => {
            // /flash/{id} and /flash/{id}/{action}
            if let Some(rest) = path.strip_prefix("/flash/") {
                let profile = require_caregiver(caregiver)?;
                return flash_route(state, &profile, method.as_str(), rest, &mut req);
            }
            Err(ServerError::NotFound)
        }
    }
}

fn current_caregiver(
    req: &Request,
    state: &AppState,
) -> Result<Option<CaregiverProfile>, ServerError> {
    let Some(token) = req
        .headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(auth::session_token_from_cookie)
    else {
        return Ok(None);
    };

    let token = token.to_string();
    let now = Utc::now().timestamp();
    state.db.with_conn(|conn| {
        let Some(id) = sessions::load_caregiver_from_session(conn, &token, now)? else {
            return Ok(None);
        };
        caregivers::get_profile(conn, &id)
    })
}

fn require_caregiver(
    caregiver: Option<CaregiverProfile>,
) -> Result<CaregiverProfile, ServerError> {
    caregiver.ok_or_else(|| ServerError::Unauthorized("sign in to view live requests".into()))
}

fn feed_vm(
    state: &AppState,
    profile: &CaregiverProfile,
    since: Option<u64>,
) -> Result<FeedVm, ServerError> {
    let (snapshot, version, alert_version) = {
        let feed = state.feed.lock().map_err(|_| ServerError::InternalError)?;
        (feed.snapshot(), feed.version(), feed.alert_version())
    };

    let offered = state
        .db
        .with_conn(|conn| offer_store::offered_request_ids(conn, &profile.id))?;

    let items = visible_for(snapshot, profile, state.config.default_radius_km, &offered);

    Ok(FeedVm {
        caregiver_name: profile.display_name.clone(),
        items,
        version,
        play_alert: since.is_some_and(|s| alert_version > s),
    })
}

fn post_offer(
    state: &AppState,
    profile: &CaregiverProfile,
    form: &HashMap<String, String>,
) -> ResultResp {
    let draft = draft_from_form(form);
    let locator = ProfileLocator::new(&state.db, &profile.id);

    match submit_offer(&state.db, &locator, &profile.id, &draft) {
        Ok(_) => html_fragment(offer_sent_mark()),
        Err(err) => html_fragment(offer_form_with_error(&draft.request_id, error_toast(&err))),
    }
}

fn draft_from_form(form: &HashMap<String, String>) -> OfferDraft {
    OfferDraft {
        request_id: form.get("request_id").cloned().unwrap_or_default(),
        price: form.get("price").cloned().unwrap_or_default(),
        eta_minutes: form.get("eta_minutes").cloned().unwrap_or_default(),
        message: form.get("message").cloned(),
    }
}

fn open_flash(
    state: &AppState,
    profile: &CaregiverProfile,
    form: &HashMap<String, String>,
) -> ResultResp {
    let request_id = form
        .get("request_id")
        .ok_or_else(|| ServerError::BadRequest("missing request_id".into()))?;

    let request = state
        .db
        .with_conn(|conn| crate::db::requests::get(conn, request_id))?
        .ok_or(ServerError::NotFound)?;

    let card_id = state.cards.open(request, profile, &state.config);
    render_card(state, card_id)
}

fn flash_route(
    state: &AppState,
    profile: &CaregiverProfile,
    method: &str,
    rest: &str,
    req: &mut Request,
) -> ResultResp {
    let mut parts = rest.splitn(2, '/');
    let card_id: u64 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or(ServerError::NotFound)?;
    let action = parts.next();

    match (method, action) {
        // The 1 Hz poll is the card's heartbeat.
        ("GET", None) => {
            state.cards.with_card(card_id, |card| card.tick());
            render_card(state, card_id)
        }
        ("POST", Some("accept")) => {
            state.cards.with_card(card_id, |card| card.accept());
            render_card(state, card_id)
        }
        ("POST", Some("cancel")) => {
            state.cards.with_card(card_id, |card| card.cancel());
            render_card(state, card_id)
        }
        ("POST", Some("dismiss")) => {
            state.cards.with_card(card_id, |card| card.dismiss());
            render_card(state, card_id)
        }
        ("POST", Some("submit")) => {
            let form = parse_form(req)?;
            submit_flash(state, profile, card_id, &form)
        }
        _ => Err(ServerError::NotFound),
    }
}

fn submit_flash(
    state: &AppState,
    profile: &CaregiverProfile,
    card_id: u64,
    form: &HashMap<String, String>,
) -> ResultResp {
    let price = form.get("price").cloned().unwrap_or_default();
    let eta = form.get("eta_minutes").cloned().unwrap_or_default();
    let message = form.get("message").cloned().unwrap_or_default();

    let request_id = state.cards.with_card(card_id, |card| {
        card.begin_submit(price.clone(), eta.clone(), message.clone());
        card.request.id.clone()
    });
    let Some(request_id) = request_id else {
        return render_card(state, card_id);
    };

    let draft = OfferDraft {
        request_id,
        price,
        eta_minutes: eta,
        message: Some(message),
    };
    let locator = ProfileLocator::new(&state.db, &profile.id);
    let outcome = submit_offer(&state.db, &locator, &profile.id, &draft);

    state.cards.with_card(card_id, |card| match &outcome {
        Ok(_) => card.submit_ok(),
        Err(ServerError::DuplicateOffer) => {
            card.submit_err("You already sent an offer for this request.")
        }
        Err(ServerError::Validation(msg)) => card.submit_err(msg.clone()),
        Err(_) => card.submit_err("Failed to submit, please try again."),
    });

    render_card(state, card_id)
}

/// Render a mounted card through the crash boundary. A dismissed card is
/// unmounted after its final (exit) frame; a panicking render unmounts
/// immediately and contributes nothing.
fn render_card(state: &AppState, card_id: u64) -> ResultResp {
    let Some(card) = state.cards.snapshot(card_id) else {
        return html_fragment(html! {});
    };

    let markup = boundary::mount(
        || flash_card(card_id, &card),
        || {
            state.cards.remove(card_id);
        },
    );

    if card.is_dismissed() {
        state.cards.remove(card_id);
    }
    html_fragment(markup)
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if let Some(q) = req.uri().query() {
        for (k, v) in url::form_urlencoded::parse(q.as_bytes()) {
            map.insert(k.into_owned(), v.into_owned());
        }
    }

    map
}

fn parse_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;

    let mut map = HashMap::new();
    for (k, v) in url::form_urlencoded::parse(&body) {
        map.insert(k.into_owned(), v.into_owned());
    }
    Ok(map)
}
