use std::net::SocketAddr;

use astra::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod audio;
mod auth;
mod card;
mod config;
mod db;
mod domain;
mod errors;
mod feed;
mod geo;
mod geoloc;
mod live;
mod offers;
mod responses;
mod router;
mod state;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::Config::load();

    let state = match state::AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("startup failed: {e}");
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match state.config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("invalid bind address {:?}: {e}", state.config.bind_addr);
            std::process::exit(1);
        }
    };

    info!("listening on http://{addr}");
    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match router::handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => responses::error_to_response(err),
    });

    if let Err(e) = result {
        error!("server ended with error: {e}");
    }

    info!("server shut down cleanly");
}
