use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use mapgate_session::GatewaySessionLayer;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{api_key, health, map, search};
use crate::state::AppState;

/// Gateway routes behind the session layer, a health probe, and the static
/// single-page app as fallback for every other path.
pub fn build_router(state: AppState, sessions: GatewaySessionLayer) -> Router {
    let static_dir = Path::new(&state.config.app.static_dir).to_path_buf();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let api_routes = Router::new()
        .route("/api/setApiKey", post(api_key::set_api_key))
        .route("/api/checkApiKey", get(api_key::check_api_key))
        .route("/api/map-script", get(map::map_script))
        .route("/api/map-proxy/{*path}", get(map::map_resource))
        .route("/api/suggest", post(search::suggest))
        .route("/api/geocode", post(search::geocode))
        .layer(sessions);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .fallback_service(spa)
        .with_state(state)
        // Default span omits headers: the session cookie stays out of logs.
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
