//! HTTP surface: router, handlers, and the audit middleware

pub mod audit;
pub mod handlers;
pub mod page;

use crate::audit::RequestAuditLog;
use crate::locations::LocationCache;
use crate::relay::{GeocodingRelay, TileRelay};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Process-lifetime singletons handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub tiles: Arc<TileRelay>,
    pub geocoding: Arc<GeocodingRelay>,
    pub locations: Arc<LocationCache>,
    pub audit: Arc<RequestAuditLog>,
    pub relay_enabled: bool,
}

/// Builds the router. The relay endpoints are mounted only when an
/// upstream-relay mode is active; without one the map client calls the
/// third-party services directly.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::page))
        .route("/hz", get(handlers::health))
        .route("/robots.txt", get(handlers::robots))
        .route("/api/locations", get(handlers::api_locations));

    if state.relay_enabled {
        router = router
            .route("/proxy/tiles/{*tile}", get(handlers::tile))
            .route("/proxy/nominatim", get(handlers::nominatim));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            audit::record_request,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
