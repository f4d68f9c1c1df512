//! Request handlers

use crate::locations::ClientLocation;
use crate::relay::{RelayError, SearchResponse, TileResponse};
use crate::server::{page, AppState};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

// Default map center (Wroclaw, Poland).
const DEFAULT_LAT: f64 = 51.109970;
const DEFAULT_LON: f64 = 17.031984;

pub async fn health() -> &'static str {
    "OK"
}

pub async fn robots() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

#[derive(Deserialize)]
pub struct PageParams {
    lat: Option<String>,
    lon: Option<String>,
}

/// Renders the map page, centered on the requested coordinates when both
/// are present and valid.
pub async fn page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let mut lat = DEFAULT_LAT;
    let mut lon = DEFAULT_LON;

    if let (Some(lat_param), Some(lon_param)) = (params.lat, params.lon) {
        match lat_param.parse::<f64>() {
            Ok(value) => lat = value,
            Err(_) => warn!(value = %lat_param, "invalid latitude value"),
        }
        match lon_param.parse::<f64>() {
            Ok(value) => lon = value,
            Err(_) => warn!(value = %lon_param, "invalid longitude value"),
        }
    }

    let locations = state.locations.get().await;
    let locations_json = serde_json::to_string(locations.as_ref()).unwrap_or_else(|err| {
        warn!(error = %err, "failed to serialize locations");
        "[]".to_string()
    });

    Html(page::render(lat, lon, &locations_json, state.relay_enabled))
}

/// The current location snapshot as JSON.
pub async fn api_locations(State(state): State<AppState>) -> Json<Arc<Vec<ClientLocation>>> {
    Json(state.locations.get().await)
}

/// Relays one tile request, forwarding the caller's Referer.
pub async fn tile(
    State(state): State<AppState>,
    Path(tile_path): Path<String>,
    headers: HeaderMap,
) -> Result<TileResponse, RelayError> {
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());
    state.tiles.fetch(&tile_path, referer).await
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Relays one geocoding search.
pub async fn nominatim(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<SearchResponse, RelayError> {
    state.geocoding.search(&params.q).await
}
