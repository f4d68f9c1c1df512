//! Relay error taxonomy and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors surfaced by the tile and geocoding relays.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("unknown tile source: {0}")]
    UnknownTileSource(String),

    #[error("invalid tile path: {0}")]
    InvalidTilePath(String),

    #[error("missing query parameter")]
    MissingQuery,

    #[error("tile upstream unreachable after {attempts} attempts: {source}")]
    TileUnavailable {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("tile upstream returned status {0}")]
    TileStatus(StatusCode),

    #[error("geocoding upstream unreachable: {0}")]
    SearchUnavailable(#[source] reqwest::Error),
}

impl RelayError {
    /// Client-input errors get a 400 and are never retried; upstream
    /// failures map to gateway errors, except a reachable upstream's final
    /// non-200 status, which is passed through as-is.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::UnknownTileSource(_)
            | RelayError::InvalidTilePath(_)
            | RelayError::MissingQuery => StatusCode::BAD_REQUEST,
            RelayError::TileUnavailable { .. } => StatusCode::BAD_GATEWAY,
            RelayError::TileStatus(status) => *status,
            RelayError::SearchUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            RelayError::UnknownTileSource(_) => "Invalid tile source",
            RelayError::InvalidTilePath(_) => "Invalid tile path",
            RelayError::MissingQuery => "Missing query parameter",
            RelayError::TileUnavailable { .. } => "Failed to fetch tile",
            RelayError::TileStatus(_) => "Tile not available",
            RelayError::SearchUnavailable(_) => "Failed to search location",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}
