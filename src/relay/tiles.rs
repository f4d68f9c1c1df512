//! Tile relay: path translation, bounded retries, streamed responses
//!
//! Each inbound `provider/z/x/y` path maps to exactly one canonical upstream
//! URL. Tiles are fetched through the shared outbound client with up to
//! three attempts and linear backoff between them.

use crate::relay::error::RelayError;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Identifies the gateway to tile servers.
pub const TILE_USER_AGENT: &str = "tilegate/1.0";

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_millis(200);

/// Tiles are cached aggressively by policy, regardless of what the
/// upstream's own caching headers say.
const TILE_CACHE_CONTROL: &str = "public, max-age=86400";

/// Base URLs of the three supported tile services.
#[derive(Clone, Debug)]
pub struct TileBases {
    pub osm: String,
    pub google: String,
    pub carto: String,
}

impl Default for TileBases {
    fn default() -> Self {
        Self {
            osm: "https://a.tile.openstreetmap.org".to_string(),
            google: "https://mt1.google.com".to_string(),
            carto: "https://a.basemaps.cartocdn.com".to_string(),
        }
    }
}

/// Supported tile providers, each with its own URL grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileProvider {
    Osm,
    Google,
    Carto,
}

impl TileProvider {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "osm" => Some(TileProvider::Osm),
            "google" => Some(TileProvider::Google),
            "carto" => Some(TileProvider::Carto),
            _ => None,
        }
    }
}

/// A parsed `provider/z/x/y` tile request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRequest {
    pub provider: TileProvider,
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileRequest {
    /// Parses a tile path of the form `provider/z/x/y[.png]`. The `.png`
    /// suffix is required for osm and carto, optional for google.
    pub fn parse(path: &str) -> Result<Self, RelayError> {
        let (prefix, rest) = path
            .split_once('/')
            .ok_or_else(|| RelayError::UnknownTileSource(path.to_string()))?;
        let provider = TileProvider::from_prefix(prefix)
            .ok_or_else(|| RelayError::UnknownTileSource(prefix.to_string()))?;

        let coords = match provider {
            TileProvider::Osm | TileProvider::Carto => rest
                .strip_suffix(".png")
                .ok_or_else(|| RelayError::InvalidTilePath(path.to_string()))?,
            TileProvider::Google => rest.strip_suffix(".png").unwrap_or(rest),
        };

        let segments: Vec<&str> = coords.split('/').collect();
        let &[z, x, y] = segments.as_slice() else {
            return Err(RelayError::InvalidTilePath(path.to_string()));
        };
        let parse = |s: &str| {
            s.parse::<u32>()
                .map_err(|_| RelayError::InvalidTilePath(path.to_string()))
        };

        Ok(Self {
            provider,
            z: parse(z)?,
            x: parse(x)?,
            y: parse(y)?,
        })
    }

    /// The canonical upstream URL for this tile.
    pub fn upstream_url(&self, bases: &TileBases) -> String {
        let Self { z, x, y, .. } = *self;
        match self.provider {
            TileProvider::Osm => format!("{}/{z}/{x}/{y}.png", bases.osm),
            TileProvider::Google => format!("{}/vt/lyrs=s&x={x}&y={y}&z={z}", bases.google),
            TileProvider::Carto => format!("{}/dark_all/{z}/{x}/{y}.png", bases.carto),
        }
    }
}

/// A successful upstream tile fetch, streamed back to the caller.
#[derive(Debug)]
pub struct TileResponse {
    upstream: reqwest::Response,
}

impl IntoResponse for TileResponse {
    fn into_response(self) -> Response {
        let content_type = self.upstream.headers().get(header::CONTENT_TYPE).cloned();
        let content_length = self.upstream.headers().get(header::CONTENT_LENGTH).cloned();

        let mut response = Response::new(Body::from_stream(self.upstream.bytes_stream()));
        *response.status_mut() = StatusCode::OK;

        let headers = response.headers_mut();
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, content_type);
        }
        if let Some(content_length) = content_length {
            headers.insert(header::CONTENT_LENGTH, content_length);
        }
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(TILE_CACHE_CONTROL),
        );

        response
    }
}

/// Fetches tiles from the upstream services through the shared client.
pub struct TileRelay {
    client: Client,
    bases: TileBases,
}

impl TileRelay {
    pub fn new(client: Client) -> Self {
        Self::with_bases(client, TileBases::default())
    }

    /// Overrides the upstream base URLs, for pointing at stub servers.
    pub fn with_bases(client: Client, bases: TileBases) -> Self {
        Self { client, bases }
    }

    /// Fetches one tile. Invalid paths fail immediately; upstream failures
    /// are retried up to three times with 200ms, then 400ms between
    /// attempts. Only a 200 counts as success; the last attempt's outcome
    /// decides the error.
    pub async fn fetch(
        &self,
        tile_path: &str,
        referer: Option<&str>,
    ) -> Result<TileResponse, RelayError> {
        let tile = TileRequest::parse(tile_path)?;
        let url = tile.upstream_url(&self.bases);

        let mut last: Option<Result<StatusCode, reqwest::Error>> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let mut request = self
                .client
                .get(&url)
                .header(header::USER_AGENT, TILE_USER_AGENT);
            if let Some(referer) = referer {
                request = request.header(header::REFERER, referer);
            }

            match request.send().await {
                Ok(upstream) if upstream.status() == StatusCode::OK => {
                    debug!(%url, attempt, "tile fetched");
                    return Ok(TileResponse { upstream });
                }
                Ok(upstream) => {
                    warn!(
                        attempt,
                        max_attempts = MAX_ATTEMPTS,
                        status = %upstream.status(),
                        %url,
                        "tile server returned non-200 status"
                    );
                    last = Some(Ok(upstream.status()));
                }
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts = MAX_ATTEMPTS,
                        error = %err,
                        %url,
                        "error fetching tile"
                    );
                    last = Some(Err(err));
                }
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(BACKOFF_STEP * attempt).await;
            }
        }

        match last {
            Some(Err(source)) => Err(RelayError::TileUnavailable {
                attempts: MAX_ATTEMPTS,
                source,
            }),
            Some(Ok(status)) => Err(RelayError::TileStatus(status)),
            // The loop always runs at least once.
            None => Err(RelayError::InvalidTilePath(tile_path.to_string())),
        }
    }
}
