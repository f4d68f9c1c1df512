//! Geocoding relay: single-shot search passthrough

use crate::relay::error::RelayError;
use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use reqwest::Client;
use tracing::{debug, warn};

/// Upstream geocoding search endpoint.
pub const SEARCH_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// A geocoding response streamed back verbatim. The upstream status is
/// passed through; the content type is always JSON.
#[derive(Debug)]
pub struct SearchResponse {
    upstream: reqwest::Response,
}

impl IntoResponse for SearchResponse {
    fn into_response(self) -> Response {
        let status = self.upstream.status();
        let mut response = Response::new(Body::from_stream(self.upstream.bytes_stream()));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}

/// Forwards search queries to the upstream geocoding service.
pub struct GeocodingRelay {
    client: Client,
    endpoint: String,
}

impl GeocodingRelay {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, SEARCH_ENDPOINT)
    }

    /// Overrides the search endpoint, for pointing at stub servers.
    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Issues a single search request (no retry) and hands back the
    /// upstream response for streaming.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, RelayError> {
        if query.is_empty() {
            return Err(RelayError::MissingQuery);
        }

        let url = format!(
            "{}?format=json&q={}",
            self.endpoint,
            urlencoding::encode(query)
        );

        match self.client.get(&url).send().await {
            Ok(upstream) => {
                debug!(status = %upstream.status(), "geocoding search completed");
                Ok(SearchResponse { upstream })
            }
            Err(err) => {
                warn!(error = %err, "error fetching from geocoding upstream");
                Err(RelayError::SearchUnavailable(err))
            }
        }
    }
}
