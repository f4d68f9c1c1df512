//! Audit record captured for every serviced request

use axum::body::Body;
use axum::http::{header, Request};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// One entry in the persisted request log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub query: String,
    pub user_agent: String,
    pub remote_addr: String,
    pub x_forwarded_for: String,
    pub referer: String,
}

fn header_str(request: &Request<Body>, name: header::HeaderName) -> String {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

impl AuditRecord {
    /// Captures request metadata before the request is consumed by the
    /// handler chain.
    pub fn capture(request: &Request<Body>, remote_addr: SocketAddr) -> Self {
        let forwarded_for = header_str(request, header::HeaderName::from_static("x-forwarded-for"));
        let x_forwarded_for = if forwarded_for.is_empty() {
            "N/A".to_string()
        } else {
            forwarded_for
        };

        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().unwrap_or_default().to_string(),
            user_agent: header_str(request, header::USER_AGENT),
            remote_addr: remote_addr.to_string(),
            x_forwarded_for,
            referer: header_str(request, header::REFERER),
        }
    }
}
