//! Middleware recording every serviced request to the audit log

use crate::audit::AuditRecord;
use crate::server::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;

/// Captures request metadata, lets the handler run, then appends the record
/// in a detached task so the response is never held up by log I/O.
pub async fn record_request(
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let record = AuditRecord::capture(&request, remote_addr);

    let response = next.run(request).await;

    let audit = Arc::clone(&state.audit);
    tokio::spawn(async move {
        audit.record(record).await;
    });

    response
}
