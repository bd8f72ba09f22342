//! HTTP surface of the demo: thin I/O wrappers around the discovery
//! engine. Every `/peers` request runs one fresh scan; there is no
//! background scanner and no cached membership.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::get;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use flock_common::config::Config;
use flock_core::{Identity, discover_peers};

use crate::html;

/// Shared across handlers. `identity` is resolved once at startup; `None`
/// means resolution failed and every discovery endpoint reports the
/// identity-unknown state instead of scanning.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Option<Identity>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/identity", get(identity))
        .route("/peers", get(peers))
        .with_state(state)
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn identity_unknown() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "identity unknown",
            "detail": "could not resolve a non-loopback IPv4 address; discovery is disabled",
        })),
    )
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    hostname: Option<String>,
    ip: Option<String>,
    timestamp: String,
}

/// Liveness, independent of discovery: a replica with unresolved identity
/// is still a healthy HTTP process.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        hostname: state.identity.as_ref().map(|id| id.hostname.clone()),
        ip: state.identity.as_ref().map(|id| id.ip.to_string()),
        timestamp: timestamp(),
    })
}

#[derive(Serialize)]
struct IdentityResponse {
    hostname: String,
    ip: String,
    service: String,
    timestamp: String,
}

async fn identity(State(state): State<AppState>) -> impl IntoResponse {
    match &state.identity {
        Some(id) => Json(IdentityResponse {
            hostname: id.hostname.clone(),
            ip: id.ip.to_string(),
            service: state.config.service_name.clone(),
            timestamp: timestamp(),
        })
        .into_response(),
        None => identity_unknown().into_response(),
    }
}

#[derive(Serialize)]
struct PeersResponse {
    hostname: String,
    ip: String,
    port: u16,
    /// Addresses that accepted a TCP connection on the service port.
    /// Anything listening there counts; an unrelated process sharing the
    /// network and port is indistinguishable from a replica.
    peers: Vec<String>,
    found_count: usize,
    expected_count: usize,
    scan_ms: u64,
}

async fn peers(State(state): State<AppState>) -> impl IntoResponse {
    let Some(id) = &state.identity else {
        return identity_unknown().into_response();
    };

    let range = state.config.scan_range(id.ip);
    match discover_peers(id.ip, &range).await {
        Ok(report) => Json(PeersResponse {
            hostname: id.hostname.clone(),
            ip: id.ip.to_string(),
            port: range.port,
            peers: report.peers.iter().map(|p| p.ip.to_string()).collect(),
            found_count: report.found_count(),
            expected_count: state.config.replica_count,
            scan_ms: report.elapsed.as_millis() as u64,
        })
        .into_response(),
        Err(e) => {
            warn!("discovery rejected: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let page = match &state.identity {
        Some(id) => {
            let range = state.config.scan_range(id.ip);
            match discover_peers(id.ip, &range).await {
                Ok(report) => html::status_page(&state.config, id, &report, &timestamp()),
                Err(e) => html::error_page(&state.config, &e.to_string()),
            }
        }
        None => html::error_page(&state.config, "identity unknown: cannot scan for peers"),
    };
    Html(page)
}
