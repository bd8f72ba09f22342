use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use flock_common::config::Config;
use flock_core::resolve_self;

use crate::routes::{AppState, router};

/// Runs the HTTP demo server.
///
/// Identity resolves exactly once, here; handlers read the cached value.
/// A failed resolution does not abort startup: the server comes up and
/// renders the identity-unknown state so the platform's health checks and
/// a human at `/` can see what is wrong.
pub async fn serve(cfg: Config) -> anyhow::Result<()> {
    let identity = match resolve_self() {
        Ok(id) => {
            info!(hostname = %id.hostname, ip = %id.ip, "resolved replica identity");
            Some(id)
        }
        Err(e) => {
            error!("{e}; serving without discovery");
            None
        }
    };

    let port = cfg.port;
    let state = AppState {
        config: Arc::new(cfg),
        identity,
    };

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "listening; peers will discover this replica on the same port");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
