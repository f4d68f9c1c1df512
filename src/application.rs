use crate::audit::RequestAuditLog;
use crate::config::Settings;
use crate::locations::{FileLocationStore, LocationCache};
use crate::relay::{GeocodingRelay, TileRelay};
use crate::server::{build_router, AppState};
use crate::upstream::UpstreamMode;
use crate::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Main application struct that coordinates all components
pub struct Application {
    settings: Settings,
    router: Router,
}

impl Application {
    pub fn new() -> Result<Self> {
        let settings = Settings::new()?;
        Self::with_settings(settings)
    }

    /// Builds the process-lifetime singletons and wires them into a router.
    pub fn with_settings(settings: Settings) -> Result<Self> {
        let mode = UpstreamMode::parse(&settings.upstream.proxy_addr)?;
        let client = mode.client()?;

        let store = Arc::new(FileLocationStore::new(&settings.locations.path));
        let locations = Arc::new(LocationCache::new(
            store,
            Duration::from_secs(settings.locations.ttl_secs),
        ));
        let audit = Arc::new(RequestAuditLog::new(&settings.audit.directory)?);

        let relay_enabled = mode.relay_enabled();
        if relay_enabled {
            info!("relay endpoints enabled");
        }

        let state = AppState {
            tiles: Arc::new(TileRelay::new(client.clone())),
            geocoding: Arc::new(GeocodingRelay::new(client)),
            locations,
            audit,
            relay_enabled,
        };

        Ok(Self {
            router: build_router(state),
            settings,
        })
    }

    pub async fn run(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.settings.application.host, self.settings.application.port
        );
        let listener = TcpListener::bind(&addr).await?;

        info!(%addr, "tilegate started");
        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("server stopped");
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_can_be_created_with_default_settings() {
        let settings = Settings::new().expect("Failed to load configuration");
        let app = Application::with_settings(settings).expect("Failed to create application");
        assert!(app.settings().application.port > 0);
    }
}
