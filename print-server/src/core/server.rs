//! Server Implementation
//!
//! HTTP server startup and shutdown

use std::net::SocketAddr;
use std::time::Duration;

use crate::api;
use crate::core::{AppState, Config};

/// Interval between rate limiter sweeps
const RATE_LIMIT_CLEANUP: Duration = Duration::from_secs(300);

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Serve until ctrl-c, printing through the configured USB device
    pub async fn run(self) -> std::io::Result<()> {
        let state = AppState::new(self.config.clone());

        if state.rate_limiter.is_enabled() {
            let rate_limiter = state.rate_limiter.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP);
                loop {
                    interval.tick().await;
                    rate_limiter.cleanup().await;
                }
            });
        }

        let app = api::router(state);

        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Print server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
    }
}
