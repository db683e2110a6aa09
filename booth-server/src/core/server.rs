//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;

use anyhow::Context;

use crate::core::{Config, Result, ServerState};
use crate::routes::build_app;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let app = build_app(&self.config).with_state(self.state.clone());
        crate::api::health::mark_started();

        let addr: SocketAddr = format!("{}:{}", self.config.http_host, self.config.http_port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid listen address {}:{}",
                    self.config.http_host, self.config.http_port
                )
            })?;

        tracing::info!(
            environment = %self.config.environment,
            production = self.config.is_production(),
            "🖨️ Booth print server starting on {}",
            addr
        );

        let handle = axum_server::Handle::new();

        // Handle shutdown signal
        let shutdown_handle = handle.clone();
        let grace = self.config.shutdown_timeout();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}
