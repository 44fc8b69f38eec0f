//! Server Implementation
//!
//! HTTP 服务器启动和管理

use tokio::net::TcpListener;

use crate::api;
use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Initialize state, bind and serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let state = ServerState::initialize(&self.config).await?;

        let app = api::build_app(state);

        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!(
            environment = %self.config.environment,
            "Menu server listening on {}",
            addr
        );

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
