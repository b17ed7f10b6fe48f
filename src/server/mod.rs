pub mod api;

use std::error::Error;
use std::sync::Arc;

use log::{error, info};
use tokio::signal;

use crate::agent::ChatAgent;

pub struct Server {
    addr: String,
    agent: Arc<ChatAgent>,
    max_upload_bytes: usize,
}

impl Server {
    pub fn new(addr: String, agent: Arc<ChatAgent>, max_upload_bytes: usize) -> Self {
        Self {
            addr,
            agent,
            max_upload_bytes,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = api::build_router(self.agent.clone(), self.max_upload_bytes);
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("HTTP server listening on: http://{}", self.addr);

        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves when Ctrl+C is received.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
