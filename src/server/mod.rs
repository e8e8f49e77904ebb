pub mod api;

use crate::agent::ChatAgent;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use log::info;

pub struct Server {
    addr: String,
    agent: Arc<ChatAgent>,
}

impl Server {
    pub fn new(addr: String, agent: Arc<ChatAgent>) -> Self {
        Self { addr, agent }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.addr).await.map_err(|e|
            format!("Failed to bind HTTP server to {}: {}", self.addr, e)
        )?;
        info!("HTTP server listening on: http://{}", self.addr);

        let app = api::router(Arc::clone(&self.agent));
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}
