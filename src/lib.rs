pub mod agent;
pub mod backend;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod repl;
pub mod server;
pub mod strategy;
pub mod surface;

use agent::ChatAgent;
use backend::new_backend;
use cli::{ Args, Mode };
use dispatcher::Dispatcher;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;
use surface::TerminalSurface;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Mode: {}", args.mode);
    info!("Chat Backend: {}", args.backend);
    info!("Remote Chat URL: {}", args.remote_url);
    info!("Search URL: {}", args.search_url);
    info!("HTTP Timeout: {}s", args.http_timeout().as_secs());
    info!("Rules Path: {}", args.rules_path.as_deref().unwrap_or("built-in"));
    info!("Server Address: {}", args.server_addr);
    info!("-------------------------");

    match args.mode {
        Mode::Serve => {
            let agent = Arc::new(ChatAgent::new(&args)?);
            info!("Starting server on: {}", args.server_addr);
            let server = Server::new(args.server_addr.clone(), agent);
            server.run().await?;
        }
        Mode::Repl => {
            let dispatcher = Dispatcher::new(new_backend(&args)?);
            let surface = TerminalSurface::stdio();
            repl::run_repl(&dispatcher, &surface).await;
        }
    }

    Ok(())
}
