use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trl_research_server::{
    config::{ClapConfig, ServerParams},
    core::TrlServer,
    result::TrlResult,
    start_server::start_trl_server,
};

/// The main entrypoint of the program.
///
/// Sets up environment variables and logging, parses the command line
/// arguments, then builds the server context and runs the HTTP server.
#[tokio::main]
async fn main() -> TrlResult<()> {
    // Set up environment variables and logging options
    if std::env::var("RUST_BACKTRACE").is_err() {
        unsafe {
            std::env::set_var("RUST_BACKTRACE", "full");
        }
    }
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info,trl_research_server=info,actix_web=info");
        }
    }

    // Load variables from a .env file
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let clap_config = ClapConfig::parse();
    info!("Starting with configuration: {clap_config:#?}");

    let server_params = ServerParams::try_from(clap_config)?;
    let trl_server = Arc::new(TrlServer::instantiate(server_params)?);

    start_trl_server(trl_server).await
}
