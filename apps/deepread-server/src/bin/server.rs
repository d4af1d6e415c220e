use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use deepread_core::config::Config;
use deepread_server::{init_tracing, serve, AppState};

#[derive(Parser, Debug)]
#[command(name = "deepread-server", about = "Document retrieval and chat proxy for the DeepRead browser app")]
struct ServerCli {
    /// Configuration environment (dev, prod, test). Defaults to RUST_ENV.
    #[arg(long)]
    config_env: Option<String>,

    /// Address to bind (host:port). Overrides server.host and server.port.
    #[arg(long, env = "DEEPREAD_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = ServerCli::parse();

    let config = Config::load_for_env(cli.config_env.as_deref())?;
    let settings = config.settings()?;
    info!(env = config.env_name(), "configuration loaded");

    let bind = cli.bind.unwrap_or_else(|| settings.server.bind_addr());
    let addr: SocketAddr = bind.parse().with_context(|| format!("invalid bind address {bind}"))?;

    let state = AppState::from_settings(&settings)?;
    serve(state, &settings.server, addr).await
}
