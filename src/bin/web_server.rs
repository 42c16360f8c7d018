//! WebSocket server binary.
//!
//! Configuration comes from `ZEN_TETRIS_*` environment variables with command
//! line flags layered on top. Logging goes to stderr, filtered by `RUST_LOG`
//! (default `info`).

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use zen_tetris::server::{run_server, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "zen-tetris-web", version, about = "Zen Tetris WebSocket game server")]
struct Cli {
    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,

    /// Frame length in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Maximum concurrent sessions
    #[arg(long)]
    max_sessions: Option<usize>,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::from_env();
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(tick_ms) = self.tick_ms.filter(|ms| *ms > 0) {
            config.tick_ms = tick_ms;
        }
        if let Some(max) = self.max_sessions {
            config.max_sessions = max;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = Cli::parse().into_config();

    tokio::select! {
        res = run_server(config, None) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}
