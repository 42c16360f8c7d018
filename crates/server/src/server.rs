//! WebSocket server for browser play
//!
//! Accepts connections, upgrades them to WebSocket, and gives each one its own
//! game on its own task. A supervisor per connection owns the registry entry
//! and logs how the session ended, panics included.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::SinkExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Message, Utf8Bytes};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::core::PieceGenerator;
use crate::registry::SessionRegistry;
use crate::session::run_session;

/// Bind the listener and serve until the task is dropped.
///
/// `ready_tx` receives the bound address once the socket is listening, which
/// lets tests bind port 0.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("bind {}", addr))?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, max_sessions = config.max_sessions, "websocket server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    serve(listener, config).await
}

/// Accept loop over an already bound listener.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> Result<()> {
    let registry = SessionRegistry::new(config.max_sessions);
    let frame = Duration::from_millis(config.tick_ms.max(1));
    let mut seeds = PieceGenerator::from_entropy();

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };

        let registry = registry.clone();
        let seed = seeds.fork_seed();
        tokio::spawn(async move {
            if let Err(e) = supervise(socket, peer, registry, seed, frame).await {
                warn!(%peer, error = %format!("{:#}", e), "connection error");
            }
        });
    }
}

/// Handshake, register, then run the session on a child task and report its fate.
async fn supervise(
    socket: TcpStream,
    peer: SocketAddr,
    registry: SessionRegistry,
    seed: u64,
    frame: Duration,
) -> Result<()> {
    let mut ws = tokio_tungstenite::accept_async(socket)
        .await
        .context("websocket handshake")?;

    let Some(guard) = registry.register(peer) else {
        warn!(%peer, capacity = registry.capacity(), "server full, refusing session");
        let close = CloseFrame {
            code: CloseCode::Again,
            reason: Utf8Bytes::from_static("server full"),
        };
        ws.send(Message::Close(Some(close))).await.ok();
        return Ok(());
    };

    let id = guard.id();
    info!(session = id, %peer, active = registry.len(), "session opened");

    let task = tokio::spawn(run_session(ws, id, seed, frame));
    match task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(session = id, error = %format!("{:#}", e), "session ended with error")
        }
        Err(e) if e.is_panic() => error!(session = id, "session panicked"),
        Err(e) => warn!(session = id, error = %e, "session cancelled"),
    }

    let lived = guard
        .info()
        .map(|info| info.connected_at.elapsed())
        .unwrap_or_default();
    drop(guard);
    info!(
        session = id,
        active = registry.len(),
        secs = lived.as_secs(),
        "session closed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn bind_with_host(host: &str) -> Result<SocketAddr> {
        let config = ServerConfig {
            host: host.to_string(),
            port: 0,
            ..ServerConfig::default()
        };
        let (tx, rx) = oneshot::channel();
        let server = tokio::spawn(run_server(config, Some(tx)));
        let bound = rx.await;
        server.abort();
        match bound {
            Ok(addr) => Ok(addr),
            Err(_) => match server.await {
                Ok(Err(e)) => Err(e),
                _ => anyhow::bail!("server stopped before binding"),
            },
        }
    }

    #[tokio::test]
    async fn binds_by_host_name() {
        let addr = bind_with_host("localhost").await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn unresolvable_host_fails_to_bind() {
        let err = bind_with_host("no such host").await.unwrap_err();
        assert!(format!("{:#}", err).contains("bind no such host:0"));
    }
}
