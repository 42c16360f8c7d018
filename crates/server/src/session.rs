//! One WebSocket connection driving one game.
//!
//! Each frame the loop waits up to one frame interval for a single inbound
//! message, applies it, advances the engine by the wall-clock time since the
//! previous tick, steps the particles, and pushes the full state back. The
//! engine lives on this task's stack and is dropped with the connection.

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::{timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, warn};

use crate::core::{GameEngine, ParticleSystem};
use crate::protocol::{parse_client_message, GameStateMessage, Inbound, ServerMessage};
use crate::registry::SessionId;

/// Per-session engine state and the bookkeeping for elapsed time.
pub struct Session {
    id: SessionId,
    engine: GameEngine,
    particles: ParticleSystem,
    last_tick: Instant,
}

impl Session {
    pub fn new(id: SessionId, seed: u64) -> Self {
        Self {
            id,
            engine: GameEngine::new(seed),
            particles: ParticleSystem::new(seed.rotate_left(17)),
            last_tick: Instant::now(),
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Handle one text frame. Returns the immediate reply, if any.
    pub fn handle_text(&mut self, text: &str) -> Option<ServerMessage> {
        match parse_client_message(text) {
            Ok(Inbound::Action(action)) => {
                debug!(session = self.id, action = action.as_str(), "input");
                let episode = self.engine.episode_id();
                self.engine.apply_action(action);
                if self.engine.episode_id() != episode {
                    self.particles.clear();
                    debug!(session = self.id, episode = self.engine.episode_id(), "restarted");
                }
                None
            }
            Ok(Inbound::Ping) => Some(ServerMessage::Pong),
            Err(e) => {
                warn!(session = self.id, error = %e, "rejected client message");
                Some(ServerMessage::error(e.to_string()))
            }
        }
    }

    /// Advance the game by the time since the previous call.
    pub fn tick(&mut self, now: Instant) {
        let elapsed_ms = now.saturating_duration_since(self.last_tick).as_millis();
        let elapsed_ms = u32::try_from(elapsed_ms).unwrap_or(u32::MAX);
        // Carry the sub-millisecond remainder into the next frame.
        self.last_tick += Duration::from_millis(elapsed_ms as u64);
        self.advance(elapsed_ms);
    }

    /// Advance the game by a fixed amount of time.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.engine.tick(elapsed_ms);
        self.engine.notify(&mut self.particles);
        self.particles.update();
    }

    pub fn state_message(&self) -> ServerMessage {
        ServerMessage::GameState(GameStateMessage::from_snapshot(
            &self.engine.snapshot(),
            self.particles.particles(),
        ))
    }
}

/// Drive a session until the client goes away.
pub async fn run_session<S>(
    ws: WebSocketStream<S>,
    id: SessionId,
    seed: u64,
    frame: Duration,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut write, mut read) = ws.split();
    let mut session = Session::new(id, seed);

    write
        .send(to_frame(&session.state_message())?)
        .await
        .context("send initial state")?;

    loop {
        let frame_start = Instant::now();

        match timeout(frame, read.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                if let Some(reply) = session.handle_text(text.as_str()) {
                    write.send(to_frame(&reply)?).await.context("send reply")?;
                }
            }
            Ok(Some(Ok(Message::Close(_)))) | Ok(None) => break,
            Ok(Some(Ok(_))) => {}
            Ok(Some(Err(e))) => return Err(e).context("read frame"),
            Err(_) => {}
        }

        session.tick(Instant::now());
        write
            .send(to_frame(&session.state_message())?)
            .await
            .context("send state")?;

        tokio::time::sleep_until(frame_start + frame).await;
    }

    Ok(())
}

fn to_frame(msg: &ServerMessage) -> Result<Message> {
    Ok(Message::text(msg.to_json()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameAction, BASE_DROP_MS};

    #[test]
    fn ping_gets_pong() {
        let mut s = Session::new(1, 7);
        assert_eq!(s.handle_text(r#"{"type":"ping"}"#), Some(ServerMessage::Pong));
    }

    #[test]
    fn bad_input_replies_error_and_keeps_state() {
        let mut s = Session::new(1, 7);
        let before = s.engine().snapshot();
        let reply = s.handle_text(r#"{"type":"input","action":"warp"}"#);
        assert!(matches!(reply, Some(ServerMessage::Error { .. })));
        assert_eq!(s.engine().snapshot(), before);
    }

    #[test]
    fn input_is_applied() {
        let mut s = Session::new(1, 7);
        assert_eq!(s.handle_text(r#"{"type":"input","action":"pause"}"#), None);
        assert!(s.engine().paused());
        s.engine.apply_action(GameAction::Pause);
        assert!(!s.engine().paused());
    }

    #[test]
    fn restart_drops_leftover_particles() {
        let mut s = Session::new(1, 7);
        s.particles.tetris_shower(800.0, 600.0);
        assert!(!s.particles.is_empty());

        s.handle_text(r#"{"type":"input","action":"restart"}"#);
        assert_eq!(s.engine().episode_id(), 1);
        assert!(s.particles.is_empty());
        match s.state_message() {
            ServerMessage::GameState(state) => assert!(state.particles.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn other_input_keeps_particles() {
        let mut s = Session::new(1, 7);
        s.particles.tetris_shower(800.0, 600.0);
        let before = s.particles.len();
        s.handle_text(r#"{"type":"input","action":"move_left"}"#);
        assert_eq!(s.particles.len(), before);
    }

    #[test]
    fn advance_steps_gravity() {
        let mut s = Session::new(1, 7);
        let y0 = s.engine().current().unwrap().y;
        s.advance(BASE_DROP_MS);
        assert_eq!(s.engine().current().unwrap().y, y0 + 1);
    }
}
