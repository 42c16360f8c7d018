//! Protocol module - JSON messages exchanged over the WebSocket
//!
//! Inbound frames are small tagged objects (`{"type":"input","action":"rotate"}`,
//! `{"type":"ping"}`). Outbound frames are tagged by `type` as well; the
//! per-tick `game_state` message carries the whole visible state so the
//! browser client never has to keep its own copy of the board.

use serde::{Deserialize, Serialize};

use crate::core::{GameSnapshot, Particle, PieceSnapshot};
use crate::types::{GameAction, BOARD_HEIGHT, BOARD_WIDTH};

// ============== Client -> Server Messages ==============

/// Raw inbound message as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Input { action: String },
    Ping,
}

/// Validated inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    Action(GameAction),
    Ping,
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Not JSON, or JSON of the wrong shape.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Well-formed input message naming an action we do not know.
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// Parse one text frame from a client.
pub fn parse_client_message(text: &str) -> Result<Inbound, ProtocolError> {
    let msg: ClientMessage = serde_json::from_str(text)?;
    match msg {
        ClientMessage::Ping => Ok(Inbound::Ping),
        ClientMessage::Input { action } => GameAction::from_str(&action)
            .map(Inbound::Action)
            .ok_or(ProtocolError::UnknownAction(action)),
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub filled: bool,
    pub color: Option<[u8; 3]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockView {
    pub x: i32,
    pub y: i32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub color: [u8; 3],
    pub size: f32,
    pub rotation: f32,
    pub alpha: u8,
}

impl From<&Particle> for ParticleView {
    fn from(p: &Particle) -> Self {
        Self {
            x: p.x,
            y: p.y,
            color: p.color.to_array(),
            size: p.size,
            rotation: p.rotation,
            alpha: p.alpha(),
        }
    }
}

/// Full visible state, sent once per tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStateMessage {
    pub board: Vec<Vec<CellView>>,
    /// Active piece cells inside the board only.
    pub current_piece: Vec<BlockView>,
    /// Next piece cells relative to its own matrix.
    pub next_piece: Vec<BlockView>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub game_over: bool,
    pub paused: bool,
    pub flash_lines: Vec<usize>,
    pub particles: Vec<ParticleView>,
}

impl GameStateMessage {
    pub fn from_snapshot(snap: &GameSnapshot, particles: &[Particle]) -> Self {
        let board = snap
            .board
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| CellView {
                        filled: cell.is_some(),
                        color: cell.map(|k| k.color().to_array()),
                    })
                    .collect()
            })
            .collect();

        let in_bounds = |&(x, y): &(i32, i32)| {
            (0..BOARD_WIDTH as i32).contains(&x) && (0..BOARD_HEIGHT as i32).contains(&y)
        };
        let current_piece = snap
            .current
            .as_ref()
            .map(|p| blocks(p, in_bounds))
            .unwrap_or_default();
        let next_piece = snap
            .next
            .as_ref()
            .map(|p| blocks(p, |_| true))
            .unwrap_or_default();

        Self {
            board,
            current_piece,
            next_piece,
            score: snap.score,
            lines: snap.lines,
            level: snap.level,
            game_over: snap.game_over,
            paused: snap.paused,
            flash_lines: snap.flash_lines.to_vec(),
            particles: particles.iter().map(ParticleView::from).collect(),
        }
    }
}

fn blocks(piece: &PieceSnapshot, keep: impl Fn(&(i32, i32)) -> bool) -> Vec<BlockView> {
    let color = piece.kind.color().to_array();
    piece
        .blocks
        .iter()
        .filter(|b| keep(b))
        .map(|&(x, y)| BlockView { x, y, color })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState(GameStateMessage),
    Pong,
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
