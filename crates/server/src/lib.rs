//! WebSocket game server.
//!
//! Every connection gets an independent [`GameEngine`](crate::core::GameEngine)
//! driven at a fixed frame rate. Clients send JSON input messages and receive
//! the full game state once per frame. See [`protocol`] for the message shapes.

pub mod config;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;

pub use zen_tetris_core as core;
pub use zen_tetris_types as types;

pub use config::ServerConfig;
pub use protocol::{parse_client_message, GameStateMessage, Inbound, ServerMessage};
pub use registry::{SessionGuard, SessionRegistry};
pub use server::{run_server, serve};
pub use session::{run_session, Session};
