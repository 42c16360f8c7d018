//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the game rules, state management, and the cosmetic
//! particle simulation. It has no dependencies on UI, networking, or I/O, so
//! the terminal client and the WebSocket server drive the exact same engine.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 board with collision detection and line clearing
//! - [`tetromino`]: piece matrices, spawn placement and clockwise rotation
//! - [`game_state`]: the engine state machine (movement, locking, gravity, pause)
//! - [`rng`]: seeded uniform piece generation
//! - [`scoring`]: line points, combo bonus, level and drop interval
//! - [`particles`]: line-clear bursts, decoupled from gameplay through an observer
//! - [`snapshot`]: plain-data views for renderers and the network layer
//!
//! # Game Rules
//!
//! - **Uniform Randomizer**: every piece is an independent draw among seven kinds
//! - **Plain Rotation**: clockwise only, reverted if the result collides (no kicks)
//! - **Immediate Lock**: a piece locks the moment it cannot fall
//! - **Deferred Clear**: completed rows flash for 200ms before they are removed
//!
//! # Example
//!
//! ```
//! use zen_tetris_core::GameEngine;
//! use zen_tetris_types::GameAction;
//!
//! let mut game = GameEngine::new(12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Hard drop locks the piece and brings in the next one.
//! assert!(game.current().is_some());
//! assert_eq!(game.score(), 0);
//! ```
//!
//! # Timing
//!
//! Call [`GameEngine::tick`](game_state::GameEngine::tick) every frame (16ms)
//! with the elapsed time. Gravity starts at 500ms per row and speeds up by
//! 50ms per level down to 100ms.

pub mod board;
pub mod game_state;
pub mod particles;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod tetromino;

pub use zen_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, RowList};
pub use game_state::GameEngine;
pub use particles::{LineClearObserver, Particle, ParticleSystem};
pub use rng::PieceGenerator;
pub use scoring::{calculate_score, ScoreResult};
pub use snapshot::{GameSnapshot, PieceSnapshot};
pub use tetromino::{Shape, Tetromino};
