//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders into a plain framebuffer that is diffed and flushed to
//! the terminal through crossterm.
//!
//! Goals:
//! - Keep `core` deterministic and free of I/O
//! - Allow precise control over aspect ratio (2 chars wide per cell)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use zen_tetris_core as core;
pub use zen_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, FlushStats, TerminalRenderer};
