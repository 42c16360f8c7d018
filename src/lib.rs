//! Zen Tetris (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `zen_tetris::{core, input, server, term, types}` so the binaries, the
//! integration tests and the benches share one import path.

pub use zen_tetris_core as core;
pub use zen_tetris_input as input;
pub use zen_tetris_server as server;
pub use zen_tetris_term as term;
pub use zen_tetris_types as types;
