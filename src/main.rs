//! Terminal Tetris runner (default binary).
//!
//! Single-threaded 60 Hz loop: crossterm for input and a framebuffer-based
//! renderer for output. Logging is off unless `ZEN_TETRIS_LOG` names a file,
//! since stdout belongs to the renderer.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing::{debug, info};

use zen_tetris::core::{GameEngine, GameSnapshot, ParticleSystem, PieceGenerator};
use zen_tetris::input::{handle_key_event, should_quit};
use zen_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use zen_tetris::types::TICK_MS;

#[derive(Debug, Parser)]
#[command(name = "zen-tetris", version, about = "Earth-tone Tetris in the terminal")]
struct Cli {
    /// Seed for the piece sequence (random when omitted)
    #[arg(long, env = "ZEN_TETRIS_SEED")]
    seed: Option<u64>,

    /// Append tracing output to this file
    #[arg(long, env = "ZEN_TETRIS_LOG")]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = cli.log.as_deref() {
        init_file_logging(path)?;
    }

    let seed = cli
        .seed
        .unwrap_or_else(|| PieceGenerator::from_entropy().fork_seed());
    info!(seed, "starting terminal game");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_file_logging(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, seed: u64) -> Result<()> {
    let mut game = GameEngine::new(seed);
    let mut particles = ParticleSystem::new(seed.rotate_left(17));

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut last_episode = game.episode_id();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snap);
        view.render_into_with_particles(
            &snap,
            particles.particles(),
            Viewport::new(w, h),
            &mut fb,
        );
        let flushed = term.draw(&fb)?;
        if flushed.full {
            debug!(width = w, height = h, "full redraw");
        }

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!(score = game.score(), lines = game.lines(), "quit");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        game.apply_action(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if game.episode_id() != last_episode {
            last_episode = game.episode_id();
            particles.clear();
            info!(episode = last_episode, "restarted");
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            let was_over = game.game_over();

            game.tick(TICK_MS);
            game.notify(&mut particles);
            // Particles keep animating while paused.
            particles.update();

            if game.game_over() && !was_over {
                info!(
                    score = game.score(),
                    lines = game.lines(),
                    level = game.level(),
                    "game over"
                );
            }
        }
    }
}
