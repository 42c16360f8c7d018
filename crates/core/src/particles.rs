//! Cosmetic particles for line clears.
//!
//! Nothing here feeds back into gameplay. The engine emits a
//! [`LineClearEvent`](crate::types::LineClearEvent) when a lock completes rows
//! and hands it to any [`LineClearObserver`]; the particle system is one.
//! Positions are in pixels with the board's top-left at (0, 0).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{LineClearEvent, Rgb, PARTICLE_GOLD};

/// Pixel size of one board cell, used to place burst origins.
pub const CELL_PX: f32 = 30.0;
/// Particles per cleared cell
pub const BURST_COUNT: usize = 15;
/// Frames a particle lives
pub const PARTICLE_LIFETIME: u32 = 60;
/// Particles in the Tetris shower
pub const TETRIS_SHOWER_COUNT: usize = 80;
/// Area covered by the Tetris shower
pub const SHOWER_AREA: (f32, f32) = (800.0, 600.0);
/// Oldest particles are dropped past this count
pub const MAX_PARTICLES: usize = 500;

const GRAVITY: f32 = 0.3;
const SHRINK: f32 = 0.995;
const MIN_SIZE: f32 = 0.1;

/// Receives line-clear notifications from the engine.
pub trait LineClearObserver {
    fn on_line_clear(&mut self, event: &LineClearEvent);
}

/// A single decaying particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub size: f32,
    /// Degrees
    pub rotation: f32,
    pub rotation_speed: f32,
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.rotation += self.rotation_speed;
        self.life = self.life.saturating_sub(1);
        self.size = (self.size * SHRINK).max(MIN_SIZE);
    }

    pub fn is_dead(&self) -> bool {
        self.life == 0 || self.size <= MIN_SIZE
    }

    /// Opacity from remaining life, 0..=255
    pub fn alpha(&self) -> u8 {
        if self.max_life == 0 {
            return 0;
        }
        ((255 * self.life) / self.max_life).min(255) as u8
    }
}

/// Owns and animates all live particles
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn make(&mut self, x: f32, y: f32, color: Rgb) -> Particle {
        Particle {
            x,
            y,
            vx: self.rng.random_range(-3.0..3.0),
            vy: self.rng.random_range(-8.0..-2.0),
            color,
            size: self.rng.random_range(2.0..6.0),
            rotation: self.rng.random_range(0.0..360.0),
            rotation_speed: self.rng.random_range(-5.0..5.0),
            life: PARTICLE_LIFETIME,
            max_life: PARTICLE_LIFETIME,
        }
    }

    /// Spawn `count` particles jittered around (x, y).
    pub fn burst(&mut self, x: f32, y: f32, color: Rgb, count: usize) {
        for _ in 0..count {
            let px = x + self.rng.random_range(-10.0..10.0);
            let py = y + self.rng.random_range(-10.0..10.0);
            let p = self.make(px, py, color);
            self.particles.push(p);
        }
        self.enforce_limit();
    }

    /// Gold particles scattered across a `width x height` area.
    pub fn tetris_shower(&mut self, width: f32, height: f32) {
        for _ in 0..TETRIS_SHOWER_COUNT {
            let x = self.rng.random_range(0.0..=width);
            let y = self.rng.random_range(0.0..=height);
            let p = self.make(x, y, PARTICLE_GOLD);
            self.particles.push(p);
        }
        self.enforce_limit();
    }

    /// Advance every particle by one frame and drop the dead ones.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.update();
        }
        self.particles.retain(|p| !p.is_dead());
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(1)
    }
}

impl LineClearObserver for ParticleSystem {
    fn on_line_clear(&mut self, event: &LineClearEvent) {
        for (&row, cells) in event.rows.iter().zip(event.cells.iter()) {
            for (x, cell) in cells.iter().enumerate() {
                let Some(kind) = cell else {
                    continue;
                };
                let px = x as f32 * CELL_PX + CELL_PX / 2.0;
                let py = row as f32 * CELL_PX + CELL_PX / 2.0;
                self.burst(px, py, kind.color(), BURST_COUNT);
            }
        }
        if event.is_tetris() {
            self.tetris_shower(SHOWER_AREA.0, SHOWER_AREA.1);
        }
    }
}
