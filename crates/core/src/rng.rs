//! RNG module - uniform random piece generation
//!
//! Every draw is an independent, equally weighted choice among the seven
//! kinds (no 7-bag). Seeded so that a given seed always replays the same
//! sequence, which the tests rely on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PieceKind;

/// Uniform piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: StdRng,
}

impl PieceGenerator {
    /// Create a generator with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())]
    }

    /// Derive a fresh seed, used to start sibling generators (e.g. particles).
    pub fn fork_seed(&mut self) -> u64 {
        self.rng.random()
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_deterministic() {
        let mut a = PieceGenerator::new(12345);
        let mut b = PieceGenerator::new(12345);

        for _ in 0..100 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_generator_covers_all_kinds() {
        let mut gen = PieceGenerator::new(7);
        let mut seen = [false; 7];
        for _ in 0..1000 {
            let kind = gen.draw();
            let idx = PieceKind::ALL.iter().position(|k| *k == kind).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s), "missing kinds: {:?}", seen);
    }

    #[test]
    fn test_generator_is_not_bagged() {
        // A bag would never repeat a kind within its first seven draws; with a
        // uniform choice some seed among the first few hundred will.
        let repeats = (0..200u64).any(|seed| {
            let mut gen = PieceGenerator::new(seed);
            let draws: Vec<_> = (0..7).map(|_| gen.draw()).collect();
            draws.windows(2).any(|w| w[0] == w[1])
        });
        assert!(repeats);
    }
}
