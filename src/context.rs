// 🎲 Generation Context - the one random stream + the entity id counter
//
// Every random draw in a run comes from this context, in order. Two contexts
// built from the same seed replay the exact same draws, so a run is
// reproducible byte-for-byte. Nothing here is global: independent runs (and
// parallel tests) each own their own context.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// GENERATION CONTEXT
// ============================================================================

#[derive(Debug, Clone)]
pub struct GenerationContext {
    seed: u64,
    rng: StdRng,
    /// Last id handed out (0 = none yet)
    last_entity_id: u64,
}

impl GenerationContext {
    /// Create a context seeded once for the whole run
    pub fn new(seed: u64) -> Self {
        GenerationContext {
            seed,
            rng: StdRng::seed_from_u64(seed),
            last_entity_id: 0,
        }
    }

    /// Seed this context was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The shared random stream
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Next dense entity id (1, 2, 3, ...), never reset between families
    pub fn next_entity_id(&mut self) -> u64 {
        self.last_entity_id += 1;
        self.last_entity_id
    }

    /// Number of entity ids allocated so far
    pub fn entities_allocated(&self) -> u64 {
        self.last_entity_id
    }

    /// Bernoulli draw: true with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        chance(&mut self.rng, p)
    }
}

// ============================================================================
// DRAW HELPERS (usable with any Rng)
// ============================================================================

/// True with probability `p`. Always consumes exactly one draw.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Uniformly pick one element of a non-empty constant table
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
