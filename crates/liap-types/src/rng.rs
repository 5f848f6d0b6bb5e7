//! Seeded RNG owned by game state — deterministic deals and reshuffles.
//!
//! All randomness that affects game-state correctness (dealing, redeal
//! reshuffles) goes through `RngState` so a given `(seed, sequence of draws)`
//! reproduces an identical game. Ambient (non-seeded) randomness is reserved
//! for process-level concerns with no bearing on rules — room codes, bot
//! think-time jitter.

use serde::{Deserialize, Serialize};

/// Counter-advancing seeded generator. Matches the `mulberry32` family:
/// small, fast, trivially serializable, and reproducible across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u32,
    pub counter: u32,
}

impl RngState {
    pub fn new(seed: u32) -> Self {
        Self { seed, counter: 0 }
    }

    /// Next value in `[0, 1)`. Advances the counter by 1.
    pub fn next_f64(&mut self) -> f64 {
        self.counter = self.counter.wrapping_add(1);
        mulberry32(self.seed.wrapping_add(self.counter))
    }

    /// Random `u32` in `[min, max]` inclusive.
    pub fn next_int(&mut self, min: u32, max: u32) -> u32 {
        let value = self.next_f64();
        min + (value * (max - min + 1) as f64) as u32
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let value = self.next_f64();
            let j = (value * (i + 1) as f64) as usize;
            slice.swap(i, j);
        }
    }
}

/// Mulberry32 PRNG: one u32 of state advanced by a running counter.
fn mulberry32(input: u32) -> f64 {
    let mut t: i32 = input.wrapping_add(0x6D2B79F5) as i32;

    let lhs = ((t as u32) ^ ((t as u32) >> 15)) as i32;
    let rhs = t | 1;
    t = lhs.wrapping_mul(rhs);

    let lhs2 = ((t as u32) ^ ((t as u32) >> 7)) as i32;
    let rhs2 = t | 61;
    let mul = lhs2.wrapping_mul(rhs2);
    t ^= t.wrapping_add(mul);

    let result = (t as u32) ^ ((t as u32) >> 14);
    result as f64 / 4294967296.0
}
