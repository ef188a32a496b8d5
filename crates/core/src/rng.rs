//! RNG module - xorshift128 piece sequence generator
//!
//! The generator is `Copy`: copying it forks the sequence, which is how every
//! participant of a round receives the same pieces in the same order.

use std::time::{SystemTime, UNIX_EPOCH};

/// Marsaglia xorshift128 generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xorshift128 {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl Xorshift128 {
    /// Create a generator with the given seed. The same seed always produces
    /// the same sequence (including seed 0).
    pub fn new(seed: u32) -> Self {
        Self {
            x: seed,
            y: 362_436_069,
            z: 521_288_629,
            w: 88_675_123,
        }
    }

    /// Create a generator seeded from the wall clock.
    pub fn from_clock() -> Self {
        Self::new(clock_seed())
    }

    /// Generate the next random u32
    pub fn next_u32(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = (self.w ^ (self.w >> 19)) ^ (t ^ (t >> 8));
        self.w
    }

    /// Generate random value in range [0, max). `max` of 0 yields 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }
}

/// Seed derived from the current time, never 0.
pub fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
        .unwrap_or(1);
    let seed = (nanos ^ (nanos >> 32)) as u32;
    if seed == 0 {
        1
    } else {
        seed
    }
}
