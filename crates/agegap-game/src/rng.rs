// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic pseudo-random numbers (`mulberry32-v1`).
//!
//! Every step uses wrapping 32-bit arithmetic:
//!
//! ```text
//! state = state + 0x6D2B79F5
//! t = (state ^ state >> 15) * (state | 1)
//! t = t ^ (t + (t ^ t >> 7) * (t | 61))
//! out = t ^ t >> 14
//! ```
//!
//! `next_f64` divides `out` by 2^32. Challenges depend on this exact
//! sequence, so any change here changes every past and future day.

/// Algorithm identifier for the generator below.
pub const ALGORITHM: &str = "mulberry32-v1";

/// Mulberry32 generator state.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(s | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// In-place Fisher-Yates shuffle driven only by `rng`.
pub fn shuffle<T>(items: &mut [T], rng: &mut Mulberry32) {
    for i in (1..items.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64) as usize;
        items.swap(i, j);
    }
}
