//! Random source for action multipliers.
//!
//! The engine never reaches for a global generator. Callers pass a
//! [`RandomSource`], which is any `rand::Rng` in production and a seeded
//! or fixed source in tests.

use rand::Rng;

/// Uniform draw over a closed real interval.
pub trait RandomSource {
    /// Draw from `[min, max]`. When `min >= max` the result is `min`.
    fn draw(&mut self, min: f64, max: f64) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn draw(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.gen_range(min..=max)
    }
}

/// Always returns the same multiplier, clamped into the requested range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRoll(pub f64);

impl RandomSource for FixedRoll {
    fn draw(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.0.clamp(min, max)
    }
}
