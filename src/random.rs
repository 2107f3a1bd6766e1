use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Shared random source for dot generation.
///
/// Wraps a `SmallRng` so tests can seed it and get the same population twice.
#[derive(Debug, Clone)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Integer in `[ceil(min), floor(max)]`, both ends inclusive.
    ///
    /// When the range is empty (e.g. a window narrower than two radii) the
    /// lower end is returned.
    pub fn uniform_int(&mut self, min: f32, max: f32) -> i64 {
        let lo = min.ceil() as i64;
        let hi = max.floor() as i64;
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Real in `[min, max)`.
    pub fn uniform_float(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }
}
