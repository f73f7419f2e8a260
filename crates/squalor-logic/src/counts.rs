//! Quality-biased count generation.
//!
//! Shape of the generator: draw a uniform integer from `[low, high)`; while
//! the quality is below the draw, add one and draw again. Shabbier places
//! (lower quality) win more draws, so the expected count never rises with
//! quality. Variance is high on purpose.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hard ceiling on a single count so a misconfigured range cannot spin forever.
pub const DEFAULT_COUNT_CAP: u32 = 64;

/// Half-open integer draw range `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRange {
    pub low: i32,
    pub high: i32,
}

impl DrawRange {
    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    pub fn is_empty(&self) -> bool {
        self.low >= self.high
    }

    /// One uniform draw, or `None` for an empty range.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<i32> {
        if self.is_empty() {
            None
        } else {
            Some(rng.gen_range(self.low..self.high))
        }
    }
}

/// "Draw until quality wins" counter for one clutter category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasedCount {
    pub range: DrawRange,
    #[serde(default = "default_cap")]
    pub cap: u32,
}

fn default_cap() -> u32 {
    DEFAULT_COUNT_CAP
}

impl BiasedCount {
    pub const fn new(low: i32, high: i32) -> Self {
        Self {
            range: DrawRange::new(low, high),
            cap: DEFAULT_COUNT_CAP,
        }
    }

    pub fn with_cap(mut self, cap: u32) -> Self {
        self.cap = cap;
        self
    }

    /// How many instances to place at this quality.
    pub fn roll<R: Rng + ?Sized>(&self, quality: i32, rng: &mut R) -> u32 {
        let mut count = 0;
        while count < self.cap {
            match self.range.draw(rng) {
                Some(draw) if quality < draw => count += 1,
                _ => break,
            }
        }
        count
    }

    /// Probability that a single draw beats `quality`.
    pub fn win_chance(&self, quality: i32) -> f32 {
        if self.range.is_empty() {
            return 0.0;
        }
        let span = (self.range.high - self.range.low) as f32;
        let winners = (self.range.high - (quality + 1).max(self.range.low)).max(0) as f32;
        winners / span
    }

    /// Expected count at this quality, ignoring the cap.
    pub fn expected(&self, quality: i32) -> f32 {
        let p = self.win_chance(quality);
        if p >= 1.0 {
            f32::INFINITY
        } else {
            p / (1.0 - p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mean(gen: &BiasedCount, quality: i32, trials: u32, seed: u64) -> f32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let total: u32 = (0..trials).map(|_| gen.roll(quality, &mut rng)).sum();
        total as f32 / trials as f32
    }

    #[test]
    fn test_quality_above_range_yields_zero() {
        let gen = BiasedCount::new(-5, 5);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert_eq!(gen.roll(12, &mut rng), 0);
        }
    }

    #[test]
    fn test_expectation_non_increasing_in_quality() {
        let gen = BiasedCount::new(-4, 10);
        let means: Vec<f32> = (0..10).map(|q| mean(&gen, q, 20_000, 7)).collect();
        for pair in means.windows(2) {
            // Sampling noise allowance
            assert!(pair[0] + 0.05 >= pair[1], "means not monotone: {:?}", means);
        }
        assert!(means[0] > means[9]);
    }

    #[test]
    fn test_empirical_mean_matches_geometric_expectation() {
        let gen = BiasedCount::new(-2, 9);
        let q = 2;
        let observed = mean(&gen, q, 50_000, 99);
        let expected = gen.expected(q);
        assert!((observed - expected).abs() < 0.05, "{} vs {}", observed, expected);
    }

    #[test]
    fn test_cap_bounds_runaway_ranges() {
        // quality below the whole range: every draw wins
        let gen = BiasedCount::new(5, 10).with_cap(8);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(gen.roll(0, &mut rng), 8);
        assert!(gen.expected(0).is_infinite());
    }

    #[test]
    fn test_empty_range_yields_zero() {
        let gen = BiasedCount::new(3, 3);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(gen.roll(-100, &mut rng), 0);
        assert_eq!(gen.win_chance(0), 0.0);
    }

    #[test]
    fn test_win_chance() {
        let gen = BiasedCount::new(-5, 5);
        // draws -5..=4; quality 2 loses to 3 and 4
        assert!((gen.win_chance(2) - 0.2).abs() < 1e-6);
        assert_eq!(gen.win_chance(4), 0.0);
        assert_eq!(gen.win_chance(-10), 1.0);
    }
}
