use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of every random decision made while seeding and propagating.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn sample(&mut self) -> f64;

    /// Uniform index in `[0, bound)`, `bound` must be positive.
    fn pick(&mut self, bound: usize) -> usize;

    /// Draw `count` distinct items of `pool` uniformly without replacement.
    ///
    /// Partial Fisher-Yates shuffle: the i-th draw picks among the items not drawn yet.
    fn choose_distinct(&mut self, pool: &[usize], count: usize) -> Vec<usize> {
        let count = count.min(pool.len());
        let mut remain = pool.to_vec();
        for ind in 0..count {
            let picked = ind + self.pick(remain.len() - ind);
            remain.swap(ind, picked);
        }
        remain.truncate(count);

        remain
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }

    fn pick(&mut self, bound: usize) -> usize {
        (**self).pick(bound)
    }
}

#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
    seed: u64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededSource {
    fn sample(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn pick(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Replays given samples and picks in order.
///
/// After the samples run out every sample is `fallback_sample`; after the picks run out
/// every pick is `0`. Picks are clamped into the requested bound.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: VecDeque<f64>,
    picks: VecDeque<usize>,
    fallback_sample: f64,
}

impl ScriptedSource {
    pub fn new(samples: &[f64], picks: &[usize]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            picks: picks.iter().copied().collect(),
            fallback_sample: 0.0,
        }
    }

    /// Every sample is `value`, every pick is `0`.
    pub fn constant(value: f64) -> Self {
        Self::new(&[], &[]).with_fallback(value)
    }

    pub fn with_fallback(mut self, value: f64) -> Self {
        assert!(
            (0.0..1.0).contains(&value),
            "Fallback sample({}) should be in [0, 1).",
            value
        );
        self.fallback_sample = value;
        self
    }
}

impl RandomSource for ScriptedSource {
    fn sample(&mut self) -> f64 {
        self.samples.pop_front().unwrap_or(self.fallback_sample)
    }

    fn pick(&mut self, bound: usize) -> usize {
        self.picks
            .pop_front()
            .unwrap_or(0)
            .min(bound.saturating_sub(1))
    }
}
