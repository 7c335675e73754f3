//! Randomness capability for probabilistic filters.
//!
//! Filters never construct their own generator; the embedding application
//! injects one of these (or its own implementation) at construction time.

use std::cell::RefCell;

use mockall::automock;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
#[automock]
pub trait RandomSource {
    fn sample(&self) -> f64;
}

/// Draws from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible stream from a fixed seed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: RefCell<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn sample(&self) -> f64 {
        self.rng.borrow_mut().gen::<f64>()
    }
}

/// Always returns the same value. Handy for replaying a decision.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn sample(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_in_unit_interval() {
        let source = ThreadRandom;
        for _ in 0..100 {
            let value = source.sample();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let first: Vec<f64> = (0..8).map(|_| a.sample()).collect();
        let second: Vec<f64> = (0..8).map(|_| b.sample()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mock_source() {
        let mut mock = MockRandomSource::new();
        mock.expect_sample().times(2).return_const(0.25);
        assert_eq!(mock.sample(), 0.25);
        assert_eq!(mock.sample(), 0.25);
    }
}
