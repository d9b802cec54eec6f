//! Deterministic randomness for disguises and misinformation.
//!
//! Every random decision the engine makes (does the Spy look good, which
//! wrong number does a poisoned Empath hear, which two seats a Washerwoman
//! is shown) draws from one `GameRng` owned by the session context. Same
//! seed and same inputs reproduce the same session.
//!
//! ```
//! use clocktower_engine::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.gen_index(100), b.gen_index(100));
//!
//! // Independent streams for separate concerns
//! let mut spy = a.for_context("registration");
//! let mut fake = a.for_context("misinformation");
//! let _ = (spy.roll(), fake.roll());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Seeded ChaCha8 generator with named sub-streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derive an independent stream for a named concern.
    ///
    /// The same name always yields the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform float in `[0, 1)`.
    pub fn roll(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// `true` with the given probability. Out-of-range probabilities are
    /// clamped rather than rejected.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        let p = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
        self.inner.gen_bool(p)
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    pub fn gen_index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.inner.gen_range(0..len)
        }
    }

    /// Choose one element.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose up to `amount` distinct elements, in random order.
    #[must_use]
    pub fn choose_distinct<'a, T>(&mut self, slice: &'a [T], amount: usize) -> Vec<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose_multiple(&mut self.inner, amount).collect()
    }

    /// Shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Resume from a captured position.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG position, for saving a session mid-game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        for _ in 0..50 {
            assert_eq!(rng1.gen_index(1000), rng2.gen_index(1000));
        }
    }

    #[test]
    fn test_context_streams_differ() {
        let rng = GameRng::new(42);
        let mut a = rng.for_context("registration");
        let mut b = rng.for_context("misinformation");
        let sa: Vec<_> = (0..10).map(|_| a.gen_index(1000)).collect();
        let sb: Vec<_> = (0..10).map(|_| b.gen_index(1000)).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn test_gen_bool_extremes() {
        let mut rng = GameRng::new(1);
        for _ in 0..20 {
            assert!(rng.gen_bool(1.0));
            assert!(!rng.gen_bool(0.0));
            assert!(rng.gen_bool(3.0));
            assert!(!rng.gen_bool(f64::NAN));
        }
    }

    #[test]
    fn test_choose_distinct() {
        let mut rng = GameRng::new(9);
        let items = [1, 2, 3, 4, 5];
        let picked = rng.choose_distinct(&items, 3);
        assert_eq!(picked.len(), 3);
        let mut sorted: Vec<_> = picked.into_iter().copied().collect();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);

        assert_eq!(rng.choose_distinct(&items, 10).len(), 5);
    }

    #[test]
    fn test_gen_index_empty() {
        let mut rng = GameRng::new(3);
        assert_eq!(rng.gen_index(0), 0);
    }

    #[test]
    fn test_state_resume() {
        let mut rng = GameRng::new(42);
        for _ in 0..37 {
            rng.roll();
        }
        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_index(1000)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_index(1000)).collect();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let state = GameRngState { seed: 5, word_pos: 99 };
        let json = serde_json::to_string(&state).unwrap();
        let back: GameRngState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
