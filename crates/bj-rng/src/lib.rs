//! Linear congruential generator shared by level generation.
//!
//! Every randomized decision made while building a level advances one 32-bit
//! state. Multiplayer peers exchange only that state, so the sequence of
//! draws (and the order in which generation code requests them) must be
//! reproduced exactly on every machine.

use serde::{Deserialize, Serialize};

/// LCG multiplier (Numerical Recipes).
const MULTIPLIER: u32 = 1_664_525;
/// LCG increment (Numerical Recipes).
const INCREMENT: u32 = 1_013_904_223;
/// Each draw yields 15 bits taken from bits 16..31 of the state.
pub const VALUE_MASK: u32 = 0x7FFF;

/// Source of uniformly distributed draws for level generation.
///
/// Generation code never reaches for a global generator; the handle is
/// threaded explicitly through every randomized call.
pub trait LevelRng {
    /// Returns a value in `[0, bound)`. A zero bound yields 0 and still
    /// consumes a draw, so call order stays aligned between peers.
    fn choice(&mut self, bound: u32) -> u32;

    /// Current 32-bit state.
    fn state(&self) -> u32;

    /// Overwrite the state, e.g. with the seed received from a peer.
    fn set_state(&mut self, state: u32);

    /// Returns true with probability `1/n`.
    fn one_in(&mut self, n: u32) -> bool {
        self.choice(n) == 0
    }

    /// Offset `n` by a random amount in `(-offset, offset)`.
    fn sample(&mut self, n: f32, offset: u32) -> f32 {
        if self.choice(2) != 0 {
            n + self.choice(offset) as f32
        } else {
            n - self.choice(offset) as f32
        }
    }

    /// Fisher-Yates shuffle, last index first.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.choice(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// An RNG call trace entry, for hunting down desyncs between peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngTraceEntry {
    /// Sequence number (0-indexed)
    pub seq: u64,
    /// Requested bound
    pub bound: u32,
    /// Result value
    pub result: u32,
    /// State after the step
    pub state: u32,
}

/// The generator whose state is persisted across level transitions.
#[derive(Clone, Serialize, Deserialize)]
pub struct LinearGenerator {
    state: u32,
    /// Total number of draws taken (for tracing)
    call_count: u64,
    #[serde(skip)]
    tracing: bool,
    #[serde(skip)]
    trace: Vec<RngTraceEntry>,
}

impl core::fmt::Debug for LinearGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinearGenerator")
            .field("state", &self.state)
            .field("call_count", &self.call_count)
            .finish()
    }
}

impl LinearGenerator {
    /// Create a generator with the given state.
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed,
            call_count: 0,
            tracing: false,
            trace: Vec::new(),
        }
    }

    /// Create a generator with a random seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Advance the state and return the next 15-bit value.
    #[inline]
    pub fn next_value(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.call_count += 1;
        (self.state >> 16) & VALUE_MASK
    }

    /// Enable RNG tracing
    pub fn enable_tracing(&mut self) {
        self.tracing = true;
        self.trace.clear();
    }

    /// Disable RNG tracing
    pub fn disable_tracing(&mut self) {
        self.tracing = false;
    }

    /// Recorded draws since tracing was enabled.
    pub fn trace(&self) -> &[RngTraceEntry] {
        &self.trace
    }

    /// Total number of draws
    pub fn call_count(&self) -> u64 {
        self.call_count
    }
}

impl LevelRng for LinearGenerator {
    fn choice(&mut self, bound: u32) -> u32 {
        let raw = self.next_value();
        let result = if bound == 0 { 0 } else { raw % bound };
        if self.tracing {
            self.trace.push(RngTraceEntry {
                seq: self.call_count - 1,
                bound,
                result,
                state: self.state,
            });
        }
        result
    }

    fn state(&self) -> u32 {
        self.state
    }

    fn set_state(&mut self, state: u32) {
        self.state = state;
    }
}

impl Default for LinearGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Replays a recorded list of draws, then repeats `fallback` forever.
///
/// Useful for reproducing a peer's generation from a captured trace, and for
/// driving generation code down a specific path.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
    fallback: u32,
    state: u32,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            ..Self::default()
        }
    }

    /// Value returned (modulo the bound) once the script runs out.
    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Rebuild a script from a captured trace.
    pub fn from_trace(trace: &[RngTraceEntry]) -> Self {
        Self::new(trace.iter().map(|e| e.result).collect::<Vec<_>>())
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl LevelRng for ScriptedRng {
    fn choice(&mut self, bound: u32) -> u32 {
        let raw = self.values.get(self.cursor).copied().unwrap_or(self.fallback);
        self.cursor += 1;
        self.state = self.state.wrapping_add(1);
        if bound == 0 { 0 } else { raw % bound }
    }

    fn state(&self) -> u32 {
        self.state
    }

    fn set_state(&mut self, state: u32) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_sequence() {
        let mut rng = LinearGenerator::new(0);
        // state 1013904223 -> 0x3C6EF35F
        assert_eq!(rng.next_value(), 0x3C6E);
        assert_eq!(rng.state(), 1_013_904_223);
    }

    #[test]
    fn test_choice_bounds() {
        let mut rng = LinearGenerator::new(42);
        for _ in 0..1000 {
            assert!(rng.choice(10) < 10);
        }
    }

    #[test]
    fn test_zero_bound_still_advances() {
        let mut rng = LinearGenerator::new(7);
        let before = rng.state();
        assert_eq!(rng.choice(0), 0);
        assert_ne!(rng.state(), before);
        assert_eq!(rng.call_count(), 1);
    }

    #[test]
    fn test_state_roundtrip_reproduces_sequence() {
        let mut a = LinearGenerator::new(9);
        for _ in 0..17 {
            a.choice(5);
        }
        let mut b = LinearGenerator::new(0);
        b.set_state(a.state());
        for _ in 0..100 {
            assert_eq!(a.choice(1000), b.choice(1000));
        }
    }

    #[test]
    fn test_serde_keeps_state() {
        let mut rng = LinearGenerator::new(1234);
        rng.choice(3);
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: LinearGenerator = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), rng.state());
        assert_eq!(restored.choice(100), rng.choice(100));
    }

    #[test]
    fn test_tracing_records_draws() {
        let mut rng = LinearGenerator::new(5);
        rng.enable_tracing();
        let a = rng.choice(6);
        let b = rng.choice(2);
        let trace = rng.trace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].result, a);
        assert_eq!(trace[1].bound, 2);
        assert_eq!(trace[1].result, b);

        let mut replay = ScriptedRng::from_trace(trace);
        assert_eq!(replay.choice(6), a);
        assert_eq!(replay.choice(2), b);
    }

    #[test]
    fn test_scripted_fallback() {
        let mut rng = ScriptedRng::new([3, 4]).with_fallback(1);
        assert_eq!(rng.choice(10), 3);
        assert_eq!(rng.choice(3), 1);
        assert_eq!(rng.choice(10), 1);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = LinearGenerator::new(77);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn prop_values_fit_mask(seed in any::<u32>()) {
            let mut rng = LinearGenerator::new(seed);
            for _ in 0..64 {
                prop_assert!(rng.next_value() <= VALUE_MASK);
            }
        }

        #[test]
        fn prop_sample_within_offset(seed in any::<u32>(), offset in 1u32..8) {
            let mut rng = LinearGenerator::new(seed);
            let v = rng.sample(100.0, offset);
            prop_assert!((v - 100.0).abs() < offset as f32);
        }
    }
}
