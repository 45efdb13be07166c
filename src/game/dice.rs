//! Injectable randomness for all probabilistic transitions.
//!
//! Every reward roll, enhancement attempt, and battle contest draws through
//! the [`Dice`] trait instead of a global generator, so tests can script the
//! exact sequence of outcomes with [`SeqDice`] while production uses a
//! seedable [`StdDice`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws and probability checks.
pub trait Dice {
    /// Uniform integer in `0..n`. Returns 0 when `n == 0`.
    fn below(&mut self, n: u32) -> u32;

    /// Bernoulli draw: true with probability `p` (clamped to `[0, 1]`).
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform integer in `lo..=hi`.
    fn between(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.below(hi - lo + 1)
    }
}

/// Production dice backed by a `StdRng`.
pub struct StdDice {
    rng: StdRng,
}

impl StdDice {
    pub fn from_entropy() -> Self {
        StdDice {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic dice for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        StdDice {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Dice for StdDice {
    fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.gen::<f64>() < p
    }
}

/// Scripted dice for tests: pops queued values in order.
///
/// `below`/`between` consume from `rolls`; `chance` consumes from `checks`.
/// Running out of queued values panics, which keeps a test honest about how
/// many draws the code under test performs.
#[derive(Default)]
pub struct SeqDice {
    rolls: VecDeque<u32>,
    checks: VecDeque<bool>,
}

impl SeqDice {
    pub fn new() -> Self {
        SeqDice::default()
    }

    pub fn with_rolls(mut self, rolls: &[u32]) -> Self {
        self.rolls.extend(rolls.iter().copied());
        self
    }

    pub fn with_checks(mut self, checks: &[bool]) -> Self {
        self.checks.extend(checks.iter().copied());
        self
    }
}

impl Dice for SeqDice {
    fn below(&mut self, n: u32) -> u32 {
        let v = self.rolls.pop_front().expect("SeqDice: roll queue empty");
        if n == 0 {
            0
        } else {
            v.min(n - 1)
        }
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.checks.pop_front().expect("SeqDice: check queue empty")
    }
}
