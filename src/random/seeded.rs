use rand::Rng;

use crate::foundation::error::{CanvasError, CanvasResult};

/// Modulus applied to arbitrary-size seed integers before they enter the recurrence.
pub const SEED_MODULUS: u64 = 4_294_967_295;

const LCG_MUL: u64 = 9301;
const LCG_INC: u64 = 49297;
const LCG_MOD: u64 = 233_280;

/// Upper bound (exclusive) for freshly drawn seeds.
const FRESH_SEED_BOUND: u64 = 1_000_000_000;

/// Session seed, already reduced into `[0, SEED_MODULUS)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// Build a seed from an integer, reducing it modulo [`SEED_MODULUS`].
    pub fn from_u64(raw: u64) -> Self {
        Self(raw % SEED_MODULUS)
    }

    /// Parse an integer literal of any length.
    ///
    /// Accepts decimal with an optional sign, or unsigned `0x`, `0o` and `0b` literals. Digits
    /// are folded modulo [`SEED_MODULUS`] as they are read, so inputs far beyond `u64` range
    /// still produce a stable seed. Negative values are reduced to their non-negative residue.
    pub fn parse(text: &str) -> CanvasResult<Self> {
        let t = text.trim();
        let (negative, unsigned) = match t.as_bytes().first() {
            Some(b'-') => (true, &t[1..]),
            Some(b'+') => (false, &t[1..]),
            _ => (false, t),
        };
        let (radix, digits) = match unsigned.get(..2) {
            Some("0x" | "0X") => (16, &unsigned[2..]),
            Some("0o" | "0O") => (8, &unsigned[2..]),
            Some("0b" | "0B") => (2, &unsigned[2..]),
            _ => (10, unsigned),
        };
        let invalid = || CanvasError::validation(format!("seed '{text}' is not an integer"));
        if digits.is_empty() || (radix != 10 && t.len() != unsigned.len()) {
            return Err(invalid());
        }

        let mut acc = 0u64;
        for c in digits.chars() {
            let d = c.to_digit(radix).ok_or_else(invalid)?;
            acc = (acc * u64::from(radix) + u64::from(d)) % SEED_MODULUS;
        }
        if negative && acc != 0 {
            acc = SEED_MODULUS - acc;
        }
        Ok(Self(acc))
    }

    /// Reduced seed value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolve the session seed: the explicit value when it parses, otherwise a fresh draw.
pub fn resolve_seed(explicit: Option<&str>) -> Seed {
    if let Some(text) = explicit.filter(|s| !s.trim().is_empty()) {
        match Seed::parse(text) {
            Ok(seed) => return seed,
            Err(e) => tracing::warn!(error = %e, "ignoring unparseable seed"),
        }
    }
    let fresh = rand::thread_rng().gen_range(0..FRESH_SEED_BOUND);
    tracing::debug!(seed = fresh, "drew fresh seed");
    Seed::from_u64(fresh)
}

/// Deterministic linear congruential stream of values in `[0, 1)`.
///
/// `state = (state * 9301 + 49297) mod 233280`, output `state / 233280`. The recurrence is
/// computed on integers, so every platform produces the same bits for the same seed.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Start a stream from `seed`.
    pub fn new(seed: Seed) -> Self {
        Self { state: seed.value() }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MUL + LCG_INC) % LCG_MOD;
        self.state as f64 / LCG_MOD as f64
    }

    /// Next value in `[lo, hi)`.
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Pick one element uniformly; `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = (self.next_f64() * items.len() as f64) as usize;
        items.get(idx.min(items.len() - 1))
    }
}

impl Iterator for SeededRng {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/random/seeded.rs"]
mod tests;
