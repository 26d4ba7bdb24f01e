//! Deterministic random number generation.
//!
//! RULE: Nothing in the oracle may call any platform RNG.
//! All randomness flows through generators seeded from a string key
//! via `stable_hash32`, so every "random" value is a pure function of
//! its key (a date, a domain, a market candidate).
//!
//! The hash is 32-bit FNV-1a over UTF-16 code units and the generator is
//! mulberry32. Both are fixed: changing either reshuffles every simulated
//! inventory and market board that visitors have already seen.

use rand::{RngCore, SeedableRng};

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;

/// Map a string to a well-mixed 32-bit value. Pure, no hidden state.
pub fn stable_hash32(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET, |h, unit| {
        (h ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Stable value in [0, 1) with four decimal places of resolution.
/// Used where a single draw per key is enough (regime, jitter).
pub fn rand01(seed: &str) -> f64 {
    f64::from(stable_hash32(seed) % 10_000) / 10_000.0
}

/// mulberry32: a 32-bit state generator. Two instances built from the
/// same seed yield identical sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32();
        let hi = self.next_u32();
        (u64::from(hi) << 32) | u64::from(lo)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// A named, deterministic RNG for one computation (one inventory build,
/// one suggestion list).
pub struct OracleRng {
    pub name: &'static str,
    inner: Mulberry32,
}

impl OracleRng {
    /// Seed from the stable hash of `key`.
    pub fn from_key(name: &'static str, key: &str) -> Self {
        Self::from_seed(name, stable_hash32(key))
    }

    pub fn from_seed(name: &'static str, seed: u32) -> Self {
        Self {
            name,
            inner: Mulberry32::new(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.inner.next_u32()) / 4_294_967_296.0
    }

    /// Roll an index in [0, n). `None` for an empty range; no draw is
    /// consumed in that case.
    pub fn below(&mut self, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        Some((self.next_f64() * n as f64).floor() as usize)
    }

    /// Pick one element, or `None` from an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.below(items.len()).map(|i| &items[i])
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
