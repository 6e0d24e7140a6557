//! Deterministic random number generation for dataset generation.
//!
//! RULE: The generator never calls any platform RNG.
//! All randomness flows through StreamRng instances derived from the
//! seed on the generation request.
//!
//! Each entity kind gets its own stream, seeded from
//! (master_seed XOR slot * golden-ratio constant). Changing how many
//! reviews are drawn therefore never shifts the seller stream.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use uuid::Uuid;

/// A deterministic RNG for one entity stream.
pub struct StreamRng {
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [lo, hi] inclusive.
    pub fn int_between(&mut self, lo: u32, hi: u32) -> u32 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        lo + self.next_u64_below(u64::from(hi - lo) + 1) as u32
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element uniformly. Panics on an empty slice; callers
    /// validate their inputs first.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = self.next_u64_below(items.len() as u64) as usize;
        &items[idx]
    }

    /// Index drawn in proportion to `weights`.
    pub fn weighted_index(&mut self, weights: &[u32]) -> usize {
        let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        let mut roll = self.next_u64_below(total);
        for (i, w) in weights.iter().enumerate() {
            let w = u64::from(*w);
            if roll < w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }

    /// A v4-shaped UUID whose bytes come from this stream.
    pub fn entity_id(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
    }
}

/// All entity streams for one generation run.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64)
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Users = 0,
    Sellers = 1,
    Orders = 2,
    Reviews = 3,
    Disputes = 4,
}

/// Parse a generated id back, for tests that check id shape.
pub fn is_entity_id(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}
