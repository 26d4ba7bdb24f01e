//! Deterministic domain label generation from curated word pools.
//!
//! All generation is deterministic (same RNG seed = same labels). The
//! order of RNG draws is part of the contract: inserting or reordering a
//! draw renames every simulated domain.

use crate::{config::InventoryParams, rng::OracleRng};

/// Deterministic label generator using the configured word pools.
pub struct NameGenerator<'a> {
    params: &'a InventoryParams,
}

impl<'a> NameGenerator<'a> {
    pub fn new(params: &'a InventoryParams) -> Self {
        Self { params }
    }

    /// Compose one label for generation index `index`.
    ///
    /// Draws three words up front, then decides the shape (single,
    /// two-part or three-part), then an optional numeric flair and, past
    /// the first index, an optional `-N` collision flair. `None` when a
    /// word pool is empty.
    pub fn generate_label(&self, rng: &mut OracleRng, index: usize) -> Option<String> {
        let rates = &self.params.rates;
        let w1 = rng.pick(&self.params.primary_words)?;
        let w2 = rng.pick(&self.params.secondary_words)?;
        let w3 = rng.pick(&self.params.primary_words)?;

        let mut label = if rng.chance(rates.single_word) {
            w1.clone()
        } else if rng.chance(rates.two_part) {
            format!("{w1}-{w2}")
        } else {
            format!("{w1}-{w2}-{w3}")
        };

        if rng.chance(rates.numeric_flair) {
            label.push_str(&(10 + rng.below(90).unwrap_or_default()).to_string());
        }

        if index > 0 && rng.chance(rates.collision_flair) {
            label.push_str(&format!("-{}", 1 + rng.below(9).unwrap_or_default()));
        }

        Some(label.chars().take(self.params.max_label_len).collect())
    }

    /// Fully-qualified domain for a label.
    pub fn domain_for(&self, label: &str) -> String {
        format!("{label}.{}", self.params.tld)
    }
}
