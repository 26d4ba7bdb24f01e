//! Static configuration tables: inventory generation parameters, scoring
//! vocabulary, market candidate weights, curation schedule.
//!
//! Loaded once at startup from `data/` and injected everywhere. Nothing in
//! the scoring or simulation code carries its own vocabulary literals.

use crate::types::Timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ── Inventory ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryParams {
    /// Fixed reference instant; growth is measured from here.
    pub epoch: Timestamp,
    pub cap: usize,
    pub domains_per_minute: usize,
    pub seed_namespace: String,
    pub seed_salt: String,
    pub tld: String,
    pub primary_words: Vec<String>,
    pub secondary_words: Vec<String>,
    pub name_servers: Vec<String>,
    pub max_label_len: usize,
    pub collision_retry_max: u32,
    pub expiry_min_days: i64,
    pub expiry_span_days: i64,
    pub rates: GenerationRates,
}

/// Probabilities used while composing labels and record flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRates {
    pub single_word: f64,
    /// Conditional on not single-word: two-part below this, else three-part.
    pub two_part: f64,
    pub numeric_flair: f64,
    pub collision_flair: f64,
    pub privacy: f64,
    pub auto_renew: f64,
}

// ── Vocabulary ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub keyword_tokens: Vec<String>,
    pub suffix_tokens: Vec<String>,
    pub culture_numerics: Vec<String>,
    pub baseline: BaselineComposition,
    pub target_criteria: Vec<String>,
    pub empty_target_criteria: Vec<String>,
    pub suggestion_suffixes: Vec<String>,
    pub suggestion_max_label_len: usize,
}

impl Vocabulary {
    pub fn is_keyword(&self, token: &str) -> bool {
        self.keyword_tokens.iter().any(|t| t == token)
    }

    pub fn is_suffix(&self, token: &str) -> bool {
        self.suffix_tokens.iter().any(|t| t == token)
    }

    pub fn is_culture_numeric(&self, token: &str) -> bool {
        self.culture_numerics.iter().any(|t| t == token)
    }
}

/// "Typical market composition" the portfolio is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineComposition {
    pub avg_label_len: f64,
    pub brandable_pct: u32,
    pub short_pct: u32,
    pub hyphen_pct: u32,
    pub digits_pct: u32,
}

// ── Market ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTables {
    /// Bumped whenever any table below changes. Day-over-day deltas are
    /// only meaningful between boards built from the same version.
    pub version: String,
    pub token_weights: Vec<(String, f64)>,
    pub shape_weights: Vec<(String, f64)>,
    pub start_weights: Vec<(String, f64)>,
    pub letter_weights: Vec<(char, f64)>,
    pub default_letter_weight: f64,
    pub token_keyword_bumps: Vec<String>,
    pub token_keyword_bump: f64,
    pub token_penalties: Vec<String>,
    pub token_penalty: f64,
}

impl MarketTables {
    pub fn letter_weight(&self, c: char) -> f64 {
        self.letter_weights
            .iter()
            .find(|(l, _)| *l == c)
            .map(|(_, w)| *w)
            .unwrap_or(self.default_letter_weight)
    }
}

// ── Schedule ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub boundary_hour: u32,
    pub boundary_minute: u32,
    pub stage_millis: i64,
}

// ── Files ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct InventoryFile {
    inventory: InventoryParams,
    schedule: ScheduleParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    pub inventory: InventoryParams,
    pub vocabulary: Vocabulary,
    pub market: MarketTables,
    pub schedule: ScheduleParams,
}

impl OracleConfig {
    /// Load from the data/ directory.
    /// In tests, use OracleConfig::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let vocab_path = format!("{data_dir}/vocabulary.json");
        let vocab_content = std::fs::read_to_string(&vocab_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {vocab_path}: {e}"))?;
        let vocabulary: Vocabulary = serde_json::from_str(&vocab_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {vocab_path}: {e}"))?;

        let market_path = format!("{data_dir}/market.json");
        let market_content = std::fs::read_to_string(&market_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {market_path}: {e}"))?;
        let market: MarketTables = serde_json::from_str(&market_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {market_path}: {e}"))?;

        let inventory_path = format!("{data_dir}/inventory.json");
        let inventory_content = std::fs::read_to_string(&inventory_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {inventory_path}: {e}"))?;
        let inventory_file: InventoryFile = serde_json::from_str(&inventory_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {inventory_path}: {e}"))?;

        let config = Self {
            inventory: inventory_file.inventory,
            vocabulary,
            market,
            schedule: inventory_file.schedule,
        };
        config.validate()?;
        log::info!("Loaded oracle config v{} from {data_dir}", config.market.version);
        Ok(config)
    }

    /// Reject tables the generators cannot draw from.
    pub fn validate(&self) -> anyhow::Result<()> {
        let inv = &self.inventory;
        if inv.primary_words.is_empty() || inv.secondary_words.is_empty() {
            anyhow::bail!("inventory word pools must not be empty");
        }
        if inv.domains_per_minute == 0 || 60 % inv.domains_per_minute != 0 {
            anyhow::bail!("domains_per_minute must divide 60, got {}", inv.domains_per_minute);
        }
        if inv.expiry_span_days <= 0 {
            anyhow::bail!("expiry_span_days must be positive");
        }
        if self.vocabulary.keyword_tokens.is_empty() && self.vocabulary.suffix_tokens.is_empty() {
            anyhow::bail!("vocabulary needs at least one keyword or suffix token");
        }
        if self.schedule.boundary_hour > 23 || self.schedule.boundary_minute > 59 {
            anyhow::bail!(
                "invalid curation boundary {:02}:{:02}",
                self.schedule.boundary_hour,
                self.schedule.boundary_minute
            );
        }
        Ok(())
    }

    /// The tables shipped in data/, in code. Used by tests and as the
    /// runner's fallback when no data dir is given.
    pub fn builtin() -> Self {
        Self {
            inventory: InventoryParams {
                // 2026-01-14T21:55:00Z
                epoch: DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(1_768_427_700),
                cap: 1000,
                domains_per_minute: 2,
                seed_namespace: "funstr:mock".into(),
                seed_salt: "reset".into(),
                tld: "fun".into(),
                primary_words: strings(&[
                    "meme", "fun", "vibe", "lol", "hype", "party", "arcade", "pixel", "toon",
                    "clip", "beat", "dance", "spin", "quiz", "crew", "club", "chat", "stream",
                    "creator", "viral", "random", "luck", "play",
                ]),
                secondary_words: strings(&[
                    "lab", "labs", "studio", "vault", "arena", "zone", "hub", "room", "loop",
                    "stash", "mint", "drop", "show", "wave", "party", "games", "bot",
                ]),
                name_servers: strings(&["ns1.vercel-dns.com", "ns2.vercel-dns.com"]),
                max_label_len: 20,
                collision_retry_max: 10,
                expiry_min_days: 320,
                expiry_span_days: 120,
                rates: GenerationRates {
                    single_word: 0.55,
                    two_part: 0.95,
                    numeric_flair: 0.08,
                    collision_flair: 0.10,
                    privacy: 0.35,
                    auto_renew: 0.55,
                },
            },
            vocabulary: Vocabulary {
                keyword_tokens: strings(&[
                    "ai", "strawberry", "loop", "instant", "idols", "meme", "creator", "clip",
                    "beat", "dance", "quiz", "crew", "club", "chat", "stream", "viral",
                    "random", "luck", "play", "pixel", "arcade", "party", "vibe", "toon",
                    "games",
                ]),
                suffix_tokens: strings(&[
                    "studio", "lab", "labs", "hub", "zone", "vault", "arena", "bot",
                ]),
                culture_numerics: strings(&["404", "69", "420", "1337"]),
                baseline: BaselineComposition {
                    avg_label_len: 6.9,
                    brandable_pct: 33,
                    short_pct: 25,
                    hyphen_pct: 36,
                    digits_pct: 13,
                },
                target_criteria: strings(&[
                    "4–7 letters, letters-only (brandable core)",
                    "AI-related terms or novelty/lifestyle keywords (strawberry/loop/instant/idols)",
                    "Culture-centric numerics (404) or .fun-native tokens (creator/clip/beat/quiz/party)",
                ]),
                empty_target_criteria: strings(&[
                    "Prioritize single-token .fun names (4–7 letters)",
                    "Avoid digits unless there’s a strong meme/format reason",
                    "Keep hyphenation low for better resale liquidity",
                ]),
                suggestion_suffixes: strings(&[
                    "lab", "hub", "zone", "club", "studio", "vault", "room", "loop", "arena",
                ]),
                suggestion_max_label_len: 14,
            },
            market: MarketTables {
                version: "2026.01.1".into(),
                token_weights: weights(&[
                    ("fun", 96.0), ("play", 88.0), ("game", 30.0), ("games", 28.0),
                    ("party", 38.0), ("vibe", 80.0), ("laugh", 74.0), ("lol", 76.0),
                    ("meme", 92.0), ("memes", 88.0), ("viral", 70.0), ("trend", 68.0),
                    ("hype", 66.0), ("mix", 62.0), ("dance", 60.0), ("music", 58.0),
                    ("beat", 56.0), ("clip", 42.0), ("gif", 60.0), ("mash", 54.0),
                    ("quiz", 36.0), ("spin", 56.0), ("wheel", 52.0), ("luck", 54.0),
                    ("random", 52.0), ("story", 50.0), ("toon", 48.0), ("pixel", 50.0),
                    ("arcade", 62.0), ("arena", 48.0), ("creator", 82.0), ("crew", 52.0),
                    ("club", 56.0), ("chat", 64.0), ("stream", 62.0), ("live", 58.0),
                    ("social", 54.0), ("fans", 52.0), ("studio", 54.0), ("labs", 52.0),
                    ("ai", 88.0), ("rooms", 85.0), ("strawberry", 76.0), ("loop", 74.0),
                    ("instant", 72.0), ("idols", 70.0), ("bot", 54.0), ("agent", 50.0),
                ]),
                shape_weights: weights(&[
                    ("a3", 72.0), ("a4", 92.0), ("a5", 90.0), ("a6", 84.0), ("a7", 70.0),
                    ("a8", 58.0), ("a9", 48.0),
                    ("a3-1a3", 66.0), ("a4-1a3", 62.0), ("a3-1a4", 64.0), ("a4-1a4", 60.0),
                    ("a5-1a4", 54.0), ("a4-1a5", 52.0),
                    ("a4#2", 40.0), ("a5#2", 36.0), ("a5#3", 30.0), ("a6#2", 28.0),
                ]),
                start_weights: weights(&[
                    ("s", 90.0), ("m", 84.0), ("c", 82.0), ("a", 80.0), ("t", 76.0),
                    ("p", 74.0), ("b", 72.0), ("f", 70.0), ("g", 66.0), ("n", 64.0),
                    ("l", 62.0), ("h", 58.0), ("v", 56.0), ("d", 54.0), ("k", 52.0),
                    ("w", 50.0), ("z", 44.0),
                ]),
                letter_weights: vec![
                    ('a', 10.0), ('b', 12.0), ('c', 13.0), ('d', 10.0), ('e', 9.0),
                    ('f', 12.0), ('g', 11.0), ('h', 9.0), ('i', 9.0), ('j', 12.0),
                    ('k', 12.0), ('l', 12.0), ('m', 14.0), ('n', 11.0), ('o', 9.0),
                    ('p', 12.0), ('q', 7.0), ('r', 11.0), ('s', 15.0), ('t', 13.0),
                    ('u', 8.0), ('v', 11.0), ('w', 10.0), ('x', 9.0), ('y', 8.0),
                    ('z', 9.0),
                ],
                default_letter_weight: 8.0,
                token_keyword_bumps: strings(&[
                    "ai", "rooms", "creator", "strawberry", "loop", "instant", "idols", "labs",
                    "studio", "market", "trade", "coin", "dex", "swap", "memes", "meme", "fun",
                    "play", "vault", "reserve",
                ]),
                token_keyword_bump: 12.0,
                token_penalties: strings(&["party", "clip", "quiz", "game", "games"]),
                token_penalty: 25.0,
            },
            schedule: ScheduleParams {
                boundary_hour: 0,
                boundary_minute: 0,
                stage_millis: 2600,
            },
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn weights(items: &[(&str, f64)]) -> Vec<(String, f64)> {
    items.iter().map(|(k, w)| (k.to_string(), *w)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_is_valid() {
        OracleConfig::builtin().validate().unwrap();
    }

    #[test]
    fn token_candidates_are_unique() {
        let cfg = OracleConfig::builtin();
        let mut seen = std::collections::HashSet::new();
        for (token, _) in &cfg.market.token_weights {
            assert!(seen.insert(token.clone()), "duplicate token candidate {token}");
        }
    }

    #[test]
    fn unknown_letters_use_default_weight() {
        let cfg = OracleConfig::builtin();
        assert_eq!(cfg.market.letter_weight('s'), 15.0);
        assert_eq!(cfg.market.letter_weight('7'), 8.0);
    }

    #[test]
    fn rejects_non_divisor_rate() {
        let mut cfg = OracleConfig::builtin();
        cfg.inventory.domains_per_minute = 7;
        assert!(cfg.validate().is_err());
    }
}
