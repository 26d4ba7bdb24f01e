//! Domain scorer: a 0–100 brandability heuristic for a single label.
//!
//! Additive from a base of 50, clamped at the end:
//!   length         ≤3: −12 | 4–5: +10 | 6–8: +14 | 9–12: +2 | >12: −14 − min(16, len−12)
//!   hyphen         −8
//!   digits         −10, or −3 when a culture-numeric token is present
//!   brandable      +10 (letters-only, length 4–7)
//!   vowel ratio    +6 in [30,60]%, −6 outside [20,70]%
//!   vocabulary     +min(14, 6 + 4 × distinct keyword/suffix/numeric hits)

use crate::{
    config::{OracleConfig, Vocabulary},
    lexical::{has_digits, label_of, letters_only, tokens_of, vowel_pct},
};
use serde::{Deserialize, Serialize};

pub const STRONG_THRESHOLD: u32 = 75;
pub const WEAK_THRESHOLD: u32 = 45;
pub const MAX_REASONS: usize = 6;
pub const MAX_CAUTIONS: usize = 5;
const MAX_FEATURE_TOKENS: usize = 6;
const MAX_VOCAB_BONUS: i32 = 14;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Strong,
    Okay,
    Weak,
}

impl Verdict {
    pub fn from_score(score: u32) -> Self {
        if score >= STRONG_THRESHOLD {
            Self::Strong
        } else if score <= WEAK_THRESHOLD {
            Self::Weak
        } else {
            Self::Okay
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainFeatures {
    pub label: String,
    pub label_len: usize,
    pub tokens: Vec<String>,
    pub has_hyphen: bool,
    pub has_digits: bool,
    pub vowel_pct: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: u32,
    pub verdict: Verdict,
    pub reasons: Vec<String>,
    pub cautions: Vec<String>,
    pub features: DomainFeatures,
}

impl ScoreResult {
    /// Re-establish the invariants: score in [0,100], verdict derived
    /// from score, reasons/cautions distinct and capped.
    pub fn normalized(mut self) -> Self {
        self.score = self.score.min(100);
        self.verdict = Verdict::from_score(self.score);
        self.reasons = dedup_capped(self.reasons, MAX_REASONS);
        self.cautions = dedup_capped(self.cautions, MAX_CAUTIONS);
        self
    }
}

pub struct DomainScorer<'a> {
    vocab: &'a Vocabulary,
    tld: &'a str,
}

impl<'a> DomainScorer<'a> {
    pub fn new(config: &'a OracleConfig) -> Self {
        Self {
            vocab: &config.vocabulary,
            tld: &config.inventory.tld,
        }
    }

    pub fn score(&self, domain: &str) -> ScoreResult {
        let label = label_of(domain, self.tld);
        let has_hyphen = label.contains('-');
        let has_digits = has_digits(&label);
        let tokens: Vec<String> = tokens_of(&label, self.tld)
            .into_iter()
            .filter(|t| t.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
            .collect();
        let vowel_pct = vowel_pct(&label);
        let label_len = label.chars().count();
        let letters_only_ok = letters_only(&label).chars().count() == label_len;

        let keyword_hits: Vec<&String> = tokens.iter().filter(|t| self.vocab.is_keyword(t)).collect();
        let suffix_hits: Vec<&String> = tokens.iter().filter(|t| self.vocab.is_suffix(t)).collect();
        let numeric_hits: Vec<&String> =
            tokens.iter().filter(|t| self.vocab.is_culture_numeric(t)).collect();
        let has_culture_numeric = !numeric_hits.is_empty();

        let mut score: i32 = 50;

        score += match label_len {
            0..=3 => -12,
            4..=5 => 10,
            6..=8 => 14,
            9..=12 => 2,
            n => -14 - (n as i32 - 12).min(16),
        };

        if has_hyphen {
            score -= 8;
        }
        if has_digits {
            score -= if has_culture_numeric { 3 } else { 10 };
        }
        if letters_only_ok && (4..=7).contains(&label_len) {
            score += 10;
        }
        if (30..=60).contains(&vowel_pct) {
            score += 6;
        } else if vowel_pct < 20 || vowel_pct > 70 {
            score -= 6;
        }

        let mut strong_hits: Vec<&String> = Vec::new();
        for hit in keyword_hits.iter().chain(&suffix_hits).chain(&numeric_hits) {
            if !strong_hits.contains(hit) {
                strong_hits.push(*hit);
            }
        }
        if !strong_hits.is_empty() {
            score += MAX_VOCAB_BONUS.min(6 + 4 * strong_hits.len() as i32);
        }

        let score = score.clamp(0, 100) as u32;

        let mut reasons: Vec<String> = Vec::new();
        let mut cautions: Vec<String> = Vec::new();

        if label_len <= 8 {
            reasons.push(format!("Short label ({label_len} chars) tends to be easier to recall"));
        } else {
            cautions.push(format!(
                "Long label ({label_len} chars) can reduce type-in + resale liquidity"
            ));
        }

        if has_hyphen {
            cautions.push("Hyphenated labels often trade thinner than single-token names".into());
        } else {
            reasons.push("No hyphen (cleaner naming structure)".into());
        }

        if !has_digits {
            reasons.push("No digits (less \"generated\" vibe)".into());
        } else if let Some(numeric) = numeric_hits.first() {
            reasons.push(format!(
                "Culture-centric numeric ({numeric}) can resonate in meme-friendly markets"
            ));
        } else {
            cautions.push("Digits can lower trust/brandability for many buyers".into());
        }

        if (30..=60).contains(&vowel_pct) {
            reasons.push(format!("Pronounceability looks decent (vowels ~{vowel_pct}%)"));
        } else {
            cautions.push(format!("Pronounceability may be weaker (vowels ~{vowel_pct}%)"));
        }

        if let Some(reason) = self.vocabulary_reason(&keyword_hits, &suffix_hits, &numeric_hits) {
            reasons.push(reason);
        } else if !tokens.is_empty() {
            reasons.push(format!("Readable token(s): {}", head_joined(&tokens, 3)));
        }

        ScoreResult {
            score,
            verdict: Verdict::from_score(score),
            reasons,
            cautions,
            features: DomainFeatures {
                label,
                label_len,
                tokens: tokens.into_iter().take(MAX_FEATURE_TOKENS).collect(),
                has_hyphen,
                has_digits,
                vowel_pct,
            },
        }
        .normalized()
    }

    /// Pattern phrasing (keyword + suffix, numeric + keyword) wins over a
    /// single-category explanation.
    fn vocabulary_reason(
        &self,
        keywords: &[&String],
        suffixes: &[&String],
        numerics: &[&String],
    ) -> Option<String> {
        let tld = self.tld;
        match (keywords.first(), suffixes.first(), numerics.first()) {
            (Some(k), Some(s), _) => Some(format!("Market pattern: {k} + {s}")),
            (Some(k), None, Some(n)) => Some(format!("Market pattern: {n} + {k}")),
            (Some(_), None, None) => Some(format!(
                "Common .{tld} market keyword(s): {}",
                head_joined(keywords, 3)
            )),
            (None, _, Some(n)) => Some(format!(
                "Culture-centric numeric: {n} (meme-friendly, market-validated)"
            )),
            (None, Some(_), None) => Some(format!(
                "Common .{tld} naming suffix: {}",
                head_joined(suffixes, 2)
            )),
            (None, None, None) => None,
        }
    }
}

fn head_joined<S: AsRef<str>>(items: &[S], n: usize) -> String {
    items
        .iter()
        .take(n)
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

fn dedup_capped(items: Vec<String>, cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len().min(cap));
    for item in items {
        if out.len() == cap {
            break;
        }
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_thresholds_are_inclusive() {
        assert_eq!(Verdict::from_score(75), Verdict::Strong);
        assert_eq!(Verdict::from_score(74), Verdict::Okay);
        assert_eq!(Verdict::from_score(46), Verdict::Okay);
        assert_eq!(Verdict::from_score(45), Verdict::Weak);
        assert_eq!(Verdict::from_score(0), Verdict::Weak);
    }

    #[test]
    fn normalized_dedups_and_caps() {
        let raw = ScoreResult {
            score: 180,
            verdict: Verdict::Weak,
            reasons: vec!["a".into(), "a".into(), "b".into()],
            cautions: (0..9).map(|i| i.to_string()).collect(),
            features: DomainFeatures {
                label: "x".into(),
                label_len: 1,
                tokens: vec![],
                has_hyphen: false,
                has_digits: false,
                vowel_pct: 0,
            },
        }
        .normalized();
        assert_eq!(raw.score, 100);
        assert_eq!(raw.verdict, Verdict::Strong);
        assert_eq!(raw.reasons, vec!["a", "b"]);
        assert_eq!(raw.cautions.len(), MAX_CAUTIONS);
    }
}
