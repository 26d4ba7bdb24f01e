//! Market signal simulator: a daily "what's trending" board over a fixed
//! candidate set of tokens, label shapes and starting letters.
//!
//! Candidates and their prior weights come from `MarketTables`, never
//! from the live inventory. Each candidate gets a 0–100 base score, a
//! day-seeded regime wobble, and synthetic telemetry (bids, offers,
//! watchers) that is folded into a ranking score. Dominance is each
//! candidate's share of the day's total ranking score.
//!
//! Everything is a pure function of (tables, UTC day): all visitors see
//! the same board for the same day.

use crate::{
    config::MarketTables,
    lexical::{syllable_groups, vowel_ratio, ShapeRuns},
    rng::rand01,
    types::{round1, DayKey, Timestamp},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MarketKey {
    Token(String),
    Shape(String),
    Start(String),
}

impl MarketKey {
    /// Parse `kind:value`; an unprefixed key is a token.
    pub fn parse(raw: &str) -> Self {
        if let Some(v) = raw.strip_prefix("token:") {
            Self::Token(v.to_string())
        } else if let Some(v) = raw.strip_prefix("shape:") {
            Self::Shape(v.to_string())
        } else if let Some(v) = raw.strip_prefix("start:") {
            Self::Start(v.to_string())
        } else {
            Self::Token(raw.to_string())
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token(_) => "token",
            Self::Shape(_) => "shape",
            Self::Start(_) => "start",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Token(v) | Self::Shape(v) | Self::Start(v) => v,
        }
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value())
    }
}

/// Synthetic activity for one candidate on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTelemetry {
    pub base_score: f64,
    pub bids: u32,
    pub offers: u32,
    pub watch: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSignal {
    pub key: MarketKey,
    pub dominance: f64,
    pub dominance_delta: f64,
    pub base_score: u32,
    pub bids: u32,
    pub offers: u32,
    pub watch: u32,
}

/// Average naming structure implied by the shape weight table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeBaseline {
    pub avg_len: f64,
    pub hyphen_rate: u32,
    pub digit_rate: u32,
    pub short_share: u32,
    pub brandable_share: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketBoard {
    pub day: DayKey,
    pub previous_day: DayKey,
    /// Deltas compare against a board built from this same version.
    pub config_version: String,
    pub signals: Vec<MarketSignal>,
    pub shape_baseline: ShapeBaseline,
}

impl MarketBoard {
    pub fn get(&self, key: &MarketKey) -> Option<&MarketSignal> {
        self.signals.iter().find(|s| &s.key == key)
    }

    /// Top `n` signals of one kind, in board order.
    pub fn top_of_kind(&self, kind: &str, n: usize) -> Vec<&MarketSignal> {
        self.signals
            .iter()
            .filter(|s| s.key.kind() == kind)
            .take(n)
            .collect()
    }
}

pub struct MarketSimulator<'a> {
    tables: &'a MarketTables,
}

impl<'a> MarketSimulator<'a> {
    pub fn new(tables: &'a MarketTables) -> Self {
        Self { tables }
    }

    /// Fixed candidate set with prior weights, in table order.
    pub fn candidates(&self) -> Vec<(MarketKey, f64)> {
        let t = self.tables;
        t.token_weights
            .iter()
            .map(|(v, w)| (MarketKey::Token(v.clone()), *w))
            .chain(t.shape_weights.iter().map(|(v, w)| (MarketKey::Shape(v.clone()), *w)))
            .chain(t.start_weights.iter().map(|(v, w)| (MarketKey::Start(v.clone()), *w)))
            .collect()
    }

    /// Board for the UTC day containing `now`.
    pub fn board(&self, now: Timestamp) -> MarketBoard {
        self.board_for_day(now.date_naive())
    }

    pub fn board_for_day(&self, day: NaiveDate) -> MarketBoard {
        let yesterday = day.pred_opt().unwrap_or(day);
        let today_key = day.format("%Y-%m-%d").to_string();
        let yesterday_key = yesterday.format("%Y-%m-%d").to_string();

        let candidates = self.candidates();
        let today: Vec<MarketTelemetry> = candidates
            .iter()
            .map(|(k, w)| self.telemetry(k, *w, &today_key))
            .collect();
        let prior: Vec<MarketTelemetry> = candidates
            .iter()
            .map(|(k, w)| self.telemetry(k, *w, &yesterday_key))
            .collect();

        let sum_today: f64 = today.iter().map(|t| t.score).sum();
        let sum_prior: f64 = prior.iter().map(|t| t.score).sum();

        let mut signals: Vec<MarketSignal> = candidates
            .into_iter()
            .zip(today.iter().zip(&prior))
            .map(|((key, _), (t, y))| {
                let dom = share(t.score, sum_today);
                let dom_prev = share(y.score, sum_prior);
                MarketSignal {
                    key,
                    dominance: round1(dom),
                    dominance_delta: round1(dom - dom_prev),
                    base_score: t.base_score.round() as u32,
                    bids: t.bids,
                    offers: t.offers,
                    watch: t.watch,
                }
            })
            .collect();

        // stable: equal dominance keeps candidate order
        signals.sort_by(|a, b| b.dominance.total_cmp(&a.dominance));

        log::debug!(
            "market board {today_key}: {} candidates, config v{}",
            signals.len(),
            self.tables.version
        );

        MarketBoard {
            day: today_key,
            previous_day: yesterday_key,
            config_version: self.tables.version.clone(),
            signals,
            shape_baseline: self.shape_baseline(),
        }
    }

    /// Convert a candidate's base score into the day's telemetry.
    pub fn telemetry(&self, key: &MarketKey, prior_weight: f64, day: &str) -> MarketTelemetry {
        let base_score = self.base_score(key, prior_weight, day);
        let jitter = (rand01(&format!("{day}:jitter:{key}")) - 0.5) * 2.0;
        let heat = (base_score / 100.0).clamp(0.0, 1.0);

        let bids = (2.0 + heat * 220.0 + jitter * (18.0 + heat * 12.0)).clamp(0.0, 360.0).round();
        let offers = (heat * 22.0 + jitter * (2.0 + heat * 3.0)).clamp(0.0, 60.0).round();
        let watch = (12.0 + heat * 640.0 + jitter * (40.0 + heat * 80.0)).clamp(0.0, 1400.0).round();

        MarketTelemetry {
            base_score,
            bids: bids as u32,
            offers: offers as u32,
            watch: watch as u32,
            score: bids * 2.6 + offers * 11.0 + watch * 0.55,
        }
    }

    pub fn base_score(&self, key: &MarketKey, prior_weight: f64, day: &str) -> f64 {
        match key {
            MarketKey::Token(v) => self.score_token(v, prior_weight, day),
            MarketKey::Shape(v) => score_shape(v, prior_weight, day),
            MarketKey::Start(v) => self.score_start(v, prior_weight, day),
        }
    }

    fn score_token(&self, value: &str, prior_weight: f64, day: &str) -> f64 {
        let t = value.to_lowercase();
        let len = t.chars().count();
        let vr = vowel_ratio(&t);
        let syll = syllable_groups(&t);

        let len_score = match len {
            0..=3 => 34.0,
            4 => 38.0,
            5 => 32.0,
            6 => 26.0,
            7..=8 => 16.0,
            9..=10 => 9.0,
            _ => 4.0,
        };
        let vowel_score = if vr == 0.0 {
            0.0
        } else if (0.25..=0.6).contains(&vr) {
            22.0
        } else if (0.15..=0.72).contains(&vr) {
            14.0
        } else {
            7.0
        };
        let syll_score = match syll {
            0 => 0.0,
            1..=3 => 16.0,
            _ => 9.0,
        };
        let momentum = momentum(prior_weight, 9.0, 24.0);
        let regime = regime(day, "token", &t, 0.85, 0.35);

        let bump = if self.tables.token_keyword_bumps.iter().any(|k| *k == t) {
            self.tables.token_keyword_bump
        } else {
            0.0
        };
        let penalty = if self.tables.token_penalties.iter().any(|k| *k == t) {
            self.tables.token_penalty
        } else {
            0.0
        };

        ((len_score + vowel_score + syll_score + momentum + bump - penalty) * regime).clamp(0.0, 100.0)
    }

    fn score_start(&self, value: &str, prior_weight: f64, day: &str) -> f64 {
        let c = value.chars().next().map(|c| c.to_ascii_lowercase());
        let base_letter = c
            .map(|c| self.tables.letter_weight(c))
            .unwrap_or(self.tables.default_letter_weight);
        let momentum = momentum(prior_weight, 10.0, 24.0);
        let letter = c.map(String::from).unwrap_or_default();
        let regime = regime(day, "start", &letter, 0.9, 0.3);
        ((base_letter + momentum) * 2.4 * regime).clamp(0.0, 100.0)
    }

    /// Weighted average structure of the shape table.
    pub fn shape_baseline(&self) -> ShapeBaseline {
        let mut total_w = 0.0;
        let mut sum_len = 0.0;
        let mut w_hyphen = 0.0;
        let mut w_digit = 0.0;
        let mut w_short = 0.0;
        let mut w_brandable = 0.0;

        for (shape, w) in &self.tables.shape_weights {
            if *w == 0.0 {
                continue;
            }
            let runs = ShapeRuns::parse(shape);
            let total = runs.total();
            total_w += w;
            sum_len += total as f64 * w;
            if runs.hyphens > 0 {
                w_hyphen += w;
            }
            if runs.digits > 0 {
                w_digit += w;
            }
            if (1..=5).contains(&total) {
                w_short += w;
            }
            if (4..=7).contains(&total) && runs.digits == 0 && runs.hyphens == 0 && runs.other == 0 {
                w_brandable += w;
            }
        }

        let rate = |x: f64| if total_w == 0.0 { 0 } else { (x / total_w * 100.0).round() as u32 };
        ShapeBaseline {
            avg_len: if total_w == 0.0 { 0.0 } else { round1(sum_len / total_w) },
            hyphen_rate: rate(w_hyphen),
            digit_rate: rate(w_digit),
            short_share: rate(w_short),
            brandable_share: rate(w_brandable),
        }
    }
}

fn score_shape(value: &str, prior_weight: f64, day: &str) -> f64 {
    let runs = ShapeRuns::parse(value);
    let total = runs.total();
    let frac = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };

    let length_score = match total {
        0..=3 => 36.0,
        4 => 40.0,
        5..=6 => 34.0,
        7..=8 => 24.0,
        9..=10 => 14.0,
        _ => 6.0,
    };
    let purity_score = (frac(runs.letters) * 35.0).round();
    let other_penalty = if runs.other > 0 { 14.0 } else { 0.0 };
    let penalties = (frac(runs.digits) * 26.0 + frac(runs.hyphens) * 22.0 + other_penalty).round();
    let momentum = momentum(prior_weight, 8.0, 20.0);
    let regime = regime(day, "shape", value, 0.88, 0.32);

    ((length_score + purity_score + momentum - penalties) * regime).clamp(0.0, 100.0)
}

/// Prior-weight momentum: `round(log2(1 + w) * scale)`, capped.
fn momentum(prior_weight: f64, scale: f64, cap: f64) -> f64 {
    ((1.0 + prior_weight.max(0.0)).log2() * scale).round().clamp(0.0, cap)
}

/// Day-seeded multiplier in `[floor, floor + span)`.
fn regime(day: &str, kind: &str, value: &str, floor: f64, span: f64) -> f64 {
    floor + span * rand01(&format!("{day}:regime:{kind}:{value}"))
}

fn share(score: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        score / total * 100.0
    }
}
