//! Portfolio analyzer: composition stats for a whole inventory, compared
//! against the configured baseline, with prioritized recommendations and a
//! day-seeded list of suggested next acquisitions.

use crate::{
    config::{BaselineComposition, OracleConfig},
    inventory::DomainRecord,
    lexical::{has_digits, label_of, top_n, trend_tokens},
    rng::OracleRng,
    snapshot::{InventorySnapshot, InventorySource},
    types::{day_key, pct, round1, Timestamp},
};
use serde::{Deserialize, Serialize};

const HYPHEN_ISSUE_DELTA: i64 = 12;
const DIGIT_ISSUE_DELTA: i64 = 8;
const LENGTH_ISSUE_DELTA: f64 = 2.0;
const LOW_BRANDABLE_PCT: u32 = 25;
const TOP_TOKENS: usize = 3;
const MAX_RECOMMENDATIONS: usize = 6;
const SUGGESTION_COUNT: usize = 6;
const SUGGESTION_MAX_DRAWS: usize = 256;
const BARE_SUGGESTION_RATE: f64 = 0.55;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[serde(rename = "med")]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioIssue {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

/// Signed distance of each aggregate from the baseline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaselineDeltas {
    pub avg_label_len: f64,
    pub brandable_pct: i64,
    pub short_pct: i64,
    pub hyphen_pct: i64,
    pub digits_pct: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasedOn {
    pub domains_bought: usize,
    pub fetched_at: Option<Timestamp>,
    pub source: Option<InventorySource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub count: usize,
    pub avg_label_len: f64,
    pub short_pct: u32,
    pub brandable_pct: u32,
    pub hyphen_pct: u32,
    pub digits_pct: u32,
    pub top_tokens: Vec<String>,
    pub baseline: BaselineComposition,
    pub deltas: Option<BaselineDeltas>,
    pub summary: String,
    pub issues: Vec<PortfolioIssue>,
    pub recommendations: Vec<String>,
    pub target_criteria: Vec<String>,
    pub suggested_domains: Vec<String>,
    pub based_on: BasedOn,
    pub generated_at: Timestamp,
}

pub struct PortfolioAnalyzer<'a> {
    config: &'a OracleConfig,
}

impl<'a> PortfolioAnalyzer<'a> {
    pub fn new(config: &'a OracleConfig) -> Self {
        Self { config }
    }

    /// Analyze a snapshot, recording where its data came from.
    pub fn analyze_snapshot(&self, snapshot: &InventorySnapshot, now: Timestamp) -> PortfolioSummary {
        let mut summary = self.analyze(&snapshot.domains, now);
        summary.based_on.fetched_at = Some(snapshot.fetched_at);
        summary.based_on.source = Some(snapshot.source);
        summary
    }

    pub fn analyze(&self, domains: &[DomainRecord], now: Timestamp) -> PortfolioSummary {
        let vocab = &self.config.vocabulary;
        let tld = &self.config.inventory.tld;
        let base = vocab.baseline;

        let labels: Vec<String> = domains
            .iter()
            .map(|d| label_of(&d.domain, tld))
            .filter(|l| !l.is_empty())
            .collect();
        let count = labels.len();

        let based_on = BasedOn {
            domains_bought: count,
            fetched_at: None,
            source: None,
        };

        if count == 0 {
            return PortfolioSummary {
                count: 0,
                avg_label_len: 0.0,
                short_pct: 0,
                brandable_pct: 0,
                hyphen_pct: 0,
                digits_pct: 0,
                top_tokens: Vec::new(),
                baseline: base,
                deltas: None,
                summary: "No domains found yet — add domains to unlock oracle guidance.".into(),
                issues: vec![PortfolioIssue {
                    severity: Severity::High,
                    title: "No reserve data available".into(),
                    detail: "Oracle needs the domain list to produce portfolio-level guidance.".into(),
                }],
                recommendations: Vec::new(),
                target_criteria: vocab.empty_target_criteria.clone(),
                suggested_domains: Vec::new(),
                based_on,
                generated_at: now,
            };
        }

        let lens: Vec<usize> = labels.iter().map(|l| l.chars().count()).collect();
        let avg_label_len = round1(lens.iter().sum::<usize>() as f64 / count as f64);
        let short_pct = pct(lens.iter().filter(|&&n| n <= 5).count(), count);
        let hyphen_pct = pct(labels.iter().filter(|l| l.contains('-')).count(), count);
        let digits_pct = pct(labels.iter().filter(|l| has_digits(l)).count(), count);
        let brandable_pct = pct(
            labels
                .iter()
                .zip(&lens)
                .filter(|(l, n)| l.chars().all(|c| c.is_ascii_lowercase()) && (4..=7).contains(*n))
                .count(),
            count,
        );

        let top_tokens: Vec<String> = top_n(labels.iter().flat_map(|l| trend_tokens(l)), TOP_TOKENS)
            .into_iter()
            .map(|(t, _)| t)
            .collect();

        let deltas = BaselineDeltas {
            avg_label_len: round1(avg_label_len - base.avg_label_len),
            brandable_pct: i64::from(brandable_pct) - i64::from(base.brandable_pct),
            short_pct: i64::from(short_pct) - i64::from(base.short_pct),
            hyphen_pct: i64::from(hyphen_pct) - i64::from(base.hyphen_pct),
            digits_pct: i64::from(digits_pct) - i64::from(base.digits_pct),
        };

        let mut issues = Vec::new();
        let mut recs: Vec<String> = Vec::new();

        if deltas.hyphen_pct >= HYPHEN_ISSUE_DELTA {
            issues.push(PortfolioIssue {
                severity: Severity::Medium,
                title: "Hyphen rate is high vs baseline".into(),
                detail: format!(
                    "Portfolio hyphen rate is {hyphen_pct}% (baseline ~{}%). This can reduce aftermarket liquidity.",
                    base.hyphen_pct
                ),
            });
            recs.push("Shift next buys toward single-token names (no hyphen) for better liquidity.".into());
        }

        if deltas.digits_pct >= DIGIT_ISSUE_DELTA {
            issues.push(PortfolioIssue {
                severity: Severity::Medium,
                title: "Digit rate is high vs baseline".into(),
                detail: format!(
                    "Portfolio digits rate is {digits_pct}% (baseline ~{}%). Digits often score worse on trust/brandability.",
                    base.digits_pct
                ),
            });
            recs.push(
                "Reduce digit-heavy picks; if using digits, keep them meaningful (e.g., '24', '69') and avoid random suffixes."
                    .into(),
            );
        }

        if avg_label_len - base.avg_label_len >= LENGTH_ISSUE_DELTA {
            issues.push(PortfolioIssue {
                severity: Severity::Low,
                title: "Average label length is above baseline".into(),
                detail: format!(
                    "Avg label length is {avg_label_len} (baseline ~{}). Shorter names tend to be more liquid.",
                    base.avg_label_len
                ),
            });
            recs.push("Target 4–8 character labels for the next wave to rebalance average length.".into());
        }

        if brandable_pct < LOW_BRANDABLE_PCT {
            issues.push(PortfolioIssue {
                severity: Severity::Low,
                title: "Low brandable share".into(),
                detail: format!(
                    "Only {brandable_pct}% of names are 4–7 letters (letters-only). These often have the best brandability."
                ),
            });
            recs.push("Increase the share of 4–7 letter letters-only labels (brandable core).".into());
        }

        if recs.is_empty() {
            recs.push(
                "Keep the mix balanced: stay close to baseline on hyphens/digits while increasing brandable 4–7 letter names."
                    .into(),
            );
        }
        recs.truncate(MAX_RECOMMENDATIONS);

        let suggested_domains = self.suggest(&top_tokens, avg_label_len, now);

        let mut summary = format!(
            "Portfolio snapshot: {count} domains • avg label {avg_label_len} • brandable {brandable_pct}% • short {short_pct}% • hyphen {hyphen_pct}% • digits {digits_pct}%"
        );
        if !top_tokens.is_empty() {
            summary.push_str(&format!(" • Top tokens: {}", top_tokens.join(", ")));
        }

        PortfolioSummary {
            count,
            avg_label_len,
            short_pct,
            brandable_pct,
            hyphen_pct,
            digits_pct,
            top_tokens,
            baseline: base,
            deltas: Some(deltas),
            summary,
            issues,
            recommendations: recs,
            target_criteria: vocab.target_criteria.clone(),
            suggested_domains,
            based_on,
            generated_at: now,
        }
    }

    /// Suggested next acquisitions, seeded by the UTC day and the
    /// portfolio's shape: same day + same portfolio ⇒ same list.
    pub fn suggest(&self, top_tokens: &[String], avg_label_len: f64, now: Timestamp) -> Vec<String> {
        let vocab = &self.config.vocabulary;
        let tld = &self.config.inventory.tld;
        let seed = format!(
            "oracle:suggest:{}:{}:{}",
            day_key(now),
            top_tokens.join(","),
            avg_label_len
        );
        let mut rng = OracleRng::from_key("suggest", &seed);

        let pool: Vec<&String> = vocab
            .keyword_tokens
            .iter()
            .chain(&vocab.suffix_tokens)
            .collect();
        if pool.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<String> = Vec::with_capacity(SUGGESTION_COUNT);
        for _ in 0..SUGGESTION_MAX_DRAWS {
            if out.len() == SUGGESTION_COUNT {
                break;
            }
            let Some(&left) = rng.pick(&pool) else {
                break;
            };
            let right = if rng.chance(BARE_SUGGESTION_RATE) {
                ""
            } else {
                rng.pick(&vocab.suggestion_suffixes).map_or("", String::as_str)
            };
            let label: String = format!("{left}{right}")
                .chars()
                .take(vocab.suggestion_max_label_len)
                .collect();
            let domain = format!("{label}.{tld}");
            if !out.contains(&domain) {
                out.push(domain);
            }
        }
        out
    }
}
