//! Period-diff calculator: naming statistics for domains acquired inside
//! a time window, and the deltas between two windows.

use crate::{
    inventory::DomainRecord,
    lexical::{has_digits, label_of, letters_only, syllable_groups, top_n, trend_tokens, vowel_ratio},
    types::{pct, round1, Timestamp},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Statistics of one half-open window. All zero when the window is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub count: usize,
    pub avg_len: f64,
    pub p_digits: u32,
    pub p_hyphen: u32,
    pub vowel_pct: u32,
    pub avg_syllables: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_token: Option<TokenCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Window {
    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDiff {
    pub previous_window: Window,
    pub current_window: Window,
    pub previous: PeriodStats,
    pub current: PeriodStats,
    pub delta_avg_len: f64,
    pub delta_digits: i64,
    pub delta_hyphen: i64,
    pub delta_vowel_pct: i64,
    pub delta_avg_syllables: f64,
    pub delta_count: i64,
}

/// Stats over records whose `createdAt` falls in `window`. Records
/// without a creation time never qualify.
pub fn compute_period_stats(domains: &[DomainRecord], window: Window, tld: &str) -> PeriodStats {
    let labels: Vec<String> = domains
        .iter()
        .filter(|d| d.created_at.is_some_and(|t| window.contains(t)))
        .map(|d| label_of(&d.domain, tld))
        .filter(|l| !l.is_empty())
        .collect();

    let count = labels.len();
    if count == 0 {
        return PeriodStats::default();
    }

    let total_len: usize = labels.iter().map(|l| l.chars().count()).sum();
    let hyphens = labels.iter().filter(|l| l.contains('-')).count();
    let digits = labels.iter().filter(|l| has_digits(l)).count();

    let letters: Vec<String> = labels
        .iter()
        .map(|l| letters_only(l))
        .filter(|l| !l.is_empty())
        .collect();
    let (vowel_pct, avg_syllables) = if letters.is_empty() {
        (0, 0.0)
    } else {
        let joined = letters.concat();
        let syll: usize = letters.iter().map(|l| syllable_groups(l)).sum();
        (
            (vowel_ratio(&joined) * 100.0).round() as u32,
            round1(syll as f64 / letters.len() as f64),
        )
    };

    let top_token = top_n(labels.iter().flat_map(|l| trend_tokens(l)), 1)
        .into_iter()
        .next()
        .map(|(token, count)| TokenCount { token, count });

    PeriodStats {
        count,
        avg_len: round1(total_len as f64 / count as f64),
        p_digits: pct(digits, count),
        p_hyphen: pct(hyphens, count),
        vowel_pct,
        avg_syllables,
        top_token,
    }
}

pub fn diff_periods(
    domains: &[DomainRecord],
    previous_window: Window,
    current_window: Window,
    tld: &str,
) -> PeriodDiff {
    let previous = compute_period_stats(domains, previous_window, tld);
    let current = compute_period_stats(domains, current_window, tld);
    PeriodDiff {
        previous_window,
        current_window,
        delta_avg_len: round1(current.avg_len - previous.avg_len),
        delta_digits: current.p_digits as i64 - previous.p_digits as i64,
        delta_hyphen: current.p_hyphen as i64 - previous.p_hyphen as i64,
        delta_vowel_pct: current.vowel_pct as i64 - previous.vowel_pct as i64,
        delta_avg_syllables: round1(current.avg_syllables - previous.avg_syllables),
        delta_count: current.count as i64 - previous.count as i64,
        previous,
        current,
    }
}

/// How quickly the inventory has been growing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionPace {
    pub acquired_24h: usize,
    pub acquired_7d: usize,
    pub acquired_prev_24h: usize,
    /// Share of records carrying a creation time.
    pub created_coverage_pct: u32,
    pub newest_created_at: Option<Timestamp>,
    pub oldest_created_at: Option<Timestamp>,
}

impl AcquisitionPace {
    pub fn measure(domains: &[DomainRecord], now: Timestamp) -> Self {
        let day = Duration::hours(24);
        let created: Vec<Timestamp> = domains.iter().filter_map(|d| d.created_at).collect();
        let within = |lo: Duration, hi: Duration| {
            created
                .iter()
                .filter(|t| {
                    let age = now - **t;
                    age > lo && age <= hi
                })
                .count()
        };

        let fresh = |hi: Duration| created.iter().filter(|t| now - **t <= hi).count();

        Self {
            acquired_24h: fresh(day),
            acquired_7d: fresh(Duration::days(7)),
            acquired_prev_24h: within(day, day * 2),
            created_coverage_pct: pct(created.len(), domains.len()),
            newest_created_at: created.iter().max().copied(),
            oldest_created_at: created.iter().min().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 15, h, m, 0).unwrap()
    }

    fn rec(domain: &str, created: Timestamp) -> DomainRecord {
        DomainRecord::curated(domain, Some(created))
    }

    #[test]
    fn empty_window_is_all_zero() {
        let w = Window { start: at(1, 0), end: at(2, 0) };
        let stats = compute_period_stats(&[rec("meme.fun", at(3, 0))], w, "fun");
        assert_eq!(stats, PeriodStats::default());
    }

    #[test]
    fn window_is_half_open() {
        let w = Window { start: at(1, 0), end: at(2, 0) };
        let d = [rec("start.fun", at(1, 0)), rec("end.fun", at(2, 0))];
        let stats = compute_period_stats(&d, w, "fun");
        assert_eq!(stats.count, 1);
        assert_eq!(stats.top_token.unwrap().token, "start");
    }

    #[test]
    fn stats_cover_shape_and_tokens() {
        let w = Window { start: at(0, 0), end: at(12, 0) };
        let d = [
            rec("meme-lab.fun", at(1, 0)),
            rec("meme42.fun", at(2, 0)),
            rec("party.fun", at(3, 0)),
            rec("nocreated.fun", at(13, 0)),
        ];
        let stats = compute_period_stats(&d, w, "fun");
        assert_eq!(stats.count, 3);
        assert_eq!(stats.p_hyphen, 33);
        assert_eq!(stats.p_digits, 33);
        // "meme-lab" 8, "meme42" 6, "party" 5
        assert_eq!(stats.avg_len, 6.3);
        assert_eq!(stats.top_token, Some(TokenCount { token: "meme".into(), count: 2 }));
    }

    #[test]
    fn diff_subtracts_previous_from_current() {
        let prev = Window { start: at(0, 0), end: at(6, 0) };
        let cur = Window { start: at(6, 0), end: at(12, 0) };
        let d = [rec("ab.fun", at(1, 0)), rec("abcd-1.fun", at(7, 0))];
        let diff = diff_periods(&d, prev, cur, "fun");
        assert_eq!(diff.delta_count, 0);
        assert_eq!(diff.delta_avg_len, 4.0);
        assert_eq!(diff.delta_digits, 100);
        assert_eq!(diff.delta_hyphen, 100);
    }

    #[test]
    fn pace_buckets_by_age() {
        let now = at(12, 0);
        let d = [
            rec("a.fun", now - Duration::hours(1)),
            rec("b.fun", now - Duration::hours(30)),
            rec("c.fun", now - Duration::days(5)),
            DomainRecord::curated("d.fun", None),
        ];
        let pace = AcquisitionPace::measure(&d, now);
        assert_eq!(pace.acquired_24h, 1);
        assert_eq!(pace.acquired_prev_24h, 1);
        assert_eq!(pace.acquired_7d, 3);
        assert_eq!(pace.created_coverage_pct, 75);
        assert_eq!(pace.oldest_created_at, Some(now - Duration::days(5)));
    }
}
