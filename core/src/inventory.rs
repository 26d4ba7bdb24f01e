//! Inventory simulator: a deterministic, time-growing list of domains.
//!
//! The generator is seeded from the epoch's calendar date, never from
//! "now", so repeated builds replay the same name sequence and only the
//! count grows with elapsed time:
//!
//!   N = clamp(floor(minutes since epoch) * per_minute, 0, cap)
//!
//! Index `i` is created at `epoch + (i / per_minute) minutes +
//! (i % per_minute) * (60 / per_minute) seconds`.

use crate::{
    config::InventoryParams,
    error::{OracleError, OracleResult},
    name_generator::NameGenerator,
    rng::{stable_hash32, OracleRng},
    types::{day_key, round_cents, Timestamp},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainStatus {
    #[default]
    Active,
    Pending,
    Expired,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl DomainStatus {
    fn from_registry(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "ACTIVE" => Self::Active,
            "PENDING" => Self::Pending,
            "EXPIRED" => Self::Expired,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

/// One inventory entry, simulated or real.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub domain: String,
    #[serde(default)]
    pub status: DomainStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub expires: Option<Timestamp>,
    #[serde(default)]
    pub renewal_period: Option<u32>,
    #[serde(default)]
    pub privacy: Option<bool>,
    #[serde(default)]
    pub auto_renew: Option<bool>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub name_servers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
}

impl DomainRecord {
    /// A bare ACTIVE, locked, one-year record as used for curated lists.
    pub fn curated(domain: impl Into<String>, created_at: Option<Timestamp>) -> Self {
        Self {
            domain: domain.into(),
            status: DomainStatus::Active,
            created_at,
            expires: None,
            renewal_period: Some(1),
            privacy: None,
            auto_renew: None,
            locked: Some(true),
            name_servers: Vec::new(),
            price_usd: None,
        }
    }
}

/// Synthetic purchase price in USD: 2.00..10.00, a pure function of the
/// domain string so it never changes on refresh.
pub fn price_for_domain(domain: &str) -> f64 {
    let r = f64::from(stable_hash32(domain) % 1_000_000) / 1_000_000.0;
    round_cents(2.0 + r * 8.0)
}

/// Fill `price_usd` on every record with a non-empty domain.
pub fn attach_prices(domains: &mut [DomainRecord]) {
    for d in domains.iter_mut() {
        d.price_usd = (!d.domain.is_empty()).then(|| price_for_domain(&d.domain));
    }
}

pub fn total_spent_usd(domains: &[DomainRecord]) -> f64 {
    round_cents(domains.iter().filter_map(|d| d.price_usd).sum())
}

pub struct InventorySimulator<'a> {
    params: &'a InventoryParams,
}

impl<'a> InventorySimulator<'a> {
    pub fn new(params: &'a InventoryParams) -> Self {
        Self { params }
    }

    /// Number of records requested at `now` (before collision skips).
    pub fn target_count(&self, now: Timestamp) -> usize {
        let elapsed_ms = (now - self.params.epoch).num_milliseconds();
        if elapsed_ms <= 0 {
            return 0;
        }
        let minutes = (elapsed_ms / 60_000) as usize;
        minutes
            .saturating_mul(self.params.domains_per_minute)
            .min(self.params.cap)
    }

    /// Seed key for the name sequence. Uses the epoch's date, not `now`.
    pub fn seed_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.params.seed_namespace,
            day_key(self.params.epoch),
            self.params.seed_salt
        )
    }

    /// Creation time of generation index `index`. A zero rate (only
    /// possible in unvalidated params) places every record at the epoch.
    pub fn created_at(&self, index: usize) -> Timestamp {
        let per_minute = self.params.domains_per_minute;
        let (Some(minute), Some(slot), Some(spacing)) = (
            index.checked_div(per_minute),
            index.checked_rem(per_minute),
            60usize.checked_div(per_minute),
        ) else {
            return self.params.epoch;
        };
        self.params.epoch
            + Duration::minutes(minute as i64)
            + Duration::seconds((slot * spacing) as i64)
    }

    /// Build the simulated inventory at `now`, newest first.
    ///
    /// Collisions retry with `-2`..`-{collision_retry_max}` suffixes; a
    /// label still colliding after that is skipped, so the result may be
    /// shorter than `target_count`.
    pub fn build(&self, now: Timestamp) -> Vec<DomainRecord> {
        let n = self.target_count(now);
        if n == 0 {
            return Vec::new();
        }

        let mut rng = OracleRng::from_key("inventory", &self.seed_key());
        let names = NameGenerator::new(self.params);
        let rates = &self.params.rates;

        let mut out: Vec<DomainRecord> = Vec::with_capacity(n);
        let mut used: HashSet<String> = HashSet::with_capacity(n);
        let mut skipped = 0usize;

        for i in 0..n {
            let created_at = self.created_at(i);
            let span = usize::try_from(self.params.expiry_span_days).unwrap_or(0);
            let expiry_days =
                self.params.expiry_min_days + rng.below(span).unwrap_or_default() as i64;
            let expires = now + Duration::days(expiry_days);

            let Some(label) = names.generate_label(&mut rng, i) else {
                log::warn!("inventory: empty word pool, stopping at index {i}");
                break;
            };
            let mut domain = names.domain_for(&label);

            if used.contains(&domain) {
                if let Some(candidate) = (2..=self.params.collision_retry_max)
                    .map(|k| names.domain_for(&format!("{label}-{k}")))
                    .find(|c| !used.contains(c))
                {
                    domain = candidate;
                }
            }

            if used.contains(&domain) {
                skipped += 1;
                continue;
            }
            used.insert(domain.clone());

            out.push(DomainRecord {
                domain,
                status: DomainStatus::Active,
                created_at: Some(created_at),
                expires: Some(expires),
                renewal_period: Some(1),
                privacy: Some(rng.chance(rates.privacy)),
                auto_renew: Some(rng.chance(rates.auto_renew)),
                locked: Some(true),
                name_servers: self.params.name_servers.clone(),
                price_usd: None,
            });
        }

        out.sort_by(|x, y| y.created_at.cmp(&x.created_at));

        log::debug!(
            "inventory: requested={n} emitted={} skipped={skipped}",
            out.len()
        );
        out
    }
}

// ── Real-inventory overrides ───────────────────────────────────────

/// Parse a curated domain list: either a JSON array of rows or an object
/// with a `domains` array. Rows without a string `domain` are dropped.
pub fn parse_manual_domains(raw: &str) -> OracleResult<Vec<DomainRecord>> {
    let parsed: serde_json::Value = serde_json::from_str(raw)?;
    let rows = match &parsed {
        serde_json::Value::Array(rows) => rows,
        serde_json::Value::Object(obj) => match obj.get("domains") {
            Some(serde_json::Value::Array(rows)) => rows,
            _ => {
                return Err(OracleError::InvalidConfig {
                    reason: "manual domains file has no `domains` array".into(),
                })
            }
        },
        _ => {
            return Err(OracleError::InvalidConfig {
                reason: "manual domains file must be an array or object".into(),
            })
        }
    };

    Ok(rows
        .iter()
        .filter_map(|row| row.as_object())
        .filter_map(|rec| {
            let domain = rec.get("domain")?.as_str()?;
            if domain.is_empty() {
                return None;
            }
            let created_at = rec
                .get("createdAt")
                .and_then(|v| v.as_str())
                .and_then(parse_timestamp);
            Some(DomainRecord::curated(domain, created_at))
        })
        .collect())
}

pub fn load_manual_domains(path: &str) -> OracleResult<Vec<DomainRecord>> {
    let raw = std::fs::read_to_string(path)?;
    parse_manual_domains(&raw)
}

/// Keep only correctly-typed fields from a registrar list response row.
/// The registrar names auto-renew `renewAuto`.
pub fn normalize_registry_rows(rows: &[serde_json::Value]) -> Vec<DomainRecord> {
    rows.iter()
        .map(|row| {
            let empty = serde_json::Map::new();
            let rec = row.as_object().unwrap_or(&empty);
            let string = |k: &str| rec.get(k).and_then(|v| v.as_str());
            let boolean = |k: &str| rec.get(k).and_then(|v| v.as_bool());
            DomainRecord {
                domain: string("domain").unwrap_or_default().to_string(),
                status: string("status")
                    .map(DomainStatus::from_registry)
                    .unwrap_or_default(),
                created_at: string("createdAt").and_then(parse_timestamp),
                expires: string("expires").and_then(parse_timestamp),
                renewal_period: rec
                    .get("renewalPeriod")
                    .and_then(|v| v.as_u64())
                    .and_then(|v| u32::try_from(v).ok()),
                privacy: boolean("privacy"),
                auto_renew: boolean("renewAuto"),
                locked: boolean("locked"),
                name_servers: rec
                    .get("nameServers")
                    .and_then(|v| v.as_array())
                    .filter(|arr| arr.iter().all(|x| x.is_string()))
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|x| x.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default(),
                price_usd: None,
            }
        })
        .collect()
}

fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OracleConfig;

    #[test]
    fn price_is_in_range_and_rounded() {
        for d in ["meme.fun", "creator-hub.fun", "a.fun", ""] {
            let p = price_for_domain(d);
            assert!((2.0..=10.0).contains(&p), "{d} priced {p}");
            assert_eq!(round_cents(p), p);
        }
    }

    #[test]
    fn created_at_spaces_two_per_minute() {
        let cfg = OracleConfig::builtin();
        let sim = InventorySimulator::new(&cfg.inventory);
        let epoch = cfg.inventory.epoch;
        assert_eq!(sim.created_at(0), epoch);
        assert_eq!(sim.created_at(1), epoch + Duration::seconds(30));
        assert_eq!(sim.created_at(2), epoch + Duration::seconds(60));
        assert_eq!(sim.created_at(5), epoch + Duration::seconds(150));
    }

    #[test]
    fn target_count_floors_minutes() {
        let cfg = OracleConfig::builtin();
        let sim = InventorySimulator::new(&cfg.inventory);
        let epoch = cfg.inventory.epoch;
        assert_eq!(sim.target_count(epoch - Duration::hours(1)), 0);
        assert_eq!(sim.target_count(epoch + Duration::seconds(59)), 0);
        assert_eq!(sim.target_count(epoch + Duration::seconds(61)), 2);
        assert_eq!(sim.target_count(epoch + Duration::days(30)), 1000);
    }

    #[test]
    fn unvalidated_params_degrade_without_panicking() {
        let mut cfg = OracleConfig::builtin();
        cfg.inventory.domains_per_minute = 0;
        let sim = InventorySimulator::new(&cfg.inventory);
        let epoch = cfg.inventory.epoch;
        assert_eq!(sim.created_at(7), epoch);
        assert_eq!(sim.target_count(epoch + Duration::days(1)), 0);
        assert!(sim.build(epoch + Duration::days(1)).is_empty());

        let mut cfg = OracleConfig::builtin();
        cfg.inventory.primary_words.clear();
        cfg.inventory.expiry_span_days = -5;
        let sim = InventorySimulator::new(&cfg.inventory);
        assert!(sim.build(epoch + Duration::hours(1)).is_empty());
    }

    #[test]
    fn seed_key_uses_epoch_date() {
        let cfg = OracleConfig::builtin();
        let sim = InventorySimulator::new(&cfg.inventory);
        assert_eq!(sim.seed_key(), "funstr:mock:2026-01-14:reset");
    }

    #[test]
    fn manual_rows_accept_both_layouts() {
        let arr = r#"[{"domain":"meme.fun","createdAt":"2026-01-15T00:00:00Z"},{"nope":1},"x"]"#;
        let obj = r#"{"domains":[{"domain":"vibe.fun"},{"domain":""}]}"#;
        let a = parse_manual_domains(arr).unwrap();
        let b = parse_manual_domains(obj).unwrap();
        assert_eq!(a.len(), 1);
        assert!(a[0].created_at.is_some());
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].domain, "vibe.fun");
        assert_eq!(b[0].locked, Some(true));
        assert!(parse_manual_domains("42").is_err());
    }

    #[test]
    fn registry_rows_keep_only_typed_fields() {
        let rows: Vec<serde_json::Value> = serde_json::from_str(
            r#"[{"domain":"club.fun","status":"active","renewAuto":true,"privacy":"yes",
                 "renewalPeriod":2,"nameServers":["ns1.x","ns2.x"],"expires":"2027-01-01T00:00:00Z"},
                {"domain":"x.fun","nameServers":["ok",3]}]"#,
        )
        .unwrap();
        let recs = normalize_registry_rows(&rows);
        assert_eq!(recs[0].status, DomainStatus::Active);
        assert_eq!(recs[0].auto_renew, Some(true));
        assert_eq!(recs[0].privacy, None);
        assert_eq!(recs[0].renewal_period, Some(2));
        assert_eq!(recs[0].name_servers.len(), 2);
        assert!(recs[0].expires.is_some());
        assert!(recs[1].name_servers.is_empty());
    }
}
