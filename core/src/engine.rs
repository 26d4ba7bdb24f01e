//! The oracle engine: one facade over every component.
//!
//! RULES:
//!   - Every operation takes `now` explicitly; the engine never reads the clock.
//!   - Scoring, portfolio, market and period operations never fail.
//!   - Inventory source resolution: override, else mock, else NoInventorySource.
//!   - The cache is an optimization only; NoCache yields identical output.

use crate::{
    cache::{NoCache, SnapshotCache, TtlCache},
    clock::{CurationSchedule, ScheduleStatus},
    config::OracleConfig,
    error::{OracleError, OracleResult},
    explainer::{explain_domain, DomainExplainer, DomainExplanation},
    inventory::{DomainRecord, InventorySimulator},
    market::{MarketBoard, MarketSimulator},
    period::{diff_periods, AcquisitionPace, PeriodDiff},
    portfolio::{PortfolioAnalyzer, PortfolioSummary},
    scorer::{DomainScorer, ScoreResult},
    snapshot::{InventorySnapshot, InventorySource},
    types::Timestamp,
};
use serde::{Deserialize, Serialize};

/// Period diff plus pacing and schedule context, as shown on the
/// curation panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    #[serde(flatten)]
    pub diff: PeriodDiff,
    pub pace: AcquisitionPace,
    pub schedule: ScheduleStatus,
}

pub struct OracleEngine {
    config: OracleConfig,
    cache: Box<dyn SnapshotCache>,
    explainer: Option<Box<dyn DomainExplainer>>,
    override_inventory: Option<(Vec<DomainRecord>, InventorySource)>,
    mock_enabled: bool,
}

impl OracleEngine {
    /// Uncached engine with the mock inventory enabled.
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            cache: Box::new(NoCache),
            explainer: None,
            override_inventory: None,
            mock_enabled: true,
        }
    }

    /// Engine wired the way a long-running host uses it: default TTL cache.
    pub fn build(config: OracleConfig) -> Self {
        Self::new(config).with_cache(Box::new(TtlCache::default()))
    }

    pub fn with_cache(mut self, cache: Box<dyn SnapshotCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_explainer(mut self, explainer: Box<dyn DomainExplainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    /// Serve `domains` instead of the simulated inventory.
    pub fn with_override(mut self, domains: Vec<DomainRecord>, source: InventorySource) -> Self {
        self.override_inventory = Some((domains, source));
        self
    }

    pub fn with_mock_enabled(mut self, enabled: bool) -> Self {
        self.mock_enabled = enabled;
        self
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn schedule(&self) -> CurationSchedule {
        CurationSchedule::new(&self.config.schedule)
    }

    /// Current inventory snapshot. `refresh` bypasses the cache.
    pub fn inventory(&self, now: Timestamp, refresh: bool) -> OracleResult<InventorySnapshot> {
        let key = self.cache_key()?;
        if !refresh {
            if let Some((hit, age)) = self.cache.get(&key, now) {
                log::debug!("cache hit: {key} (age {}s)", age.num_seconds());
                return Ok(hit);
            }
        }
        log::debug!("cache miss: {key} (refresh={refresh})");

        let snapshot = match &self.override_inventory {
            Some((domains, source)) => InventorySnapshot::new(domains.clone(), *source, now),
            None => {
                let domains = InventorySimulator::new(&self.config.inventory).build(now);
                InventorySnapshot::new(domains, InventorySource::Mock, now)
            }
        };
        self.cache.put(&key, snapshot.clone(), now);
        Ok(snapshot)
    }

    pub fn score(&self, domain: &str) -> ScoreResult {
        DomainScorer::new(&self.config).score(domain)
    }

    /// Model explanation when an explainer is configured, heuristic otherwise.
    pub fn explain(&self, domain: &str, now: Timestamp) -> DomainExplanation {
        let scorer = DomainScorer::new(&self.config);
        explain_domain(self.explainer.as_deref(), &scorer, domain, now)
    }

    pub fn portfolio(&self, now: Timestamp, refresh: bool) -> OracleResult<PortfolioSummary> {
        let snapshot = self.inventory(now, refresh)?;
        Ok(PortfolioAnalyzer::new(&self.config).analyze_snapshot(&snapshot, now))
    }

    pub fn market(&self, now: Timestamp) -> MarketBoard {
        MarketSimulator::new(&self.config.market).board(now)
    }

    /// Since-last-boundary window against the full day before it.
    pub fn period_report(&self, now: Timestamp, refresh: bool) -> OracleResult<PeriodReport> {
        let snapshot = self.inventory(now, refresh)?;
        let schedule = self.schedule();
        let (previous, current) = schedule.windows(now);
        Ok(PeriodReport {
            diff: diff_periods(&snapshot.domains, previous, current, &self.config.inventory.tld),
            pace: AcquisitionPace::measure(&snapshot.domains, now),
            schedule: schedule.status(now),
        })
    }

    pub fn schedule_status(&self, now: Timestamp) -> ScheduleStatus {
        self.schedule().status(now)
    }

    fn cache_key(&self) -> OracleResult<String> {
        match &self.override_inventory {
            Some((_, source)) => Ok(format!("inventory:{}", source.as_str())),
            None if self.mock_enabled => Ok("inventory:mock".into()),
            None => Err(OracleError::NoInventorySource),
        }
    }
}
