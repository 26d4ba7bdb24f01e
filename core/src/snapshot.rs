//! Inventory snapshot: the priced domain list plus headline stats,
//! as served to hosts and cached between polls.

use crate::{
    inventory::{attach_prices, total_spent_usd, DomainRecord},
    types::Timestamp,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InventorySource {
    Mock,
    Manual,
    Registry,
}

impl InventorySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Manual => "manual",
            Self::Registry => "registry",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub domains_bought: usize,
    pub total_spent_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub domains: Vec<DomainRecord>,
    pub fetched_at: Timestamp,
    pub source: InventorySource,
    pub stats: InventoryStats,
}

impl InventorySnapshot {
    /// Price every record and compute the headline stats.
    pub fn new(mut domains: Vec<DomainRecord>, source: InventorySource, fetched_at: Timestamp) -> Self {
        attach_prices(&mut domains);
        let stats = InventoryStats {
            domains_bought: domains.len(),
            total_spent_usd: total_spent_usd(&domains),
        };
        Self {
            domains,
            fetched_at,
            source,
            stats,
        }
    }

    pub fn is_mock(&self) -> bool {
        self.source == InventorySource::Mock
    }
}
