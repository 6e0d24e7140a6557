//! Per-request result cache.
//!
//! Entries are keyed by the query and its parameters and tagged with the
//! dataset version they were computed from. Any version change, or an
//! explicit `invalidate()`, drops every entry.

use crate::{policy::PolicyParams, types::DatasetVersion};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    TrustMetrics,
    SellersPerformance { limit: usize },
    CategoryAnalysis,
    RegionalAnalysis,
    DisputeTrends,
    /// Thresholds keyed by exact bit pattern so that equal params
    /// always hit and nearby params never alias.
    PolicySimulation { fulfillment: u64, complaint: u64, trust: u64 },
}

impl QueryKey {
    pub fn policy(params: &PolicyParams) -> Self {
        Self::PolicySimulation {
            fulfillment: params.min_fulfillment_rate().to_bits(),
            complaint:   params.max_complaint_ratio().to_bits(),
            trust:       params.min_trust_index().to_bits(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MetricsCache {
    version: Option<DatasetVersion>,
    entries: HashMap<QueryKey, Value>,
    hits:    u64,
    misses:  u64,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key` for the given dataset version. A version mismatch
    /// clears the cache before the lookup.
    pub fn get(&mut self, version: DatasetVersion, key: &QueryKey) -> Option<Value> {
        self.sync_version(version);
        match self.entries.get(key) {
            Some(v) => {
                self.hits += 1;
                log::debug!("cache hit {key:?} (version {version})");
                Some(v.clone())
            }
            None => {
                self.misses += 1;
                log::debug!("cache miss {key:?} (version {version})");
                None
            }
        }
    }

    pub fn put(&mut self, version: DatasetVersion, key: QueryKey, value: Value) {
        self.sync_version(version);
        self.entries.insert(key, value);
    }

    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("cache invalidated ({} entries dropped)", self.entries.len());
        }
        self.entries.clear();
        self.version = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    fn sync_version(&mut self, version: DatasetVersion) {
        if self.version != Some(version) {
            self.entries.clear();
            self.version = Some(version);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_change_drops_entries() {
        let mut cache = MetricsCache::new();
        cache.put(1, QueryKey::TrustMetrics, json!({"trust_index": 80.0}));
        assert!(cache.get(1, &QueryKey::TrustMetrics).is_some());
        assert!(cache.get(2, &QueryKey::TrustMetrics).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn distinct_policy_params_do_not_alias() {
        let a = PolicyParams::new(0.9, 0.1, 70.0).unwrap();
        let b = PolicyParams::new(0.9, 0.1, 70.5).unwrap();
        assert_ne!(QueryKey::policy(&a), QueryKey::policy(&b));
        assert_eq!(QueryKey::policy(&a), QueryKey::policy(&a));
    }

    #[test]
    fn invalidate_clears_everything() {
        let mut cache = MetricsCache::new();
        cache.put(3, QueryKey::CategoryAnalysis, json!([]));
        cache.put(3, QueryKey::DisputeTrends, json!([]));
        cache.invalidate();
        assert_eq!(cache.len(), 0);
        assert!(cache.get(3, &QueryKey::CategoryAnalysis).is_none());
        assert_eq!(cache.misses(), 1);
    }
}
