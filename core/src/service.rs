//! The dashboard service: the one entry point the outer surface calls.
//!
//! Each query reads the current dataset from the store, runs the pure
//! aggregator or simulator over it, and memoises the JSON result in a
//! `MetricsCache` keyed by the query and the dataset version.
//!
//! A service owns one SQLite connection. Concurrent callers each build
//! their own service over `DashStore::reopen()`; nothing but the
//! database file is shared between them.

use crate::{
    cache::{MetricsCache, QueryKey},
    config::DashConfig,
    dataset::{Dataset, EntityTotals},
    error::{DashError, DashResult},
    generator::{DataGenerationRequest, DatasetGenerator},
    metrics::{self, CategoryBreakdown, DashboardStats, DisputeTrend, RegionBreakdown, TrustMetrics},
    model::Seller,
    policy::{self, PolicyParams, SimulationResult},
    request::DashRequest,
    sentiment::{LexiconScorer, SentimentScorer},
    store::DashStore,
    types::DatasetVersion,
};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_SELLERS_LIMIT: usize = 50;

/// Dataset swaps tolerated during one `dashboard_stats` read before the
/// caller is told to retry.
const STATS_READ_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSummary {
    pub message: String,
    pub version: DatasetVersion,
    pub stats:   EntityTotals,
}

pub struct DashboardService {
    pub store: DashStore,
    config:    DashConfig,
    scorer:    Box<dyn SentimentScorer>,
    cache:     Mutex<MetricsCache>,
}

impl DashboardService {
    pub fn new(store: DashStore, config: DashConfig) -> Self {
        let scorer = Box::new(LexiconScorer::new(&config.sentiment));
        Self::with_scorer(store, config, scorer)
    }

    pub fn with_scorer(store: DashStore, config: DashConfig, scorer: Box<dyn SentimentScorer>) -> Self {
        Self {
            store,
            config,
            scorer,
            cache: Mutex::new(MetricsCache::new()),
        }
    }

    /// Fresh in-memory store with default config (used in tests).
    pub fn build_test() -> DashResult<Self> {
        let store = DashStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(store, DashConfig::default()))
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    // ── Dataset lifecycle ──────────────────────────────────────

    /// Generate a synthetic dataset and swap it in. Timestamps are laid out
    /// backwards from `anchor`, truncated to whole seconds.
    pub fn generate_data(
        &self,
        request: &DataGenerationRequest,
        anchor: DateTime<Utc>,
    ) -> DashResult<GenerationSummary> {
        let anchor = anchor.trunc_subsecs(0);
        let generator = DatasetGenerator::new(&self.config.generation, self.scorer.as_ref());
        let dataset = generator.generate(request, anchor)?;
        let version = self.store.replace_dataset(&dataset, Some(request.seed), anchor)?;
        self.invalidate_cache()?;
        Ok(GenerationSummary {
            message: "Sample data generated successfully".into(),
            version,
            stats: dataset.totals(),
        })
    }

    /// Swap in an externally supplied dataset. Review sentiment is scored
    /// here, once, and stored with the review.
    ///
    /// Timestamps are stored at whole-second resolution; finer ones are
    /// truncated here, and the count is logged.
    pub fn ingest_dataset(&self, mut dataset: Dataset, ingested_at: DateTime<Utc>) -> DashResult<DatasetVersion> {
        let truncated = dataset.truncate_subsecs();
        if truncated > 0 {
            log::info!("Truncated {truncated} sub-second timestamps on ingestion");
        }
        for review in &mut dataset.reviews {
            let s = self.scorer.score(&review.review_text);
            review.sentiment_score = s.score;
            review.sentiment_label = s.label;
        }
        let version = self.store.replace_dataset(&dataset, None, ingested_at.trunc_subsecs(0))?;
        self.invalidate_cache()?;
        Ok(version)
    }

    pub fn invalidate_cache(&self) -> DashResult<()> {
        self.lock_cache()?.invalidate();
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn trust_metrics(&self) -> DashResult<TrustMetrics> {
        Ok(self.versioned_trust_metrics()?.1)
    }

    /// Trust metrics plus totals and recent activity relative to `now`.
    /// Only the trust metrics are cached; the counts depend on `now` and
    /// are read fresh from the same dataset version.
    pub fn dashboard_stats(&self, now: DateTime<Utc>) -> DashResult<DashboardStats> {
        let days = self.config.recent_activity_days;
        let since = Duration::try_days(days)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| DashError::validation("recent_activity_days", days, "a window that fits before `now`"))?;

        for _ in 0..STATS_READ_ATTEMPTS {
            let (version, totals, recent_activity) = self.store.activity_summary(since)?;
            let (computed_at, trust_metrics) = self.versioned_trust_metrics()?;
            if computed_at == version {
                return Ok(DashboardStats { trust_metrics, totals, recent_activity });
            }
            log::debug!("Dataset moved from version {version} to {computed_at} mid-read, retrying");
        }
        Err(DashError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("dataset kept changing while reading dashboard stats".into()),
        )))
    }

    pub fn sellers_performance(&self, limit: usize) -> DashResult<Vec<Seller>> {
        let max = self.config.sellers_performance_max_limit;
        if limit == 0 || limit > max {
            log::warn!("Rejected sellers_performance limit {limit} (max {max})");
            return Err(DashError::validation("limit", limit, "a value between 1 and the configured maximum"));
        }
        self.cached(QueryKey::SellersPerformance { limit }, |data| {
            metrics::top_sellers(&data.sellers, limit, max)
        })
    }

    pub fn category_analysis(&self) -> DashResult<Vec<CategoryBreakdown>> {
        self.cached(QueryKey::CategoryAnalysis, |data| Ok(metrics::category_analysis(&data.sellers)))
    }

    pub fn regional_analysis(&self) -> DashResult<Vec<RegionBreakdown>> {
        self.cached(QueryKey::RegionalAnalysis, |data| Ok(metrics::regional_analysis(&data.users)))
    }

    pub fn dispute_trends(&self) -> DashResult<Vec<DisputeTrend>> {
        self.cached(QueryKey::DisputeTrends, |data| Ok(metrics::dispute_trends(&data.disputes)))
    }

    pub fn policy_simulation(&self, params: &PolicyParams) -> DashResult<SimulationResult> {
        self.cached(QueryKey::policy(params), |data| {
            Ok(policy::simulate(&data.sellers, params, &self.config.policy))
        })
    }

    // ── Request dispatch ───────────────────────────────────────

    /// Serve one request and return its JSON response body.
    pub fn handle(&self, request: DashRequest, now: DateTime<Utc>) -> DashResult<Value> {
        log::debug!("Handling {}", request.name());
        let body = match request {
            DashRequest::GenerateData(req) => serde_json::to_value(self.generate_data(&req, now)?)?,
            DashRequest::TrustMetrics => serde_json::to_value(self.trust_metrics()?)?,
            DashRequest::DashboardStats => serde_json::to_value(self.dashboard_stats(now)?)?,
            DashRequest::SellersPerformance { limit } => {
                let sellers = self.sellers_performance(limit.unwrap_or(DEFAULT_SELLERS_LIMIT))?;
                json!({ "sellers": sellers })
            }
            DashRequest::CategoryAnalysis => json!({ "categories": self.category_analysis()? }),
            DashRequest::RegionalAnalysis => json!({ "regions": self.regional_analysis()? }),
            DashRequest::DisputeTrends => json!({ "trends": self.dispute_trends()? }),
            DashRequest::PolicySimulation {
                min_fulfillment_rate,
                max_complaint_ratio,
                min_trust_index,
            } => {
                let defaults = &self.config.policy.defaults;
                let params = PolicyParams::new(
                    min_fulfillment_rate.unwrap_or(defaults.min_fulfillment_rate()),
                    max_complaint_ratio.unwrap_or(defaults.max_complaint_ratio()),
                    min_trust_index.unwrap_or(defaults.min_trust_index()),
                )
                .inspect_err(|e| log::warn!("Rejected policy simulation: {e}"))?;
                serde_json::to_value(self.policy_simulation(&params)?)?
            }
        };
        Ok(body)
    }

    // ── Internals ──────────────────────────────────────────────

    fn versioned_trust_metrics(&self) -> DashResult<(DatasetVersion, TrustMetrics)> {
        self.cached_at(QueryKey::TrustMetrics, |data| {
            Ok(metrics::trust_metrics(
                data,
                &self.config.trust_weights,
                self.config.policy.policy_breach_share,
            ))
        })
    }

    fn cached<T, F>(&self, key: QueryKey, compute: F) -> DashResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&Dataset) -> DashResult<T>,
    {
        Ok(self.cached_at(key, compute)?.1)
    }

    /// Like `cached`, also returning the dataset version the value belongs to.
    fn cached_at<T, F>(&self, key: QueryKey, compute: F) -> DashResult<(DatasetVersion, T)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&Dataset) -> DashResult<T>,
    {
        let version = self.store.dataset_version()?;
        if let Some(hit) = self.lock_cache()?.get(version, &key) {
            return Ok((version, serde_json::from_value(hit)?));
        }

        // Version and data come from the same read so the entry is tagged
        // with the dataset it was actually computed from.
        let (version, data) = self.store.snapshot()?;
        let result = compute(&data)?;
        self.lock_cache()?.put(version, key, serde_json::to_value(&result)?);
        Ok((version, result))
    }

    fn lock_cache(&self) -> DashResult<MutexGuard<'_, MetricsCache>> {
        self.cache
            .lock()
            .map_err(|_| DashError::Other(anyhow::anyhow!("metrics cache lock poisoned")))
    }
}
