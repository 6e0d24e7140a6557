use crate::generator::DataGenerationRequest;
use serde::{Deserialize, Serialize};

/// Every query the dashboard surface can issue.
/// Variants are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DashRequest {
    // ── Dataset ───────────────────────────────────
    GenerateData(DataGenerationRequest),

    // ── Aggregates ────────────────────────────────
    TrustMetrics,
    DashboardStats,
    SellersPerformance {
        #[serde(default)]
        limit: Option<usize>,
    },
    CategoryAnalysis,
    RegionalAnalysis,
    DisputeTrends,

    // ── Simulation ────────────────────────────────
    /// Missing thresholds fall back to the configured policy defaults.
    PolicySimulation {
        #[serde(default)]
        min_fulfillment_rate: Option<f64>,
        #[serde(default)]
        max_complaint_ratio:  Option<f64>,
        #[serde(default)]
        min_trust_index:      Option<f64>,
    },
}

impl DashRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateData(_)            => "generate_data",
            Self::TrustMetrics               => "trust_metrics",
            Self::DashboardStats             => "dashboard_stats",
            Self::SellersPerformance { .. }  => "sellers_performance",
            Self::CategoryAnalysis           => "category_analysis",
            Self::RegionalAnalysis           => "regional_analysis",
            Self::DisputeTrends              => "dispute_trends",
            Self::PolicySimulation { .. }    => "policy_simulation",
        }
    }
}
