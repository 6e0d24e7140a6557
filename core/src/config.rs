//! Runtime configuration, loaded from `<data_dir>/dashboard.json`.
//!
//! Every weight and threshold the aggregator and simulator use lives here
//! so that it is fixed per run and testable. `DashConfig::default()` holds
//! the same values as the shipped JSON file.

use crate::{generator::DataGenerationRequest, policy::PolicyParams};
use serde::{Deserialize, Serialize};

/// Upper bound on the dashboard's recent-activity window (about a century).
pub const MAX_RECENT_ACTIVITY_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashConfig {
    pub trust_weights: TrustWeights,
    pub policy: PolicyConfig,
    pub sentiment: SentimentConfig,
    pub generation: GenerationConfig,
    pub recent_activity_days: i64,
    pub sellers_performance_max_limit: usize,
}

/// Weights of the platform trust composite. Each component is on a 0–100
/// scale, so with weights summing to 1.0 the composite stays in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrustWeights {
    pub satisfaction:       f64,
    pub dispute:            f64,
    pub refund:             f64,
    pub seller_performance: f64,
    pub fraud:              f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    pub defaults: PolicyParams,
    /// Compliance rate (percent) below which onboarding should be tightened.
    pub stricter_onboarding_below: f64,
    pub target_compliance_rate: f64,
    /// Trust points gained per percentage point of compliance gap.
    pub improvement_per_point: f64,
    pub max_trust_improvement: f64,
    /// Share of disputes assumed to be policy breaches.
    pub policy_breach_share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentConfig {
    pub positive_threshold: f64,
    pub negative_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    pub defaults: DataGenerationRequest,
    pub seller_trust: SellerTrustWeights,
    pub regions: Vec<String>,
    pub categories: Vec<String>,
    pub business_types: Vec<String>,
}

/// Points contributed by each seller performance rate; sums to 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellerTrustWeights {
    pub fulfillment: f64,
    pub non_return:  f64,
    pub non_complaint: f64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            trust_weights: TrustWeights {
                satisfaction:       0.30,
                dispute:            0.25,
                refund:             0.20,
                seller_performance: 0.15,
                fraud:              0.10,
            },
            policy: PolicyConfig {
                defaults: PolicyParams::default(),
                stricter_onboarding_below: 50.0,
                target_compliance_rate: 100.0,
                improvement_per_point: 0.3,
                max_trust_improvement: 15.0,
                policy_breach_share: 0.7,
            },
            sentiment: SentimentConfig {
                positive_threshold: 0.05,
                negative_threshold: -0.05,
            },
            generation: GenerationConfig {
                defaults: DataGenerationRequest::default(),
                seller_trust: SellerTrustWeights {
                    fulfillment:   40.0,
                    non_return:    30.0,
                    non_complaint: 30.0,
                },
                regions: strings(&[
                    "North America", "Europe", "Asia", "South America", "Africa", "Oceania",
                ]),
                categories: strings(&[
                    "Electronics", "Fashion", "Home & Garden", "Books",
                    "Sports", "Automotive", "Health", "Toys",
                ]),
                business_types: strings(&["Individual", "Small Business", "Enterprise", "Startup"]),
            },
            recent_activity_days: 30,
            sellers_performance_max_limit: 200,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl DashConfig {
    /// Load from the data/ directory.
    /// In tests, use DashConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/dashboard.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded dashboard config from {path}");
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let w = &self.trust_weights;
        let weights = [w.satisfaction, w.dispute, w.refund, w.seller_performance, w.fraud];
        if weights.iter().any(|x| x.is_nan() || *x < 0.0) {
            anyhow::bail!("trust_weights must be non-negative: {weights:?}");
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            anyhow::bail!("trust_weights must sum to 1.0, got {sum}");
        }

        let s = &self.sentiment;
        if !(-1.0..=1.0).contains(&s.negative_threshold)
            || !(-1.0..=1.0).contains(&s.positive_threshold)
            || s.negative_threshold >= s.positive_threshold
        {
            anyhow::bail!(
                "sentiment thresholds must satisfy -1 <= negative < positive <= 1, got {} / {}",
                s.negative_threshold,
                s.positive_threshold
            );
        }

        let p = &self.policy;
        if !(0.0..=100.0).contains(&p.target_compliance_rate)
            || !(0.0..=100.0).contains(&p.stricter_onboarding_below)
        {
            anyhow::bail!("policy compliance thresholds must be percentages");
        }
        let improvement = [p.improvement_per_point, p.max_trust_improvement];
        if improvement.iter().any(|x| x.is_nan() || *x < 0.0) {
            anyhow::bail!("policy improvement settings must be non-negative");
        }
        if !(0.0..=1.0).contains(&p.policy_breach_share) {
            anyhow::bail!("policy_breach_share must be in [0, 1]");
        }

        let g = &self.generation;
        if g.regions.is_empty() || g.categories.is_empty() || g.business_types.is_empty() {
            anyhow::bail!("generation lists (regions, categories, business_types) must not be empty");
        }
        let st = &g.seller_trust;
        let trust_parts = [st.fulfillment, st.non_return, st.non_complaint];
        if trust_parts.iter().any(|x| x.is_nan() || *x < 0.0) {
            anyhow::bail!("generation.seller_trust weights must be non-negative: {trust_parts:?}");
        }
        if (trust_parts.iter().sum::<f64>() - 100.0).abs() > 1e-9 {
            anyhow::bail!("generation.seller_trust weights must sum to 100");
        }

        if !(1..=MAX_RECENT_ACTIVITY_DAYS).contains(&self.recent_activity_days) {
            anyhow::bail!(
                "recent_activity_days must be in 1..={MAX_RECENT_ACTIVITY_DAYS}, got {}",
                self.recent_activity_days
            );
        }
        if self.sellers_performance_max_limit == 0 {
            anyhow::bail!("sellers_performance_max_limit must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        DashConfig::default().validate().unwrap();
    }

    #[test]
    fn recent_activity_window_is_bounded() {
        let mut config = DashConfig::default();
        config.recent_activity_days = MAX_RECENT_ACTIVITY_DAYS;
        assert!(config.validate().is_ok());
        for days in [0, -1, MAX_RECENT_ACTIVITY_DAYS + 1, i64::MAX] {
            config.recent_activity_days = days;
            assert!(config.validate().is_err(), "accepted {days}");
        }
    }

    #[test]
    fn nan_seller_trust_weight_is_rejected() {
        let mut config = DashConfig::default();
        config.generation.seller_trust.non_return = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_seller_trust_weight_is_rejected_even_if_sum_matches() {
        let mut config = DashConfig::default();
        config.generation.seller_trust.fulfillment = 110.0;
        config.generation.seller_trust.non_return = -10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_improvement_settings_are_rejected() {
        let mut config = DashConfig::default();
        config.policy.improvement_per_point = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = DashConfig::default();
        config.policy.max_trust_improvement = f64::NAN;
        assert!(config.validate().is_err());
    }
}
