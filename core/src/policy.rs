//! Policy impact simulation.
//!
//! Given the seller population and a set of onboarding thresholds, split
//! sellers into compliant and non-compliant, measure the exposure, and
//! derive a recommendation. Pure: same sellers + same params + same config
//! gives the same result, and no seller is mutated.
//!
//! Compliance is conjunctive and inclusive on every bound:
//!   fulfillment_rate >= min_fulfillment_rate
//!   complaint_ratio  <= max_complaint_ratio
//!   trust_index      >= min_trust_index
//!
//! Recommendation:
//!   action = stricter_onboarding if compliance_rate < stricter_onboarding_below
//!            maintain_policy     otherwise
//!   estimated_trust_improvement =
//!       min(max_trust_improvement,
//!           max(0, target_compliance_rate - compliance_rate) * improvement_per_point)
//!   (0 when there are no sellers)

use crate::{
    config::PolicyConfig,
    error::{DashError, DashResult},
    model::Seller,
    types::{percentage, round_to},
};
use serde::{Deserialize, Serialize};

/// Validated onboarding thresholds. Construction (including deserialization)
/// rejects out-of-range or NaN values rather than clamping them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawPolicyParams")]
pub struct PolicyParams {
    min_fulfillment_rate: f64,
    max_complaint_ratio:  f64,
    min_trust_index:      f64,
}

#[derive(Deserialize)]
struct RawPolicyParams {
    min_fulfillment_rate: f64,
    max_complaint_ratio:  f64,
    min_trust_index:      f64,
}

impl TryFrom<RawPolicyParams> for PolicyParams {
    type Error = DashError;

    fn try_from(raw: RawPolicyParams) -> DashResult<Self> {
        PolicyParams::new(raw.min_fulfillment_rate, raw.max_complaint_ratio, raw.min_trust_index)
    }
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            min_fulfillment_rate: 0.9,
            max_complaint_ratio:  0.1,
            min_trust_index:      70.0,
        }
    }
}

impl PolicyParams {
    /// `min_fulfillment_rate` and `max_complaint_ratio` in [0, 1],
    /// `min_trust_index` in [0, 100].
    pub fn new(
        min_fulfillment_rate: f64,
        max_complaint_ratio: f64,
        min_trust_index: f64,
    ) -> DashResult<Self> {
        if !(0.0..=1.0).contains(&min_fulfillment_rate) {
            return Err(DashError::validation("min_fulfillment_rate", min_fulfillment_rate, "a value in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&max_complaint_ratio) {
            return Err(DashError::validation("max_complaint_ratio", max_complaint_ratio, "a value in [0, 1]"));
        }
        if !(0.0..=100.0).contains(&min_trust_index) {
            return Err(DashError::validation("min_trust_index", min_trust_index, "a value in [0, 100]"));
        }
        Ok(Self { min_fulfillment_rate, max_complaint_ratio, min_trust_index })
    }

    pub fn min_fulfillment_rate(&self) -> f64 { self.min_fulfillment_rate }
    pub fn max_complaint_ratio(&self)  -> f64 { self.max_complaint_ratio }
    pub fn min_trust_index(&self)      -> f64 { self.min_trust_index }

    pub fn is_compliant(&self, seller: &Seller) -> bool {
        seller.fulfillment_rate >= self.min_fulfillment_rate
            && seller.complaint_ratio <= self.max_complaint_ratio
            && seller.trust_index >= self.min_trust_index
    }
}

/// Every input seller lands in exactly one of the two lists, in input order.
#[derive(Debug, Clone, Default)]
pub struct PolicyPartition<'a> {
    pub compliant:     Vec<&'a Seller>,
    pub non_compliant: Vec<&'a Seller>,
}

pub fn partition<'a>(sellers: &'a [Seller], params: &PolicyParams) -> PolicyPartition<'a> {
    let (compliant, non_compliant): (Vec<&Seller>, Vec<&Seller>) =
        sellers.iter().partition(|s| params.is_compliant(s));
    PolicyPartition { compliant, non_compliant }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAction {
    StricterOnboarding,
    MaintainPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImpactAnalysis {
    pub total_sellers:           usize,
    pub compliant_sellers:       usize,
    pub non_compliant_sellers:   usize,
    /// Percent, one decimal.
    pub compliance_rate:         f64,
    pub orders_at_risk:          u64,
    /// Share of all historical seller orders held by non-compliant sellers.
    pub order_impact_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub action: PolicyAction,
    pub estimated_trust_improvement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub policy_parameters: PolicyParams,
    pub impact_analysis:   ImpactAnalysis,
    pub recommendations:   Recommendation,
}

pub fn simulate(sellers: &[Seller], params: &PolicyParams, config: &PolicyConfig) -> SimulationResult {
    let split = partition(sellers, params);
    let total = sellers.len();
    let compliant = split.compliant.len();
    let non_compliant = split.non_compliant.len();

    let orders_at_risk: u64 = split.non_compliant.iter().map(|s| u64::from(s.total_orders)).sum();
    let total_orders: u64 = sellers.iter().map(|s| u64::from(s.total_orders)).sum();
    let order_impact_percentage = if total_orders == 0 {
        0.0
    } else {
        round_to(orders_at_risk as f64 / total_orders as f64 * 100.0, 2)
    };

    let compliance_rate = round_to(percentage(compliant, total), 1);

    SimulationResult {
        policy_parameters: *params,
        impact_analysis: ImpactAnalysis {
            total_sellers: total,
            compliant_sellers: compliant,
            non_compliant_sellers: non_compliant,
            compliance_rate,
            orders_at_risk,
            order_impact_percentage,
        },
        recommendations: recommend(compliance_rate, total, config),
    }
}

fn recommend(compliance_rate: f64, total_sellers: usize, config: &PolicyConfig) -> Recommendation {
    let action = if compliance_rate < config.stricter_onboarding_below {
        PolicyAction::StricterOnboarding
    } else {
        PolicyAction::MaintainPolicy
    };

    let estimated_trust_improvement = if total_sellers == 0 {
        0.0
    } else {
        let gap = (config.target_compliance_rate - compliance_rate).max(0.0);
        round_to((gap * config.improvement_per_point).min(config.max_trust_improvement), 2)
    };

    Recommendation { action, estimated_trust_improvement }
}
