//! Trust-metric aggregation.
//!
//! Every function here is a read-only pass over borrowed collections.
//! Grouping uses BTreeMap so summation order, and therefore every
//! floating-point result, is identical across runs.
//!
//! Platform trust index (0–100), weights from `TrustWeights`:
//!   satisfaction       * user_satisfaction_avg
//! + dispute            * (100 - dispute_rate)
//! + refund             * (100 - refund_ratio)
//! + seller_performance * seller_performance_avg
//! + fraud              * (100 - fraud_detection_rate)

use crate::{
    config::TrustWeights,
    dataset::{Dataset, EntityTotals, RecentActivity},
    error::{DashError, DashResult},
    model::{Dispute, DisputeType, Order, Review, Seller, User},
    types::{mean, percentage, round_to},
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct TrustMetrics {
    pub trust_index:            f64,
    pub dispute_rate:           f64,
    pub refund_ratio:           f64,
    pub policy_breach_rate:     f64,
    pub repeat_purchase_uplift: f64,
    pub user_satisfaction_avg:  f64,
    pub fraud_detection_rate:   f64,
    pub seller_performance_avg: f64,
}

pub fn trust_metrics(dataset: &Dataset, weights: &TrustWeights, policy_breach_share: f64) -> TrustMetrics {
    let orders = &dataset.orders;
    if orders.is_empty() {
        return TrustMetrics::default();
    }

    let total = orders.len();
    let dispute_rate = percentage(dataset.disputes.len(), total);
    let refund_ratio = percentage(orders.iter().filter(|o| o.is_returned).count(), total);
    let fraud_detection_rate = percentage(orders.iter().filter(|o| o.fraud_flag).count(), total);
    let user_satisfaction_avg = user_satisfaction(&dataset.reviews);
    let seller_performance_avg = mean(dataset.sellers.iter().map(|s| s.trust_index));
    let repeat_purchase_uplift = repeat_purchase_uplift(orders);

    let trust_index = user_satisfaction_avg * weights.satisfaction
        + (100.0 - dispute_rate) * weights.dispute
        + (100.0 - refund_ratio) * weights.refund
        + seller_performance_avg * weights.seller_performance
        + (100.0 - fraud_detection_rate) * weights.fraud;

    TrustMetrics {
        trust_index:            round_to(trust_index, 2),
        dispute_rate:           round_to(dispute_rate, 2),
        refund_ratio:           round_to(refund_ratio, 2),
        policy_breach_rate:     round_to(dispute_rate * policy_breach_share, 2),
        repeat_purchase_uplift: round_to(repeat_purchase_uplift, 2),
        user_satisfaction_avg:  round_to(user_satisfaction_avg, 2),
        fraud_detection_rate:   round_to(fraud_detection_rate, 2),
        seller_performance_avg: round_to(seller_performance_avg, 2),
    }
}

/// Mean over reviewing users of each user's mean star rating, as a
/// percentage of the 5-star maximum.
pub fn user_satisfaction(reviews: &[Review]) -> f64 {
    let mut per_user: BTreeMap<&str, (u32, usize)> = BTreeMap::new();
    for r in reviews {
        let entry = per_user.entry(r.user_id.as_str()).or_default();
        entry.0 += u32::from(r.rating);
        entry.1 += 1;
    }
    let avg_rating = mean(per_user.values().map(|(sum, n)| f64::from(*sum) / *n as f64));
    avg_rating / 5.0 * 100.0
}

/// Percentage of ordering users who ordered more than once.
pub fn repeat_purchase_uplift(orders: &[Order]) -> f64 {
    let mut per_user: BTreeMap<&str, usize> = BTreeMap::new();
    for o in orders {
        *per_user.entry(o.user_id.as_str()).or_default() += 1;
    }
    let repeat = per_user.values().filter(|n| **n > 1).count();
    percentage(repeat, per_user.len())
}

// ── Breakdowns ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub category:             String,
    /// Mean seller complaint ratio, the per-seller dispute proxy.
    pub avg_dispute_rate:     f64,
    pub avg_fulfillment_rate: f64,
    pub avg_trust_index:      f64,
    pub total_sellers:        usize,
}

/// Sellers grouped by category, best average trust first,
/// ties broken by category name ascending.
pub fn category_analysis(sellers: &[Seller]) -> Vec<CategoryBreakdown> {
    let mut groups: BTreeMap<&str, Vec<&Seller>> = BTreeMap::new();
    for s in sellers {
        groups.entry(s.category.as_str()).or_default().push(s);
    }

    let mut out: Vec<CategoryBreakdown> = groups
        .into_iter()
        .map(|(category, members)| CategoryBreakdown {
            category:             category.to_string(),
            avg_dispute_rate:     mean(members.iter().map(|s| s.complaint_ratio)),
            avg_fulfillment_rate: mean(members.iter().map(|s| s.fulfillment_rate)),
            avg_trust_index:      mean(members.iter().map(|s| s.trust_index)),
            total_sellers:        members.len(),
        })
        .collect();

    out.sort_by(|a, b| {
        b.avg_trust_index
            .total_cmp(&a.avg_trust_index)
            .then_with(|| a.category.cmp(&b.category))
    });
    out
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionBreakdown {
    pub region:           String,
    pub avg_satisfaction: f64,
    pub total_users:      usize,
    pub avg_orders:       f64,
}

/// Users grouped by region, most satisfied first, ties by region name.
pub fn regional_analysis(users: &[User]) -> Vec<RegionBreakdown> {
    let mut groups: BTreeMap<&str, Vec<&User>> = BTreeMap::new();
    for u in users {
        groups.entry(u.region.as_str()).or_default().push(u);
    }

    let mut out: Vec<RegionBreakdown> = groups
        .into_iter()
        .map(|(region, members)| RegionBreakdown {
            region:           region.to_string(),
            avg_satisfaction: mean(members.iter().map(|u| u.satisfaction_score)),
            total_users:      members.len(),
            avg_orders:       mean(members.iter().map(|u| f64::from(u.total_orders))),
        })
        .collect();

    out.sort_by(|a, b| {
        b.avg_satisfaction
            .total_cmp(&a.avg_satisfaction)
            .then_with(|| a.region.cmp(&b.region))
    });
    out
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisputeTrend {
    pub year:         i32,
    pub month:        u32,
    pub dispute_type: DisputeType,
    pub count:        usize,
    pub total_amount: f64,
}

/// Disputes bucketed by (year, month, type); chronological, then by type name.
pub fn dispute_trends(disputes: &[Dispute]) -> Vec<DisputeTrend> {
    let mut buckets: BTreeMap<(i32, u32, &'static str), (DisputeType, usize, f64)> = BTreeMap::new();
    for d in disputes {
        let key = (d.dispute_date.year(), d.dispute_date.month(), d.dispute_type.as_str());
        let entry = buckets.entry(key).or_insert((d.dispute_type, 0, 0.0));
        entry.1 += 1;
        entry.2 += d.amount;
    }

    buckets
        .into_iter()
        .map(|((year, month, _), (dispute_type, count, total))| DisputeTrend {
            year,
            month,
            dispute_type,
            count,
            total_amount: round_to(total, 2),
        })
        .collect()
}

// ── Dashboard summary ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub trust_metrics:   TrustMetrics,
    pub totals:          EntityTotals,
    pub recent_activity: RecentActivity,
}

/// Top `limit` sellers by trust index, ties broken by id.
/// `limit` must be in 1..=max_limit.
pub fn top_sellers(sellers: &[Seller], limit: usize, max_limit: usize) -> DashResult<Vec<Seller>> {
    if limit == 0 || limit > max_limit {
        return Err(DashError::Validation {
            field:    "limit",
            value:    limit.to_string(),
            expected: "a value between 1 and the configured maximum",
        });
    }
    let mut ranked: Vec<&Seller> = sellers.iter().collect();
    ranked.sort_by(|a, b| b.trust_index.total_cmp(&a.trust_index).then_with(|| a.id.cmp(&b.id)));
    Ok(ranked.into_iter().take(limit).cloned().collect())
}
