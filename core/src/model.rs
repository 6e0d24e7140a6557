//! Base records of the marketplace dataset.
//!
//! Every derived metric is recomputed from these five collections.
//! Nothing here carries derived or cached state except the fields that
//! are fixed at generation time (seller `trust_index`, review sentiment).

use crate::{
    error::{DashError, DashResult},
    types::EntityId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ── Enumerations ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Completed,
    Pending,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        Self::Completed,
        Self::Pending,
        Self::Cancelled,
        Self::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending   => "pending",
            Self::Cancelled => "cancelled",
            Self::Returned  => "returned",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DashError;

    fn from_str(s: &str) -> DashResult<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| DashError::UnknownEnum { kind: "order status", value: s.into() })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral  => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl FromStr for SentimentLabel {
    type Err = DashError;

    fn from_str(s: &str) -> DashResult<Self> {
        match s {
            "positive" => Ok(Self::Positive),
            "neutral"  => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(DashError::UnknownEnum { kind: "sentiment label", value: s.into() }),
        }
    }
}

/// Dispute categories. Ordering of the variants is irrelevant; trend output
/// is ordered by the display name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisputeType {
    #[serde(rename = "Product Quality")]
    ProductQuality,
    #[serde(rename = "Delivery Issues")]
    DeliveryIssues,
    #[serde(rename = "Billing Dispute")]
    BillingDispute,
    #[serde(rename = "Seller Fraud")]
    SellerFraud,
    #[serde(rename = "Refund Request")]
    RefundRequest,
}

impl DisputeType {
    pub const ALL: [DisputeType; 5] = [
        Self::ProductQuality,
        Self::DeliveryIssues,
        Self::BillingDispute,
        Self::SellerFraud,
        Self::RefundRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductQuality => "Product Quality",
            Self::DeliveryIssues => "Delivery Issues",
            Self::BillingDispute => "Billing Dispute",
            Self::SellerFraud    => "Seller Fraud",
            Self::RefundRequest  => "Refund Request",
        }
    }
}

impl FromStr for DisputeType {
    type Err = DashError;

    fn from_str(s: &str) -> DashResult<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| DashError::UnknownEnum { kind: "dispute type", value: s.into() })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
    Resolved,
    Escalated,
    Closed,
}

impl DisputeStatus {
    pub const ALL: [DisputeStatus; 4] = [
        Self::Open,
        Self::Resolved,
        Self::Escalated,
        Self::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open      => "open",
            Self::Resolved  => "resolved",
            Self::Escalated => "escalated",
            Self::Closed    => "closed",
        }
    }
}

impl FromStr for DisputeStatus {
    type Err = DashError;

    fn from_str(s: &str) -> DashResult<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| DashError::UnknownEnum { kind: "dispute status", value: s.into() })
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id:                 EntityId,
    pub name:               String,
    pub email:              String,
    pub region:             String,
    pub join_date:          DateTime<Utc>,
    pub total_orders:       u32,
    /// Self-reported satisfaction on a 1–5 scale.
    pub satisfaction_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seller {
    pub id:               EntityId,
    pub name:             String,
    pub business_type:    String,
    pub region:           String,
    pub category:         String,
    pub join_date:        DateTime<Utc>,
    /// Composite score in [0, 100], fixed at generation time.
    pub trust_index:      f64,
    pub fulfillment_rate: f64,
    pub return_rate:      f64,
    pub complaint_ratio:  f64,
    /// Historical order volume; drives `orders_at_risk` in policy simulation.
    pub total_orders:     u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id:               EntityId,
    pub user_id:          EntityId,
    pub seller_id:        EntityId,
    pub amount:           f64,
    pub status:           OrderStatus,
    pub category:         String,
    pub region:           String,
    pub order_date:       DateTime<Utc>,
    pub fulfillment_date: Option<DateTime<Utc>>,
    pub is_disputed:      bool,
    pub is_returned:      bool,
    pub fraud_flag:       bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id:              EntityId,
    pub order_id:        EntityId,
    pub user_id:         EntityId,
    pub seller_id:       EntityId,
    pub rating:          u8,
    pub review_text:     String,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub review_date:     DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dispute {
    pub id:              EntityId,
    pub order_id:        EntityId,
    pub user_id:         EntityId,
    pub seller_id:       EntityId,
    pub dispute_type:    DisputeType,
    pub amount:          f64,
    pub status:          DisputeStatus,
    pub resolution:      Option<String>,
    pub dispute_date:    DateTime<Utc>,
    pub resolution_date: Option<DateTime<Utc>>,
}

// ── Ingestion validation ─────────────────────────────────────────────────────

fn check_range(
    entity: &'static str,
    id: &str,
    field: &str,
    value: f64,
    lo: f64,
    hi: f64,
) -> DashResult<()> {
    // NaN fails both comparisons and is rejected here too.
    if value >= lo && value <= hi {
        Ok(())
    } else {
        Err(DashError::InvalidRecord {
            entity,
            id: id.to_string(),
            reason: format!("{field} = {value} outside [{lo}, {hi}]"),
        })
    }
}

/// Timestamps are stored as whole epoch seconds; anything finer would be
/// lost on write, so it is refused here instead.
fn check_whole_seconds(
    entity: &'static str,
    id: &str,
    field: &str,
    value: Option<&DateTime<Utc>>,
) -> DashResult<()> {
    match value {
        Some(t) if t.timestamp_subsec_nanos() != 0 => Err(DashError::InvalidRecord {
            entity,
            id: id.to_string(),
            reason: format!("{field} = {t} has sub-second precision"),
        }),
        _ => Ok(()),
    }
}

impl User {
    pub fn validate(&self) -> DashResult<()> {
        check_whole_seconds("user", &self.id, "join_date", Some(&self.join_date))?;
        check_range("user", &self.id, "satisfaction_score", self.satisfaction_score, 1.0, 5.0)
    }
}

impl Seller {
    pub fn validate(&self) -> DashResult<()> {
        check_whole_seconds("seller", &self.id, "join_date", Some(&self.join_date))?;
        check_range("seller", &self.id, "fulfillment_rate", self.fulfillment_rate, 0.0, 1.0)?;
        check_range("seller", &self.id, "return_rate", self.return_rate, 0.0, 1.0)?;
        check_range("seller", &self.id, "complaint_ratio", self.complaint_ratio, 0.0, 1.0)?;
        check_range("seller", &self.id, "trust_index", self.trust_index, 0.0, 100.0)
    }
}

impl Order {
    pub fn validate(&self) -> DashResult<()> {
        check_whole_seconds("order", &self.id, "order_date", Some(&self.order_date))?;
        check_whole_seconds("order", &self.id, "fulfillment_date", self.fulfillment_date.as_ref())?;
        check_range("order", &self.id, "amount", self.amount, 0.0, f64::MAX)
    }
}

impl Review {
    pub fn validate(&self) -> DashResult<()> {
        check_whole_seconds("review", &self.id, "review_date", Some(&self.review_date))?;
        check_range("review", &self.id, "rating", f64::from(self.rating), 1.0, 5.0)?;
        check_range("review", &self.id, "sentiment_score", self.sentiment_score, -1.0, 1.0)
    }
}

impl Dispute {
    pub fn validate(&self) -> DashResult<()> {
        check_whole_seconds("dispute", &self.id, "dispute_date", Some(&self.dispute_date))?;
        check_whole_seconds("dispute", &self.id, "resolution_date", self.resolution_date.as_ref())?;
        check_range("dispute", &self.id, "amount", self.amount, 0.0, f64::MAX)
    }
}
