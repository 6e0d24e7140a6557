//! Trust metric aggregation tests.
//!
//! Tests cover: the composite formula against hand-computed values,
//! dispute-rate arithmetic, per-user satisfaction, and empty input.

use chrono::{DateTime, TimeZone, Utc};
use trustdash_core::{
    config::DashConfig,
    dataset::Dataset,
    metrics::{repeat_purchase_uplift, trust_metrics, user_satisfaction, TrustMetrics},
    model::{
        Dispute, DisputeStatus, DisputeType, Order, OrderStatus, Review, SentimentLabel, Seller,
    },
};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

fn order(id: &str, user: &str, returned: bool, fraud: bool) -> Order {
    Order {
        id: id.into(),
        user_id: user.into(),
        seller_id: "s1".into(),
        amount: 100.0,
        status: OrderStatus::Completed,
        category: "Books".into(),
        region: "Europe".into(),
        order_date: at(1),
        fulfillment_date: Some(at(3)),
        is_disputed: false,
        is_returned: returned,
        fraud_flag: fraud,
    }
}

fn review(id: &str, user: &str, rating: u8) -> Review {
    Review {
        id: id.into(),
        order_id: "o1".into(),
        user_id: user.into(),
        seller_id: "s1".into(),
        rating,
        review_text: "fine".into(),
        sentiment_score: 0.2,
        sentiment_label: SentimentLabel::Positive,
        review_date: at(5),
    }
}

fn dispute(id: &str) -> Dispute {
    Dispute {
        id: id.into(),
        order_id: "o1".into(),
        user_id: "u1".into(),
        seller_id: "s1".into(),
        dispute_type: DisputeType::DeliveryIssues,
        amount: 100.0,
        status: DisputeStatus::Open,
        resolution: None,
        dispute_date: at(6),
        resolution_date: None,
    }
}

fn seller(id: &str, trust: f64) -> Seller {
    Seller {
        id: id.into(),
        name: id.into(),
        business_type: "Enterprise".into(),
        region: "Asia".into(),
        category: "Books".into(),
        join_date: at(1),
        trust_index: trust,
        fulfillment_rate: 0.9,
        return_rate: 0.1,
        complaint_ratio: 0.05,
        total_orders: 10,
    }
}

fn compute(dataset: &Dataset) -> TrustMetrics {
    let config = DashConfig::default();
    trust_metrics(dataset, &config.trust_weights, config.policy.policy_breach_share)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn dispute_rate_is_disputes_over_orders() {
    let dataset = Dataset {
        orders: (0..2000).map(|i| order(&format!("o{i}"), &format!("u{i}"), false, false)).collect(),
        disputes: (0..88).map(|i| dispute(&format!("d{i}"))).collect(),
        ..Dataset::default()
    };
    let m = compute(&dataset);
    assert!(approx(m.dispute_rate, 4.4), "dispute_rate = {}", m.dispute_rate);
    assert!(approx(m.policy_breach_rate, 3.08), "policy_breach_rate = {}", m.policy_breach_rate);
}

#[test]
fn composite_matches_hand_computation() {
    let dataset = Dataset {
        users: Vec::new(),
        sellers: vec![seller("s1", 80.0), seller("s2", 60.0)],
        orders: vec![
            order("o1", "u1", false, false),
            order("o2", "u1", true, false),
            order("o3", "u2", false, false),
            order("o4", "u3", false, false),
        ],
        // u1 averages 4 stars, u2 gives 2 stars: mean of user means = 3 → 60%
        reviews: vec![review("r1", "u1", 5), review("r2", "u1", 3), review("r3", "u2", 2)],
        disputes: vec![dispute("d1")],
    };
    let m = compute(&dataset);

    assert!(approx(m.dispute_rate, 25.0));
    assert!(approx(m.refund_ratio, 25.0));
    assert!(approx(m.fraud_detection_rate, 0.0));
    assert!(approx(m.user_satisfaction_avg, 60.0));
    assert!(approx(m.seller_performance_avg, 70.0));
    assert!(approx(m.repeat_purchase_uplift, 33.33));
    // 60*.30 + 75*.25 + 75*.20 + 70*.15 + 100*.10
    assert!(approx(m.trust_index, 72.25), "trust_index = {}", m.trust_index);
}

#[test]
fn satisfaction_weights_users_not_reviews() {
    // One prolific 5-star reviewer must not drown out a single 1-star reviewer.
    let mut reviews: Vec<Review> = (0..9).map(|i| review(&format!("r{i}"), "fan", 5)).collect();
    reviews.push(review("r-last", "critic", 1));
    assert!(approx(user_satisfaction(&reviews), 60.0));
}

#[test]
fn repeat_uplift_counts_users_with_more_than_one_order() {
    let orders = vec![
        order("o1", "a", false, false),
        order("o2", "a", false, false),
        order("o3", "b", false, false),
        order("o4", "c", false, false),
        order("o5", "c", false, false),
    ];
    let uplift = repeat_purchase_uplift(&orders);
    assert!((uplift - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn no_orders_yields_zeroed_metrics() {
    let dataset = Dataset {
        sellers: vec![seller("s1", 90.0)],
        reviews: vec![review("r1", "u1", 5)],
        ..Dataset::default()
    };
    assert_eq!(compute(&dataset), TrustMetrics::default());
    assert_eq!(compute(&Dataset::default()), TrustMetrics::default());
}

#[test]
fn trust_index_stays_within_bounds() {
    let best = Dataset {
        sellers: vec![seller("s1", 100.0)],
        orders: vec![order("o1", "u1", false, false)],
        reviews: vec![review("r1", "u1", 5)],
        ..Dataset::default()
    };
    assert!(approx(compute(&best).trust_index, 100.0));

    let worst = Dataset {
        sellers: vec![seller("s1", 0.0)],
        orders: vec![order("o1", "u1", true, true)],
        reviews: vec![review("r1", "u1", 1)],
        disputes: vec![dispute("d1")],
        ..Dataset::default()
    };
    let m = compute(&worst);
    // Only the 1-star floor (20% satisfaction) contributes.
    assert!(approx(m.trust_index, 6.0), "trust_index = {}", m.trust_index);
}
