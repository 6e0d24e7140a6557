//! Grouped breakdown tests: category, region, dispute trend, seller ranking.

use chrono::{DateTime, TimeZone, Utc};
use trustdash_core::{
    error::DashError,
    metrics::{category_analysis, dispute_trends, regional_analysis, top_sellers},
    model::{Dispute, DisputeStatus, DisputeType, Seller, User},
};

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0).unwrap()
}

fn seller(id: &str, category: &str, trust: f64) -> Seller {
    Seller {
        id: id.into(),
        name: id.into(),
        business_type: "Startup".into(),
        region: "Oceania".into(),
        category: category.into(),
        join_date: at(2023, 5, 1),
        trust_index: trust,
        fulfillment_rate: trust / 100.0,
        return_rate: 0.1,
        complaint_ratio: 0.1,
        total_orders: 1,
    }
}

fn user(id: &str, region: &str, satisfaction: f64, orders: u32) -> User {
    User {
        id: id.into(),
        name: id.into(),
        email: format!("{id}@example.com"),
        region: region.into(),
        join_date: at(2023, 1, 1),
        total_orders: orders,
        satisfaction_score: satisfaction,
    }
}

fn dispute(id: &str, when: DateTime<Utc>, kind: DisputeType, amount: f64) -> Dispute {
    Dispute {
        id: id.into(),
        order_id: format!("o-{id}"),
        user_id: "u".into(),
        seller_id: "s".into(),
        dispute_type: kind,
        amount,
        status: DisputeStatus::Escalated,
        resolution: None,
        dispute_date: when,
        resolution_date: None,
    }
}

#[test]
fn category_averages_and_tie_break() {
    let sellers = vec![
        seller("s1", "A", 90.0),
        seller("s2", "B", 80.0),
        seller("s3", "A", 70.0),
    ];
    let out = category_analysis(&sellers);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].category, "A");
    assert_eq!(out[0].avg_trust_index, 80.0);
    assert_eq!(out[0].total_sellers, 2);
    assert_eq!(out[1].category, "B");
    assert_eq!(out[1].avg_trust_index, 80.0);
    assert_eq!(out[1].total_sellers, 1);
}

#[test]
fn categories_sorted_by_descending_trust() {
    let sellers = vec![
        seller("s1", "Toys", 60.0),
        seller("s2", "Books", 95.0),
        seller("s3", "Health", 75.0),
        seller("s4", "Books", 85.0),
    ];
    let names: Vec<String> = category_analysis(&sellers).into_iter().map(|c| c.category).collect();
    assert_eq!(names, ["Books", "Health", "Toys"]);
}

#[test]
fn category_dispute_rate_uses_complaint_ratio() {
    let mut a = seller("s1", "Sports", 80.0);
    a.complaint_ratio = 0.02;
    let mut b = seller("s2", "Sports", 80.0);
    b.complaint_ratio = 0.06;
    let out = category_analysis(&[a, b]);
    assert!((out[0].avg_dispute_rate - 0.04).abs() < 1e-12);
    assert!((out[0].avg_fulfillment_rate - 0.8).abs() < 1e-12);
}

#[test]
fn regions_sorted_by_descending_satisfaction() {
    let users = vec![
        user("u1", "Europe", 3.0, 10),
        user("u2", "Asia", 4.5, 4),
        user("u3", "Europe", 4.0, 20),
        user("u4", "Africa", 2.0, 1),
        user("u5", "Oceania", 3.5, 7),
    ];
    let out = regional_analysis(&users);
    let order: Vec<&str> = out.iter().map(|r| r.region.as_str()).collect();
    // Europe and Oceania tie at 3.5 and fall back to name order.
    assert_eq!(order, ["Asia", "Europe", "Oceania", "Africa"]);

    let europe = &out[1];
    assert_eq!(europe.total_users, 2);
    assert_eq!(europe.avg_orders, 15.0);
}

#[test]
fn empty_inputs_yield_empty_breakdowns() {
    assert!(category_analysis(&[]).is_empty());
    assert!(regional_analysis(&[]).is_empty());
    assert!(dispute_trends(&[]).is_empty());
}

#[test]
fn dispute_trends_chronological_then_type_name() {
    let disputes = vec![
        dispute("d1", at(2024, 2, 3), DisputeType::SellerFraud, 50.0),
        dispute("d2", at(2024, 1, 20), DisputeType::RefundRequest, 10.0),
        dispute("d3", at(2024, 1, 5), DisputeType::BillingDispute, 20.25),
        dispute("d4", at(2024, 1, 28), DisputeType::BillingDispute, 30.5),
        dispute("d5", at(2023, 12, 31), DisputeType::ProductQuality, 99.99),
    ];
    let trends = dispute_trends(&disputes);

    let keys: Vec<(i32, u32, &str)> = trends
        .iter()
        .map(|t| (t.year, t.month, t.dispute_type.as_str()))
        .collect();
    assert_eq!(
        keys,
        [
            (2023, 12, "Product Quality"),
            (2024, 1, "Billing Dispute"),
            (2024, 1, "Refund Request"),
            (2024, 2, "Seller Fraud"),
        ]
    );

    let billing = &trends[1];
    assert_eq!(billing.count, 2);
    assert!((billing.total_amount - 50.75).abs() < 1e-9);
}

#[test]
fn top_sellers_ranked_by_trust_then_id() {
    let sellers = vec![
        seller("c", "A", 70.0),
        seller("b", "A", 90.0),
        seller("a", "A", 90.0),
        seller("d", "A", 50.0),
    ];
    let top = top_sellers(&sellers, 3, 200).expect("valid limit");
    let ids: Vec<&str> = top.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn top_sellers_rejects_bad_limits() {
    let sellers = vec![seller("a", "A", 90.0)];
    assert!(matches!(top_sellers(&sellers, 0, 200), Err(DashError::Validation { .. })));
    assert!(matches!(top_sellers(&sellers, 201, 200), Err(DashError::Validation { .. })));
    assert_eq!(top_sellers(&sellers, 200, 200).expect("limit at max").len(), 1);
}
