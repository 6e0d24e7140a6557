//! Synthetic marketplace dataset generation.
//!
//! Output is a pure function of (request, anchor time): every draw comes
//! from a per-entity PCG stream seeded by `request.seed`, and all timestamps
//! are offsets back from `anchor`.

use crate::{
    config::GenerationConfig,
    dataset::Dataset,
    error::{DashError, DashResult},
    model::{Dispute, DisputeStatus, DisputeType, Order, OrderStatus, Review, Seller, User},
    name_generator::NameGenerator,
    rng::{RngBank, StreamRng, StreamSlot},
    sentiment::SentimentScorer,
    types::round_to,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MAX_RECORDS_PER_KIND: usize = 1_000_000;

const DISPUTE_PROBABILITY: f64 = 0.05;
const RETURN_PROBABILITY: f64 = 0.08;
const FRAUD_PROBABILITY: f64 = 0.02;
const FULFILLED_PROBABILITY: f64 = 0.9;
const RESOLVED_PROBABILITY: f64 = 0.7;

/// Relative weights of star ratings 1..=5.
const RATING_WEIGHTS: [u32; 5] = [5, 10, 20, 35, 30];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataGenerationRequest {
    pub num_users:    usize,
    pub num_sellers:  usize,
    pub num_orders:   usize,
    pub num_reviews:  usize,
    pub num_disputes: usize,
    pub seed:         u64,
}

impl Default for DataGenerationRequest {
    fn default() -> Self {
        Self {
            num_users:    1000,
            num_sellers:  200,
            num_orders:   5000,
            num_reviews:  3000,
            num_disputes: 250,
            seed:         42,
        }
    }
}

impl DataGenerationRequest {
    pub fn validate(&self) -> DashResult<()> {
        let counts = [
            ("num_users", self.num_users),
            ("num_sellers", self.num_sellers),
            ("num_orders", self.num_orders),
            ("num_reviews", self.num_reviews),
            ("num_disputes", self.num_disputes),
        ];
        for (field, n) in counts {
            if n > MAX_RECORDS_PER_KIND {
                return Err(DashError::validation(field, n, "at most 1000000"));
            }
        }
        if self.num_orders > 0 && self.num_users == 0 {
            return Err(DashError::validation("num_users", 0, "at least 1 when orders are requested"));
        }
        if self.num_orders > 0 && self.num_sellers == 0 {
            return Err(DashError::validation("num_sellers", 0, "at least 1 when orders are requested"));
        }
        Ok(())
    }
}

pub struct DatasetGenerator<'a> {
    config: &'a GenerationConfig,
    scorer: &'a dyn SentimentScorer,
}

impl<'a> DatasetGenerator<'a> {
    pub fn new(config: &'a GenerationConfig, scorer: &'a dyn SentimentScorer) -> Self {
        Self { config, scorer }
    }

    pub fn generate(
        &self,
        request: &DataGenerationRequest,
        anchor: DateTime<Utc>,
    ) -> DashResult<Dataset> {
        request.validate()?;
        let bank = RngBank::new(request.seed);

        let users = self.generate_users(request, anchor, &mut bank.for_stream(StreamSlot::Users));
        let sellers =
            self.generate_sellers(request, anchor, &mut bank.for_stream(StreamSlot::Sellers));
        let orders = self.generate_orders(
            request,
            anchor,
            &users,
            &sellers,
            &mut bank.for_stream(StreamSlot::Orders),
        );
        let reviews =
            self.generate_reviews(request, anchor, &orders, &mut bank.for_stream(StreamSlot::Reviews));
        let disputes = self.generate_disputes(
            request,
            anchor,
            &orders,
            &mut bank.for_stream(StreamSlot::Disputes),
        );

        log::debug!(
            "Generated dataset seed={} users={} sellers={} orders={} reviews={} disputes={}",
            request.seed,
            users.len(),
            sellers.len(),
            orders.len(),
            reviews.len(),
            disputes.len()
        );

        Ok(Dataset { users, sellers, orders, reviews, disputes })
    }

    fn generate_users(
        &self,
        request: &DataGenerationRequest,
        anchor: DateTime<Utc>,
        rng: &mut StreamRng,
    ) -> Vec<User> {
        (0..request.num_users)
            .map(|_| {
                let name = NameGenerator::buyer_name(rng);
                let email = NameGenerator::buyer_email(rng, &name);
                User {
                    id: rng.entity_id(),
                    name,
                    email,
                    region: rng.pick(&self.config.regions).clone(),
                    join_date: between(rng, anchor - Duration::days(730), anchor),
                    total_orders: rng.int_between(0, 50),
                    satisfaction_score: rng.uniform(1.0, 5.0),
                }
            })
            .collect()
    }

    fn generate_sellers(
        &self,
        request: &DataGenerationRequest,
        anchor: DateTime<Utc>,
        rng: &mut StreamRng,
    ) -> Vec<Seller> {
        let weights = &self.config.seller_trust;
        (0..request.num_sellers)
            .map(|_| {
                let fulfillment_rate = round_to(rng.uniform(0.7, 1.0), 3);
                let return_rate = round_to(rng.uniform(0.0, 0.3), 3);
                let complaint_ratio = round_to(rng.uniform(0.0, 0.2), 3);
                let trust_index = fulfillment_rate * weights.fulfillment
                    + (1.0 - return_rate) * weights.non_return
                    + (1.0 - complaint_ratio) * weights.non_complaint;

                Seller {
                    id: rng.entity_id(),
                    name: NameGenerator::storefront_name(rng),
                    business_type: rng.pick(&self.config.business_types).clone(),
                    region: rng.pick(&self.config.regions).clone(),
                    category: rng.pick(&self.config.categories).clone(),
                    join_date: between(rng, anchor - Duration::days(1095), anchor),
                    trust_index: round_to(trust_index, 2),
                    fulfillment_rate,
                    return_rate,
                    complaint_ratio,
                    total_orders: rng.int_between(0, 1000),
                }
            })
            .collect()
    }

    fn generate_orders(
        &self,
        request: &DataGenerationRequest,
        anchor: DateTime<Utc>,
        users: &[User],
        sellers: &[Seller],
        rng: &mut StreamRng,
    ) -> Vec<Order> {
        if users.is_empty() || sellers.is_empty() {
            return Vec::new();
        }
        (0..request.num_orders)
            .map(|_| {
                let user = rng.pick(users);
                let seller = rng.pick(sellers);
                let order_date = between(rng, anchor - Duration::days(365), anchor);
                let fulfillment_date = rng
                    .chance(FULFILLED_PROBABILITY)
                    .then(|| order_date + Duration::days(i64::from(rng.int_between(1, 14))));

                Order {
                    id: rng.entity_id(),
                    user_id: user.id.clone(),
                    seller_id: seller.id.clone(),
                    amount: round_to(rng.uniform(10.0, 1000.0), 2),
                    status: *rng.pick(&OrderStatus::ALL),
                    category: seller.category.clone(),
                    region: user.region.clone(),
                    order_date,
                    fulfillment_date,
                    is_disputed: rng.chance(DISPUTE_PROBABILITY),
                    is_returned: rng.chance(RETURN_PROBABILITY),
                    fraud_flag: rng.chance(FRAUD_PROBABILITY),
                }
            })
            .collect()
    }

    fn generate_reviews(
        &self,
        request: &DataGenerationRequest,
        anchor: DateTime<Utc>,
        orders: &[Order],
        rng: &mut StreamRng,
    ) -> Vec<Review> {
        let count = request.num_reviews.min(orders.len());
        (0..count)
            .map(|_| {
                let order = rng.pick(orders);
                let rating = rng.weighted_index(&RATING_WEIGHTS) as u8 + 1;
                let review_text = review_text_for(rng, rating).to_string();
                let sentiment = self.scorer.score(&review_text);

                Review {
                    id: rng.entity_id(),
                    order_id: order.id.clone(),
                    user_id: order.user_id.clone(),
                    seller_id: order.seller_id.clone(),
                    rating,
                    review_text,
                    sentiment_score: sentiment.score,
                    sentiment_label: sentiment.label,
                    review_date: between(rng, order.order_date, anchor),
                }
            })
            .collect()
    }

    fn generate_disputes(
        &self,
        request: &DataGenerationRequest,
        anchor: DateTime<Utc>,
        orders: &[Order],
        rng: &mut StreamRng,
    ) -> Vec<Dispute> {
        orders
            .iter()
            .filter(|o| o.is_disputed)
            .take(request.num_disputes)
            .map(|order| {
                let resolution_date = rng
                    .chance(RESOLVED_PROBABILITY)
                    .then(|| between(rng, order.order_date, anchor));
                let resolution = resolution_date.map(|_| NameGenerator::resolution_note(rng));

                Dispute {
                    id: rng.entity_id(),
                    order_id: order.id.clone(),
                    user_id: order.user_id.clone(),
                    seller_id: order.seller_id.clone(),
                    dispute_type: *rng.pick(&DisputeType::ALL),
                    amount: order.amount,
                    status: *rng.pick(&DisputeStatus::ALL),
                    resolution,
                    dispute_date: between(rng, order.order_date, anchor),
                    resolution_date,
                }
            })
            .collect()
    }
}

/// Uniform instant in [start, end], at whole-second resolution.
fn between(rng: &mut StreamRng, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    let span = (end - start).num_seconds().max(0) as u64;
    start + Duration::seconds(rng.next_u64_below(span + 1) as i64)
}

fn review_text_for(rng: &mut StreamRng, rating: u8) -> &'static str {
    match rating {
        4..=5 => *rng.pick(POSITIVE_REVIEWS),
        3 => *rng.pick(NEUTRAL_REVIEWS),
        _ => *rng.pick(NEGATIVE_REVIEWS),
    }
}

const POSITIVE_REVIEWS: &[&str] = &[
    "Excellent product! Fast delivery and great quality.",
    "Amazing seller, highly recommended!",
    "Perfect condition on arrival, will order again.",
    "Outstanding communication from start to finish.",
    "Great value for money, very satisfied.",
    "Quick shipping and exactly as pictured.",
    "Professional packaging and a smooth checkout.",
    "Impressive build quality, exceeded what I expected.",
];

const NEUTRAL_REVIEWS: &[&str] = &[
    "Product is okay, nothing special.",
    "Average item at an average price.",
    "Does what it says on the box.",
    "Not bad, but could be better.",
    "Reasonable for the price.",
    "Standard item, arrived on schedule.",
    "It works, though the finish is plain.",
    "Fair transaction overall.",
];

const NEGATIVE_REVIEWS: &[&str] = &[
    "Not as described, very disappointed.",
    "Terrible quality, a waste of money.",
    "Slow delivery and poor communication.",
    "Item arrived damaged and the seller was unresponsive.",
    "Complete scam, avoid this seller.",
    "Poor quality for the price.",
    "Bad experience, would not recommend.",
    "Package never showed up and nobody answered.",
];
