//! Deterministic buyer and storefront names for the generated dataset.
//!
//! Same stream state = same names, emails and storefronts.

use crate::rng::StreamRng;

pub struct NameGenerator;

impl NameGenerator {
    /// "First Last" for a buyer.
    pub fn buyer_name(rng: &mut StreamRng) -> String {
        let first = rng.pick(FIRST_NAMES);
        let last = rng.pick(LAST_NAMES);
        format!("{first} {last}")
    }

    /// Email derived from the buyer name plus a numeric suffix so that
    /// repeated names still get distinct-looking addresses.
    pub fn buyer_email(rng: &mut StreamRng, name: &str) -> String {
        let local: String = name
            .split_whitespace()
            .map(|p| p.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(".");
        let suffix = rng.next_u64_below(10_000);
        let domain = rng.pick(EMAIL_DOMAINS);
        format!("{local}{suffix}@{domain}")
    }

    /// Storefront name: "<Stem> <Trade> <Suffix>" or "<Surname> <Trade> <Suffix>".
    pub fn storefront_name(rng: &mut StreamRng) -> String {
        let trade = rng.pick(TRADES);
        let suffix = rng.pick(STORE_SUFFIXES);
        if rng.chance(0.5) {
            format!("{} {trade} {suffix}", rng.pick(STORE_STEMS))
        } else {
            format!("{} {trade} {suffix}", rng.pick(LAST_NAMES))
        }
    }

    /// Short free-text resolution note for a closed dispute.
    pub fn resolution_note(rng: &mut StreamRng) -> String {
        rng.pick(RESOLUTION_NOTES).to_string()
    }
}

const FIRST_NAMES: &[&str] = &[
    "Amara", "Bilal", "Chen", "Dmitri", "Elena", "Farah", "Gustavo", "Hana",
    "Ibrahim", "Jana", "Kofi", "Lucia", "Mateo", "Nadia", "Oskar", "Priya",
    "Quinn", "Rosa", "Sven", "Tomas", "Uma", "Viktor", "Wen", "Ximena",
    "Yusuf", "Zara", "Alice", "Ben", "Clara", "Daniel", "Emily", "Felix",
    "Grace", "Henry", "Isla", "Jack", "Kai", "Leah", "Marcus", "Nora",
    "Owen", "Paula", "Ravi", "Sofia", "Theo", "Valentina", "William", "Yara",
];

const LAST_NAMES: &[&str] = &[
    "Abara", "Becker", "Castillo", "Dubois", "Eriksen", "Fernandes", "Garcia",
    "Hoffmann", "Ito", "Jensen", "Kowalski", "Larsen", "Mensah", "Nakamura",
    "Okafor", "Petrov", "Quispe", "Rossi", "Schmidt", "Tanaka", "Usman",
    "Varga", "Wright", "Xu", "Yilmaz", "Zhang", "Anderson", "Brooks", "Clarke",
    "Davies", "Evans", "Fischer", "Gomez", "Hughes", "Iyer", "Kim", "Lopez",
    "Moreau", "Novak", "Olsen", "Patel", "Reyes", "Silva", "Turner", "Walker",
];

const EMAIL_DOMAINS: &[&str] = &[
    "example.com", "example.org", "example.net", "mail.test", "inbox.test",
];

const STORE_STEMS: &[&str] = &[
    "Bright", "Summit", "Harbor", "Urban", "Golden", "Evergreen", "Nova",
    "Blue Fern", "Cedar", "Pioneer", "Silver Oak", "Northwind", "Maple",
];

const TRADES: &[&str] = &[
    "Gadgets", "Outfitters", "Home Goods", "Books", "Sports", "Auto Parts",
    "Wellness", "Toys", "Supply", "Trading", "Emporium", "Electronics",
];

const STORE_SUFFIXES: &[&str] = &["Co", "LLC", "Ltd", "Inc", "Store", "Shop", "Market"];

const RESOLUTION_NOTES: &[&str] = &[
    "Refund issued to buyer.",
    "Replacement shipped to buyer.",
    "Claim rejected after review of tracking evidence.",
    "Partial refund agreed by both parties.",
    "Seller provided proof of delivery.",
    "Charge reversed after billing correction.",
];
