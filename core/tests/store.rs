//! Store tests: round-trip fidelity, atomic replacement, ingestion
//! validation, and storage-failure classification.

use chrono::{Duration, TimeZone, Utc};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use trustdash_core::{
    config::DashConfig,
    dataset::Dataset,
    error::{DashError, DashResult},
    generator::{DataGenerationRequest, DatasetGenerator},
    sentiment::LexiconScorer,
    store::DashStore,
};

fn fresh_store() -> DashStore {
    let store = DashStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn small_dataset(seed: u64) -> Dataset {
    sized_dataset(seed, 12, 300)
}

fn sized_dataset(seed: u64, num_sellers: usize, num_orders: usize) -> Dataset {
    let config = DashConfig::default();
    let scorer = LexiconScorer::default();
    let request = DataGenerationRequest {
        num_users: 40,
        num_sellers,
        num_orders,
        num_reviews: 120,
        num_disputes: 30,
        seed,
    };
    let anchor = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
    DatasetGenerator::new(&config.generation, &scorer)
        .generate(&request, anchor)
        .expect("generate")
}

/// Sort every collection by id so comparisons don't depend on insert order.
fn by_id(mut d: Dataset) -> Dataset {
    d.users.sort_by(|a, b| a.id.cmp(&b.id));
    d.sellers.sort_by(|a, b| a.id.cmp(&b.id));
    d.orders.sort_by(|a, b| a.id.cmp(&b.id));
    d.reviews.sort_by(|a, b| a.id.cmp(&b.id));
    d.disputes.sort_by(|a, b| a.id.cmp(&b.id));
    d
}

#[test]
fn fresh_store_is_empty_not_an_error() -> DashResult<()> {
    let store = fresh_store();
    assert_eq!(store.dataset_version()?, 0);
    assert!(store.load_dataset()?.is_empty());
    assert_eq!(store.dataset_seed()?, None);
    Ok(())
}

#[test]
fn dataset_round_trips_through_sqlite() -> DashResult<()> {
    let store = fresh_store();
    let original = small_dataset(42);
    let generated_at = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    let version = store.replace_dataset(&original, Some(42), generated_at)?;
    assert_eq!(version, 1);
    assert_eq!(store.dataset_seed()?, Some(42));

    let loaded = store.load_dataset()?;
    assert_eq!(by_id(loaded), by_id(original.clone()));
    assert_eq!(store.entity_totals()?, original.totals());
    Ok(())
}

#[test]
fn replacement_swaps_whole_dataset_and_bumps_version() -> DashResult<()> {
    let store = fresh_store();
    let at = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    store.replace_dataset(&small_dataset(1), Some(1), at)?;
    let second = small_dataset(2);
    let version = store.replace_dataset(&second, Some(2), at)?;
    assert_eq!(version, 2);

    let (snap_version, loaded) = store.snapshot()?;
    assert_eq!(snap_version, 2);
    assert_eq!(by_id(loaded), by_id(second));
    Ok(())
}

#[test]
fn invalid_record_is_rejected_and_previous_dataset_kept() -> DashResult<()> {
    let store = fresh_store();
    let at = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
    let good = small_dataset(5);
    store.replace_dataset(&good, Some(5), at)?;

    let mut bad = small_dataset(6);
    bad.sellers[0].fulfillment_rate = 1.2;
    let err = store.replace_dataset(&bad, Some(6), at).expect_err("must reject");
    assert!(matches!(err, DashError::InvalidRecord { entity: "seller", .. }), "{err}");
    assert!(!err.is_retryable());

    assert_eq!(store.dataset_version()?, 1);
    assert_eq!(by_id(store.load_dataset()?), by_id(good));
    Ok(())
}

#[test]
fn out_of_range_fields_rejected_not_clamped() {
    let mut d = small_dataset(8);
    d.reviews[0].rating = 6;
    assert!(d.validate().is_err());

    let mut d = small_dataset(8);
    d.users[0].satisfaction_score = 0.5;
    assert!(d.validate().is_err());

    let mut d = small_dataset(8);
    d.sellers[0].trust_index = f64::NAN;
    assert!(d.validate().is_err());

    let mut d = small_dataset(8);
    d.reviews[0].sentiment_score = -1.01;
    assert!(d.validate().is_err());
}

#[test]
fn unreachable_database_is_retryable() {
    let err = DashStore::open("/nonexistent-trustdash-dir/sub/dash.db")
        .err()
        .expect("opening under a missing directory must fail");
    assert!(err.is_retryable(), "expected retryable storage error, got {err}");
}

#[test]
fn file_store_is_shared_across_connections() -> DashResult<()> {
    let path = std::env::temp_dir().join(format!("trustdash-{}.db", uuid::Uuid::new_v4()));
    let path_str = path.to_string_lossy().to_string();

    let writer = DashStore::open(&path_str)?;
    writer.migrate()?;
    let reader = writer.reopen()?;

    let at = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
    writer.replace_dataset(&small_dataset(3), Some(3), at)?;
    assert_eq!(reader.dataset_version()?, 1);
    assert_eq!(reader.entity_totals()?.orders, 300);

    drop(reader);
    drop(writer);
    let _ = std::fs::remove_file(&path);
    Ok(())
}

#[test]
fn concurrent_reader_never_sees_a_partial_swap() -> DashResult<()> {
    let path = std::env::temp_dir().join(format!("trustdash-swap-{}.db", uuid::Uuid::new_v4()));
    let path_str = path.to_string_lossy().to_string();

    let writer = DashStore::open(&path_str)?;
    writer.migrate()?;
    let at = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    let small = sized_dataset(21, 10, 150);
    let large = sized_dataset(22, 25, 600);
    let shapes = [
        (small.sellers.len(), small.orders.len()),
        (large.sellers.len(), large.orders.len()),
    ];
    writer.replace_dataset(&small, Some(21), at)?;

    let reader = writer.reopen()?;
    let done = Arc::new(AtomicBool::new(false));
    let reader_done = Arc::clone(&done);
    let handle = thread::spawn(move || -> DashResult<Vec<(u64, usize, usize)>> {
        let mut seen = Vec::new();
        while !reader_done.load(Ordering::Acquire) || seen.is_empty() {
            let (version, data) = reader.snapshot()?;
            seen.push((version, data.sellers.len(), data.orders.len()));
        }
        Ok(seen)
    });

    for i in 0..20 {
        let next = if i % 2 == 0 { &large } else { &small };
        writer.replace_dataset(next, None, at)?;
    }
    done.store(true, Ordering::Release);

    let seen = handle.join().expect("reader thread panicked")?;
    assert!(!seen.is_empty());
    for (version, sellers, orders) in &seen {
        assert!(
            shapes.contains(&(*sellers, *orders)),
            "version {version} snapshot mixed datasets: {sellers} sellers, {orders} orders"
        );
        // Odd versions hold `small`, even versions hold `large`.
        let expected = shapes[((version + 1) % 2) as usize];
        assert_eq!((*sellers, *orders), expected, "version {version} labels the wrong dataset");
    }

    drop(writer);
    let _ = std::fs::remove_file(&path);
    Ok(())
}

#[test]
fn sub_second_timestamps_are_rejected_on_write() -> DashResult<()> {
    let store = fresh_store();
    let at = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    let mut d = small_dataset(9);
    d.orders[0].order_date = d.orders[0].order_date + Duration::milliseconds(250);
    let err = store.replace_dataset(&d, None, at).expect_err("must reject");
    assert!(matches!(err, DashError::InvalidRecord { entity: "order", .. }), "{err}");
    assert_eq!(store.dataset_version()?, 0);

    let mut d = small_dataset(9);
    let dispute = &mut d.disputes[0];
    dispute.resolution_date = Some(dispute.dispute_date + Duration::microseconds(1));
    assert!(matches!(
        d.validate(),
        Err(DashError::InvalidRecord { entity: "dispute", .. })
    ));
    Ok(())
}
