//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! The aggregator and simulator work on loaded collections; they never
//! execute SQL directly.
//!
//! Regeneration replaces every table inside one transaction and bumps
//! `dataset_meta.version` in the same transaction, so a reader sees
//! either the previous dataset or the new one, never a mix.

use crate::{
    dataset::{Dataset, EntityTotals, RecentActivity},
    error::{DashError, DashResult},
    types::DatasetVersion,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use std::str::FromStr;
use std::time::Duration;

mod dispute;
mod order;
mod review;
mod seller;
mod user;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DashStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl DashStore {
    pub fn open(path: &str) -> DashResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DashResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn, path: None })
    }

    /// Open a second connection to the same database file.
    /// For in-memory databases this yields a fresh, isolated database.
    pub fn reopen(&self) -> DashResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DashResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_dataset.sql"))?;
        log::info!("Store migrated ({})", self.path.as_deref().unwrap_or(":memory:"));
        Ok(())
    }

    // ── Dataset lifecycle ──────────────────────────────────────

    /// Validate `dataset`, then atomically swap it in for the current one.
    /// Returns the new dataset version.
    pub fn replace_dataset(
        &self,
        dataset: &Dataset,
        seed: Option<u64>,
        generated_at: DateTime<Utc>,
    ) -> DashResult<DatasetVersion> {
        dataset.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            "DELETE FROM reviews;
             DELETE FROM disputes;
             DELETE FROM orders;
             DELETE FROM sellers;
             DELETE FROM users;",
        )?;
        user::insert_users(&tx, &dataset.users)?;
        seller::insert_sellers(&tx, &dataset.sellers)?;
        order::insert_orders(&tx, &dataset.orders)?;
        review::insert_reviews(&tx, &dataset.reviews)?;
        dispute::insert_disputes(&tx, &dataset.disputes)?;

        let version = current_version(&tx)? + 1;
        tx.execute(
            "INSERT INTO dataset_meta (id, version, seed, generated_at) VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                version = excluded.version,
                seed = excluded.seed,
                generated_at = excluded.generated_at",
            params![version as i64, seed.map(|s| s as i64), generated_at.timestamp()],
        )?;
        tx.commit()?;

        log::info!(
            "Dataset replaced: version {version}, {} users, {} sellers, {} orders, {} reviews, {} disputes",
            dataset.users.len(),
            dataset.sellers.len(),
            dataset.orders.len(),
            dataset.reviews.len(),
            dataset.disputes.len()
        );
        Ok(version)
    }

    /// Load every collection from one consistent read.
    pub fn load_dataset(&self) -> DashResult<Dataset> {
        Ok(self.snapshot()?.1)
    }

    /// The current version together with the dataset it labels.
    pub fn snapshot(&self) -> DashResult<(DatasetVersion, Dataset)> {
        let tx = self.conn.unchecked_transaction()?;
        let version = current_version(&tx)?;
        let dataset = Dataset {
            users:    user::select_users(&tx)?,
            sellers:  seller::select_sellers(&tx)?,
            orders:   order::select_orders(&tx)?,
            reviews:  review::select_reviews(&tx)?,
            disputes: dispute::select_disputes(&tx)?,
        };
        tx.commit()?;
        Ok((version, dataset))
    }

    /// 0 until the first dataset is written.
    pub fn dataset_version(&self) -> DashResult<DatasetVersion> {
        current_version(&self.conn)
    }

    /// Seed recorded with the current dataset, if it was generated.
    pub fn dataset_seed(&self) -> DashResult<Option<u64>> {
        let seed: Option<Option<i64>> = self
            .conn
            .query_row("SELECT seed FROM dataset_meta WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        Ok(seed.flatten().map(|s| s as u64))
    }

    pub fn entity_totals(&self) -> DashResult<EntityTotals> {
        let tx = self.conn.unchecked_transaction()?;
        let totals = count_totals(&tx)?;
        tx.commit()?;
        Ok(totals)
    }

    /// Entity totals plus orders and disputes dated at or after `since`,
    /// all from one read and labelled with the version they came from.
    pub fn activity_summary(
        &self,
        since: DateTime<Utc>,
    ) -> DashResult<(DatasetVersion, EntityTotals, RecentActivity)> {
        let tx = self.conn.unchecked_transaction()?;
        let version = current_version(&tx)?;
        let totals = count_totals(&tx)?;
        let since = to_epoch(&since);
        let count_since = |sql: &str| -> DashResult<usize> {
            let n: i64 = tx.query_row(sql, [since], |row| row.get(0))?;
            Ok(n as usize)
        };
        let recent = RecentActivity {
            orders_30d:   count_since("SELECT COUNT(*) FROM orders WHERE order_date >= ?1")?,
            disputes_30d: count_since("SELECT COUNT(*) FROM disputes WHERE dispute_date >= ?1")?,
        };
        tx.commit()?;
        Ok((version, totals, recent))
    }
}

fn count_totals(conn: &Connection) -> DashResult<EntityTotals> {
    let count = |table: &str| -> DashResult<usize> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n as usize)
    };
    Ok(EntityTotals {
        users:    count("users")?,
        sellers:  count("sellers")?,
        orders:   count("orders")?,
        reviews:  count("reviews")?,
        disputes: count("disputes")?,
    })
}

fn current_version(conn: &Connection) -> DashResult<DatasetVersion> {
    let version: Option<i64> = conn
        .query_row("SELECT version FROM dataset_meta WHERE id = 1", [], |row| row.get(0))
        .optional()?;
    Ok(version.unwrap_or(0) as DatasetVersion)
}

// ── Row conversion helpers ─────────────────────────────────────

fn to_epoch(t: &DateTime<Utc>) -> i64 {
    t.timestamp()
}

fn from_epoch(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

fn opt_from_epoch(idx: usize, secs: Option<i64>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    secs.map(|s| from_epoch(idx, s)).transpose()
}

fn parse_enum<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: FromStr<Err = DashError>,
{
    raw.parse()
        .map_err(|e: DashError| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
