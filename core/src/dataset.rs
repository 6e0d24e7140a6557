//! The complete in-memory dataset a metric request is computed over.

use crate::{
    error::DashResult,
    model::{Dispute, Order, Review, Seller, User},
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub users:    Vec<User>,
    pub sellers:  Vec<Seller>,
    pub orders:   Vec<Order>,
    pub reviews:  Vec<Review>,
    pub disputes: Vec<Dispute>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityTotals {
    pub users:    usize,
    pub sellers:  usize,
    pub orders:   usize,
    pub reviews:  usize,
    pub disputes: usize,
}

/// Orders and disputes dated inside the dashboard's recent-activity window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentActivity {
    pub orders_30d:   usize,
    pub disputes_30d: usize,
}

impl Dataset {
    /// Reject any record with an out-of-domain numeric field.
    /// Called before anything is written to the store.
    pub fn validate(&self) -> DashResult<()> {
        self.users.iter().try_for_each(|u| u.validate())?;
        self.sellers.iter().try_for_each(|s| s.validate())?;
        self.orders.iter().try_for_each(|o| o.validate())?;
        self.reviews.iter().try_for_each(|r| r.validate())?;
        self.disputes.iter().try_for_each(|d| d.validate())?;
        Ok(())
    }

    /// Drop sub-second precision from every timestamp so the dataset can be
    /// stored without loss. Returns how many timestamps were changed.
    pub fn truncate_subsecs(&mut self) -> usize {
        fn trunc(t: &mut DateTime<Utc>, changed: &mut usize) {
            let whole = t.trunc_subsecs(0);
            if whole != *t {
                *t = whole;
                *changed += 1;
            }
        }

        let mut changed = 0;
        for u in &mut self.users {
            trunc(&mut u.join_date, &mut changed);
        }
        for s in &mut self.sellers {
            trunc(&mut s.join_date, &mut changed);
        }
        for o in &mut self.orders {
            trunc(&mut o.order_date, &mut changed);
            if let Some(t) = o.fulfillment_date.as_mut() {
                trunc(t, &mut changed);
            }
        }
        for r in &mut self.reviews {
            trunc(&mut r.review_date, &mut changed);
        }
        for d in &mut self.disputes {
            trunc(&mut d.dispute_date, &mut changed);
            if let Some(t) = d.resolution_date.as_mut() {
                trunc(t, &mut changed);
            }
        }
        changed
    }

    pub fn totals(&self) -> EntityTotals {
        EntityTotals {
            users:    self.users.len(),
            sellers:  self.sellers.len(),
            orders:   self.orders.len(),
            reviews:  self.reviews.len(),
            disputes: self.disputes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.totals() == EntityTotals::default()
    }
}
