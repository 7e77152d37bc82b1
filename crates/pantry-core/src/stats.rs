use chrono::{DateTime, TimeDelta, Utc};
use tracing::error;
use uuid::Uuid;

use pantry_types::GroceryStats;

use crate::expiry::{self, ALERT_WINDOW_DAYS};
use crate::store::{SharedStore, blocking};

/// Scans newer than this count as recent.
pub const RECENT_SCAN_DAYS: i64 = 7;

// Display placeholders; nothing computes these yet.
pub const WASTE_REDUCED_PLACEHOLDER: u32 = 85;
pub const MONEY_SAVED_PLACEHOLDER: u32 = 127;

#[derive(Clone)]
pub struct StatsAggregator {
    store: SharedStore,
}

impl StatsAggregator {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Dashboard counters for `user_id` as of `now`. Falls back to all-zero
    /// stats if any store read fails.
    pub async fn compute(&self, user_id: Uuid, now: DateTime<Utc>) -> GroceryStats {
        let today = now.date_naive();
        let cutoff = expiry::lookahead_cutoff(today, ALERT_WINDOW_DAYS);
        let scans_since = now - TimeDelta::days(RECENT_SCAN_DAYS);

        let counts = blocking(&self.store, move |s| {
            let total = s.count_active_items(user_id)?;
            let expiring = s.items_expiring_by(user_id, cutoff)?.len() as u64;
            let scans = s.count_scans_since(user_id, scans_since)?;
            Ok((total, expiring, scans))
        })
        .await;

        match counts {
            Ok((total_items, expiring_items, recent_scans)) => GroceryStats {
                total_items,
                expiring_items,
                recent_scans,
                waste_reduced: WASTE_REDUCED_PLACEHOLDER,
                money_saved: MONEY_SAVED_PLACEHOLDER,
            },
            Err(e) => {
                error!("Failed to compute stats for user {}: {}", user_id, e);
                GroceryStats::default()
            }
        }
    }

    pub async fn compute_now(&self, user_id: Uuid) -> GroceryStats {
        self.compute(user_id, Utc::now()).await
    }
}
