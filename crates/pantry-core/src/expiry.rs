use chrono::{NaiveDate, TimeDelta};

use pantry_types::Priority;

/// Horizon fetched by a scheduling pass.
pub const SCHEDULING_LOOKAHEAD_DAYS: i64 = 7;

/// Items this close to expiry (or past it) get a notification.
pub const ALERT_WINDOW_DAYS: i64 = 3;

pub const EXPIRED_TITLE: &str = "Item Expired";
pub const EXPIRING_TITLE: &str = "Item Expiring Soon";

/// Whole calendar days from `today` to `expiry_date`; negative once expired.
pub fn days_until_expiry(expiry_date: NaiveDate, today: NaiveDate) -> i64 {
    (expiry_date - today).num_days()
}

/// Last date inside a lookahead window of `days` starting today.
pub fn lookahead_cutoff(today: NaiveDate, days: i64) -> NaiveDate {
    today
        .checked_add_signed(TimeDelta::days(days))
        .unwrap_or(NaiveDate::MAX)
}

/// Deterministic notification content for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryAlert {
    pub days_until_expiry: i64,
    pub title: &'static str,
    pub body: String,
    pub priority: Priority,
}

impl ExpiryAlert {
    /// `None` when the item is still outside the alert window.
    pub fn for_item(item_name: &str, days_until_expiry: i64) -> Option<Self> {
        if days_until_expiry > ALERT_WINDOW_DAYS {
            return None;
        }

        let (title, body) = if days_until_expiry <= 0 {
            (
                EXPIRED_TITLE,
                format!(
                    "Your {} has expired. Consider removing it from your inventory.",
                    item_name
                ),
            )
        } else {
            let plural = if days_until_expiry == 1 { "" } else { "s" };
            (
                EXPIRING_TITLE,
                format!(
                    "Your {} expires in {} day{}. Consider using it soon!",
                    item_name, days_until_expiry, plural
                ),
            )
        };

        let priority = if days_until_expiry <= 1 {
            Priority::High
        } else {
            Priority::Medium
        };

        Some(Self {
            days_until_expiry,
            title,
            body,
            priority,
        })
    }
}
