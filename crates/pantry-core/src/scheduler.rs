use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use pantry_types::{InventoryItem, NewNotification, NotificationKind};

use crate::expiry::{self, ExpiryAlert, SCHEDULING_LOOKAHEAD_DAYS};
use crate::genai::GenerationClient;
use crate::store::{SharedStore, blocking};

/// Outcome counters for one scheduling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    /// Items inside the lookahead window.
    pub examined: usize,
    pub created: usize,
    /// Skipped because an unread expiry warning already exists.
    pub already_notified: usize,
    /// Inside the lookahead window but not yet inside the alert window.
    pub not_due: usize,
    pub failed: usize,
}

/// Emits expiry warnings for items close to (or past) their expiry date.
///
/// A pass is safe to repeat: an item with an unread warning is skipped. The
/// existence check and the insert are separate store calls, so two passes for
/// the same user running at once can both insert; that duplicate is tolerated.
#[derive(Clone)]
pub struct ExpiryScheduler {
    store: SharedStore,
    phrasing: Option<GenerationClient>,
}

enum Step {
    Created,
    AlreadyNotified,
    NotDue,
}

impl ExpiryScheduler {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            phrasing: None,
        }
    }

    /// Reword notification bodies with the generation client. The template
    /// is kept whenever generation fails.
    pub fn with_phrasing(mut self, client: GenerationClient) -> Self {
        self.phrasing = Some(client);
        self
    }

    pub async fn schedule_now(&self, user_id: Uuid) -> ScheduleReport {
        self.schedule(user_id, Utc::now().date_naive()).await
    }

    pub async fn schedule(&self, user_id: Uuid, today: NaiveDate) -> ScheduleReport {
        let mut report = ScheduleReport::default();
        let cutoff = expiry::lookahead_cutoff(today, SCHEDULING_LOOKAHEAD_DAYS);

        let items = match blocking(&self.store, move |s| s.items_expiring_by(user_id, cutoff)).await {
            Ok(items) => items,
            Err(e) => {
                error!("Expiry scheduling for user {} aborted: {}", user_id, e);
                return report;
            }
        };
        report.examined = items.len();

        for item in items {
            match self.schedule_item(&item, today).await {
                Ok(Step::Created) => report.created += 1,
                Ok(Step::AlreadyNotified) => report.already_notified += 1,
                Ok(Step::NotDue) => report.not_due += 1,
                Err(e) => {
                    warn!("Expiry notification for item {} failed: {}", item.id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Scheduled expiry notifications for user {}: {} examined, {} created, {} already notified",
            user_id, report.examined, report.created, report.already_notified
        );
        report
    }

    async fn schedule_item(&self, item: &InventoryItem, today: NaiveDate) -> anyhow::Result<Step> {
        let days = expiry::days_until_expiry(item.expiry_date, today);
        let Some(alert) = ExpiryAlert::for_item(&item.name, days) else {
            return Ok(Step::NotDue);
        };

        let (user_id, item_id) = (item.user_id, item.id);
        let exists = blocking(&self.store, move |s| {
            s.has_unread_notification(user_id, item_id, NotificationKind::ExpiryWarning)
        })
        .await?;
        if exists {
            debug!("Item {} already has an unread expiry warning", item_id);
            return Ok(Step::AlreadyNotified);
        }

        let body = match &self.phrasing {
            Some(client) => client
                .phrase_expiry(&item.name, days)
                .await
                .unwrap_or(alert.body),
            None => alert.body,
        };

        let notification = NewNotification {
            user_id,
            item_id,
            kind: NotificationKind::ExpiryWarning,
            title: alert.title.to_string(),
            body,
            priority: alert.priority,
            scheduled_for: Utc::now(),
        };
        blocking(&self.store, move |s| s.insert_notification(&notification)).await?;
        Ok(Step::Created)
    }
}
