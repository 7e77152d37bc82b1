use tracing::{debug, info};
use uuid::Uuid;

use pantry_types::{InventoryItem, ItemChanges, NewInventoryItem, Notification};

use crate::error::{ServiceError, ServiceResult};
use crate::scheduler::ExpiryScheduler;
use crate::store::{SharedStore, blocking};

pub const LIST_LIMIT: u32 = 50;
pub const SEARCH_LIMIT: u32 = 50;
pub const NOTIFICATION_LIMIT: u32 = 50;

/// Inventory reads and writes. Every mutation that can change an expiry
/// window triggers a scheduling pass for the item's owner.
#[derive(Clone)]
pub struct InventoryService {
    store: SharedStore,
    scheduler: ExpiryScheduler,
}

fn require_text(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl InventoryService {
    pub fn new(store: SharedStore, scheduler: ExpiryScheduler) -> Self {
        Self { store, scheduler }
    }

    pub fn scheduler(&self) -> &ExpiryScheduler {
        &self.scheduler
    }

    pub async fn add_item(&self, item: NewInventoryItem) -> ServiceResult<InventoryItem> {
        require_text("name", &item.name)?;
        require_text("unit", &item.unit)?;
        require_text("location", &item.location)?;

        let row = blocking(&self.store, move |s| s.insert_item(&item)).await?;
        info!("Added item {} ({}) for user {}", row.id, row.name, row.user_id);

        self.scheduler.schedule_now(row.user_id).await;
        Ok(row)
    }

    pub async fn update_item(&self, id: Uuid, changes: ItemChanges) -> ServiceResult<InventoryItem> {
        if let Some(name) = &changes.name {
            require_text("name", name)?;
        }
        if changes.is_empty() {
            return blocking(&self.store, move |s| s.get_item(id))
                .await?
                .ok_or(ServiceError::NotFound { kind: "item", id });
        }

        let row = blocking(&self.store, move |s| s.update_item(id, &changes))
            .await?
            .ok_or(ServiceError::NotFound { kind: "item", id })?;
        debug!("Updated item {}", id);

        self.scheduler.schedule_now(row.user_id).await;
        Ok(row)
    }

    /// Returns `false` when the item is unknown or already consumed. A
    /// successful consume runs a scheduling pass for the owner.
    pub async fn consume_item(&self, id: Uuid) -> ServiceResult<bool> {
        let changed = blocking(&self.store, move |s| s.consume_item(id)).await?;
        if !changed {
            return Ok(false);
        }
        info!("Item {} consumed", id);

        if let Some(item) = blocking(&self.store, move |s| s.get_item(id)).await? {
            self.scheduler.schedule_now(item.user_id).await;
        }
        Ok(true)
    }

    pub async fn list_items(&self, user_id: Uuid) -> ServiceResult<Vec<InventoryItem>> {
        Ok(blocking(&self.store, move |s| s.active_items(user_id, LIST_LIMIT)).await?)
    }

    pub async fn search_items(&self, user_id: Uuid, query: &str) -> ServiceResult<Vec<InventoryItem>> {
        let query = query.trim().to_string();
        if query.is_empty() {
            return self.list_items(user_id).await;
        }
        Ok(blocking(&self.store, move |s| s.search_items(user_id, &query, SEARCH_LIMIT)).await?)
    }

    pub async fn items_by_category(
        &self,
        user_id: Uuid,
        category: &str,
    ) -> ServiceResult<Vec<InventoryItem>> {
        let category = category.to_string();
        Ok(blocking(&self.store, move |s| s.items_by_category(user_id, &category)).await?)
    }

    pub async fn items_by_location(
        &self,
        user_id: Uuid,
        location: &str,
    ) -> ServiceResult<Vec<InventoryItem>> {
        let location = location.to_string();
        Ok(blocking(&self.store, move |s| s.items_by_location(user_id, &location)).await?)
    }

    /// Newest first.
    pub async fn notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
    ) -> ServiceResult<Vec<Notification>> {
        Ok(blocking(&self.store, move |s| {
            s.notifications(user_id, unread_only, NOTIFICATION_LIMIT)
        })
        .await?)
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> ServiceResult<bool> {
        Ok(blocking(&self.store, move |s| s.mark_notification_read(id)).await?)
    }
}
