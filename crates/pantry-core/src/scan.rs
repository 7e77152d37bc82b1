use chrono::{NaiveDate, TimeDelta, Utc};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use pantry_types::{InventoryItem, NewInventoryItem, NewScanRecord, RecognizedItem, ScanRecord};

use crate::error::{ServiceError, ServiceResult};
use crate::genai::GenerationClient;
use crate::inventory::InventoryService;
use crate::store::{SharedStore, blocking};

/// Recognized items strictly above this confidence go straight into inventory.
pub const AUTO_ADD_CONFIDENCE: f32 = 0.8;
pub const DEFAULT_LOCATION: &str = "Refrigerator";
pub const DEFAULT_UNIT: &str = "pieces";
/// Shelf life assumed when the model gives no usable expiry estimate.
pub const DEFAULT_SHELF_LIFE_DAYS: i64 = 7;
pub const HISTORY_LIMIT: u32 = 20;

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub record: ScanRecord,
    pub added: Vec<InventoryItem>,
}

#[derive(Clone)]
pub struct ScanService {
    store: SharedStore,
    generator: Option<GenerationClient>,
    inventory: InventoryService,
}

impl ScanService {
    pub fn new(store: SharedStore, inventory: InventoryService) -> Self {
        Self {
            store,
            generator: None,
            inventory,
        }
    }

    pub fn with_generator(mut self, client: GenerationClient) -> Self {
        self.generator = Some(client);
        self
    }

    /// Recognize groceries in `description`, record the scan, and add the
    /// confident items to the user's inventory.
    ///
    /// A recognition failure is not an error: it is recorded on the scan
    /// with `success = false`. Only a failure to write the scan record is.
    pub async fn scan(&self, user_id: Uuid, description: &str) -> ServiceResult<ScanOutcome> {
        if description.trim().is_empty() {
            return Err(ServiceError::Invalid("description must not be empty".into()));
        }

        let started = Instant::now();
        let recognized = match &self.generator {
            Some(client) => client
                .try_recognize_items(description)
                .await
                .map_err(|e| e.to_string()),
            None => Err("no generation client configured".to_string()),
        };
        let processing_ms = started.elapsed().as_millis() as u64;

        let new = match recognized {
            Ok(items) => NewScanRecord {
                user_id,
                recognized_items: items,
                processing_ms,
                success: true,
                error: None,
            },
            Err(e) => {
                warn!("Scan for user {} failed: {}", user_id, e);
                NewScanRecord {
                    user_id,
                    recognized_items: Vec::new(),
                    processing_ms,
                    success: false,
                    error: Some(e),
                }
            }
        };
        let record = blocking(&self.store, move |s| s.insert_scan(&new)).await?;

        let today = Utc::now().date_naive();
        let mut added = Vec::new();
        for item in record
            .recognized_items
            .iter()
            .filter(|i| i.confidence > AUTO_ADD_CONFIDENCE)
        {
            match self.inventory.add_item(to_new_item(user_id, item, today)).await {
                Ok(row) => added.push(row),
                Err(e) => warn!("Auto-add of '{}' failed: {}", item.name, e),
            }
        }

        info!(
            "Scan {} for user {}: {} recognized, {} added in {}ms",
            record.id,
            user_id,
            record.recognized_items.len(),
            added.len(),
            record.processing_ms
        );
        Ok(ScanOutcome { record, added })
    }

    /// Past scans, newest first, failed ones included.
    pub async fn history(&self, user_id: Uuid) -> ServiceResult<Vec<ScanRecord>> {
        Ok(blocking(&self.store, move |s| s.recent_scans(user_id, HISTORY_LIMIT)).await?)
    }
}

/// Inventory entry for a recognized item, filling the gaps the model left.
pub fn to_new_item(user_id: Uuid, item: &RecognizedItem, today: NaiveDate) -> NewInventoryItem {
    let expiry_date = item
        .estimated_expiry
        .as_deref()
        .and_then(parse_estimated_expiry)
        .unwrap_or_else(|| today + TimeDelta::days(DEFAULT_SHELF_LIFE_DAYS));

    let quantity = item
        .quantity
        .filter(|q| q.is_finite() && *q >= 1.0)
        .map(|q| q.round().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(1);

    let unit = item
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_UNIT);

    NewInventoryItem {
        user_id,
        name: item.name.trim().to_string(),
        category: item.category.clone(),
        quantity,
        unit: unit.to_string(),
        location: DEFAULT_LOCATION.to_string(),
        expiry_date,
        added_date: today,
        ai_confidence: Some(item.confidence),
        metadata: None,
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part.
fn parse_estimated_expiry(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
