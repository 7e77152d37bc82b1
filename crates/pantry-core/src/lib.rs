//! Pantry domain services: expiry notifications, recipe suggestions, a
//! per-user recipe book, dashboard stats and grocery scans over a pluggable [`store::PantryStore`].

pub mod error;
pub mod expiry;
pub mod genai;
pub mod inventory;
pub mod matching;
pub mod recipe_book;
pub mod scan;
pub mod scheduler;
pub mod stats;
pub mod store;
pub mod suggestions;

#[cfg(test)]
mod memory;

pub use error::{ServiceError, ServiceResult};
pub use genai::{GenerationClient, GenerationError};
pub use inventory::InventoryService;
pub use recipe_book::RecipeBook;
pub use scan::{ScanOutcome, ScanService};
pub use scheduler::{ExpiryScheduler, ScheduleReport};
pub use stats::StatsAggregator;
pub use store::{PantryStore, SharedStore};
pub use suggestions::SuggestionEngine;

/// All services wired to one store.
#[derive(Clone)]
pub struct Pantry {
    pub inventory: InventoryService,
    pub scheduler: ExpiryScheduler,
    pub suggestions: SuggestionEngine,
    pub recipes: RecipeBook,
    pub stats: StatsAggregator,
    pub scans: ScanService,
}

impl Pantry {
    /// `generator` enables scans and recipe import. `phrase_notifications`
    /// additionally routes expiry notification text through it.
    pub fn new(
        store: SharedStore,
        generator: Option<GenerationClient>,
        phrase_notifications: bool,
    ) -> Self {
        let mut scheduler = ExpiryScheduler::new(store.clone());
        let mut suggestions = SuggestionEngine::new(store.clone());
        if let Some(client) = &generator {
            if phrase_notifications {
                scheduler = scheduler.with_phrasing(client.clone());
            }
            suggestions = suggestions.with_generator(client.clone());
        }

        let inventory = InventoryService::new(store.clone(), scheduler.clone());
        let mut scans = ScanService::new(store.clone(), inventory.clone());
        if let Some(client) = generator {
            scans = scans.with_generator(client);
        }

        Self {
            inventory,
            scheduler,
            suggestions,
            recipes: RecipeBook::new(store.clone()),
            stats: StatsAggregator::new(store),
            scans,
        }
    }
}
