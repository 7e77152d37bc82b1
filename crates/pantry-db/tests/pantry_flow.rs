//! Services from pantry-core running against the SQLite store.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use pantry_core::Pantry;
use pantry_core::store::{PantryStore, SharedStore};
use pantry_db::Database;
use pantry_db::seed::{self, DEMO_USER_ID};
use pantry_types::{NotificationKind, Priority};

fn seeded() -> (Arc<Database>, Pantry) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    seed::ensure_seeded(&db, Utc::now().date_naive()).unwrap();
    let store: SharedStore = db.clone();
    (db, Pantry::new(store, None, false))
}

#[tokio::test]
async fn demo_inventory_schedules_two_warnings() {
    let (db, pantry) = seeded();

    let first = pantry.scheduler.schedule_now(DEMO_USER_ID).await;
    let second = pantry.scheduler.schedule_now(DEMO_USER_ID).await;

    // spinach (1 day) and bananas (2 days) are inside the alert window
    assert_eq!(first.examined, 4);
    assert_eq!(first.created, 2);
    assert_eq!(first.not_due, 2);
    assert_eq!(second.created, 0);
    assert_eq!(second.already_notified, 2);

    let notifications = db.notifications(DEMO_USER_ID, true, 50).unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.kind == NotificationKind::ExpiryWarning));
    let spinach = notifications
        .iter()
        .find(|n| n.body.contains("Fresh Spinach"))
        .unwrap();
    assert_eq!(spinach.priority, Priority::High);
    assert_eq!(spinach.body, "Your Fresh Spinach expires in 1 day. Consider using it soon!");
}

#[tokio::test]
async fn demo_stats() {
    let (_db, pantry) = seeded();

    let stats = pantry.stats.compute_now(DEMO_USER_ID).await;

    assert_eq!(stats.total_items, 4);
    assert_eq!(stats.expiring_items, 2);
    assert_eq!(stats.recent_scans, 0);
    assert_eq!((stats.waste_reduced, stats.money_saved), (85, 127));
}

#[tokio::test]
async fn demo_suggestions_from_inventory() {
    let (_db, pantry) = seeded();

    let saved = pantry.suggestions.generate_from_inventory(DEMO_USER_ID).await;

    // Greek yogurt and fresh spinach match 2 of 5 lines in both breakfast
    // recipes. "Organic Bananas" is not a substring of "2 bananas".
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|s| s.score == 40 && s.matched_count == 2));

    let listed = pantry.suggestions.list(DEMO_USER_ID).await.unwrap();
    let mut names: Vec<&str> = listed.iter().map(|s| s.recipe.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Banana Spinach Smoothie", "Spinach and Yogurt Parfait"]);
}

#[tokio::test]
async fn explicit_ingredients_rank_by_score() {
    let (_db, pantry) = seeded();

    let saved = pantry
        .suggestions
        .generate(
            DEMO_USER_ID,
            vec!["banana".into(), "spinach".into(), "yogurt".into(), "honey".into()],
        )
        .await;

    // smoothie 4/5, parfait 3/5, banana bread 1/7 (below threshold)
    let scores: Vec<u8> = saved.iter().map(|s| s.score).collect();
    assert_eq!(scores, vec![80, 60]);
}

#[tokio::test]
async fn adding_and_consuming_through_the_service() {
    let (db, pantry) = seeded();
    let today = Utc::now().date_naive();

    let mut milk = seed::demo_items(today).remove(0);
    milk.name = "Whole Milk".into();
    milk.expiry_date = today;
    let added = pantry.inventory.add_item(milk).await.unwrap();

    let unread = pantry.inventory.notifications(DEMO_USER_ID, true).await.unwrap();
    let for_milk = unread.iter().find(|n| n.item_id == added.id).unwrap();
    assert_eq!(for_milk.title, "Item Expired");

    assert!(pantry.inventory.consume_item(added.id).await.unwrap());
    assert_eq!(db.count_active_items(DEMO_USER_ID).unwrap(), 4);

    let in_week = today + TimeDelta::days(7);
    assert!(db
        .items_expiring_by(DEMO_USER_ID, in_week)
        .unwrap()
        .iter()
        .all(|i| i.id != added.id));
}

#[tokio::test]
async fn scan_without_provider_is_recorded() {
    let (db, pantry) = seeded();

    let outcome = pantry.scans.scan(DEMO_USER_ID, "a carton of eggs").await.unwrap();

    assert!(!outcome.record.success);
    assert!(outcome.added.is_empty());
    let since = Utc::now() - TimeDelta::minutes(1);
    assert_eq!(db.count_scans_since(DEMO_USER_ID, since).unwrap(), 1);
}
