use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub const SCHEMA_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE inventory_items (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL,
                name            TEXT NOT NULL,
                category        TEXT NOT NULL,
                quantity        INTEGER NOT NULL DEFAULT 1,
                unit            TEXT NOT NULL,
                location        TEXT NOT NULL,
                expiry_date     TEXT NOT NULL,
                added_date      TEXT NOT NULL,
                is_consumed     INTEGER NOT NULL DEFAULT 0,
                ai_confidence   REAL,
                metadata        TEXT,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE INDEX idx_items_user_expiry
                ON inventory_items(user_id, is_consumed, expiry_date);

            CREATE TABLE notifications (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL,
                item_id         TEXT NOT NULL REFERENCES inventory_items(id) ON DELETE CASCADE,
                kind            TEXT NOT NULL,
                title           TEXT NOT NULL,
                body            TEXT NOT NULL,
                priority        TEXT NOT NULL,
                is_read         INTEGER NOT NULL DEFAULT 0,
                scheduled_for   TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_notifications_item
                ON notifications(user_id, item_id, kind, is_read);

            CREATE TABLE recipes (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                description     TEXT,
                ingredients     TEXT NOT NULL,
                instructions    TEXT NOT NULL,
                prep_minutes    INTEGER NOT NULL DEFAULT 0,
                cook_minutes    INTEGER NOT NULL DEFAULT 0,
                servings        INTEGER NOT NULL DEFAULT 1,
                difficulty      TEXT NOT NULL,
                cuisine         TEXT,
                tags            TEXT NOT NULL DEFAULT '[]',
                nutrition       TEXT,
                source          TEXT NOT NULL,
                is_public       INTEGER NOT NULL DEFAULT 1,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_recipes_public ON recipes(is_public, created_at);

            CREATE TABLE recipe_suggestions (
                id                  TEXT PRIMARY KEY,
                user_id             TEXT NOT NULL,
                recipe_id           TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                matched_ingredients TEXT NOT NULL,
                score               INTEGER NOT NULL,
                matched_count       INTEGER NOT NULL,
                total_count         INTEGER NOT NULL,
                is_viewed           INTEGER NOT NULL DEFAULT 0,
                is_accepted         INTEGER NOT NULL DEFAULT 0,
                suggested_at        TEXT NOT NULL
            );

            CREATE INDEX idx_suggestions_user
                ON recipe_suggestions(user_id, is_viewed, score);

            CREATE TABLE user_recipes (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL,
                recipe_id       TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                rating          INTEGER,
                notes           TEXT,
                is_favorite     INTEGER NOT NULL DEFAULT 0,
                times_cooked    INTEGER NOT NULL DEFAULT 0,
                last_made       TEXT,
                saved_at        TEXT NOT NULL,
                UNIQUE (user_id, recipe_id)
            );

            CREATE INDEX idx_user_recipes_recipe ON user_recipes(recipe_id, rating);

            CREATE TABLE scans (
                id                  TEXT PRIMARY KEY,
                user_id             TEXT NOT NULL,
                recognized_items    TEXT NOT NULL,
                processing_ms       INTEGER NOT NULL,
                success             INTEGER NOT NULL,
                error               TEXT,
                scanned_at          TEXT NOT NULL
            );

            CREATE INDEX idx_scans_user ON scans(user_id, scanned_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete (schema v{})", SCHEMA_VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }
}
