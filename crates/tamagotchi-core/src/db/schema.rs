use rusqlite::Connection;

use crate::error::Result;

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pets (
            user_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            species TEXT NOT NULL,
            hunger INTEGER NOT NULL DEFAULT 50,
            happiness INTEGER NOT NULL DEFAULT 50,
            health INTEGER NOT NULL DEFAULT 100,
            last_fed TEXT,
            last_played TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pets_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            species TEXT NOT NULL,
            created_at TEXT NOT NULL,
            died_at TEXT NOT NULL,
            lifespan_seconds REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pets_history_user_died
            ON pets_history(user_id, died_at);
        ",
    )?;
    Ok(())
}
