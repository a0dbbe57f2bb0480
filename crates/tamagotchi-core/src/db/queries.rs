use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row, ToSql};

use crate::error::Result;
use crate::models::*;

impl ToSql for Species {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Species {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

const PET_COLUMNS: &str =
    "user_id, name, species, hunger, happiness, health, last_fed, last_played, created_at";

const HISTORY_COLUMNS: &str =
    "id, user_id, name, species, created_at, died_at, lifespan_seconds";

fn pet_from_row(row: &Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        user_id: row.get(0)?,
        name: row.get(1)?,
        species: row.get(2)?,
        hunger: row.get(3)?,
        happiness: row.get(4)?,
        health: row.get(5)?,
        last_fed: row.get(6)?,
        last_played: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<PetHistoryEntry> {
    Ok(PetHistoryEntry {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        created_at: row.get(4)?,
        died_at: row.get(5)?,
        lifespan_seconds: row.get(6)?,
    })
}

/// Database wrapper with CRUD operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a SQLite database at the given path.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        crate::db::schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::db::schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction for a read-modify-write sequence.
    pub fn begin_transaction(&self) -> Result<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    /// Commit the current transaction.
    pub fn commit_transaction(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Rollback the current transaction.
    pub fn rollback_transaction(&self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    /// Run `f` inside a transaction, rolling back if it fails.
    pub fn with_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        self.begin_transaction()?;
        match f(self) {
            Ok(value) => {
                self.commit_transaction()?;
                Ok(value)
            }
            Err(e) => {
                let _ = self.rollback_transaction();
                Err(e)
            }
        }
    }

    // === Live pets ===

    /// Insert a new live pet. Fails on a primary-key conflict.
    pub fn insert_pet(&self, pet: &Pet) -> Result<()> {
        self.conn.execute(
            "INSERT INTO pets (user_id, name, species, hunger, happiness, health,
                               last_fed, last_played, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                pet.user_id,
                pet.name,
                pet.species,
                pet.hunger,
                pet.happiness,
                pet.health,
                pet.last_fed,
                pet.last_played,
                pet.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get the live pet for a user.
    pub fn get_pet(&self, user_id: i64) -> Result<Option<Pet>> {
        let sql = format!("SELECT {} FROM pets WHERE user_id = ?1", PET_COLUMNS);
        let result = self.conn.query_row(&sql, params![user_id], pet_from_row);

        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write stats (and any set action clocks) back to a live pet.
    /// Returns false if the user has no live pet.
    pub fn update_pet(&self, user_id: i64, update: &PetUpdate) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE pets SET hunger = ?1, happiness = ?2, health = ?3,
                    last_fed = COALESCE(?4, last_fed),
                    last_played = COALESCE(?5, last_played)
             WHERE user_id = ?6",
            params![
                update.hunger,
                update.happiness,
                update.health,
                update.last_fed,
                update.last_played,
                user_id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a user's live pet. Returns false if there was none.
    pub fn delete_pet(&self, user_id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM pets WHERE user_id = ?1", params![user_id])?;
        Ok(changed > 0)
    }

    /// Count live pets.
    pub fn live_pet_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pets", [], |row| row.get(0))?;
        Ok(count)
    }

    // === History ===

    /// Append a history entry. Returns the new row ID.
    pub fn insert_history(&self, entry: &PetHistoryEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO pets_history (user_id, name, species, created_at, died_at, lifespan_seconds)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.user_id,
                entry.name,
                entry.species,
                entry.created_at,
                entry.died_at,
                entry.lifespan_seconds,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a user's dead pets, most recent death first.
    pub fn get_history(&self, user_id: i64) -> Result<Vec<PetHistoryEntry>> {
        let sql = format!(
            "SELECT {} FROM pets_history WHERE user_id = ?1 ORDER BY died_at DESC, id DESC",
            HISTORY_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![user_id], history_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Get a user's most recent death, if any.
    pub fn get_last_death(&self, user_id: i64) -> Result<Option<PetHistoryEntry>> {
        let sql = format!(
            "SELECT {} FROM pets_history WHERE user_id = ?1 ORDER BY died_at DESC, id DESC LIMIT 1",
            HISTORY_COLUMNS
        );
        let result = self.conn.query_row(&sql, params![user_id], history_from_row);

        match result {
            Ok(h) => Ok(Some(h)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Move a live pet into history. The caller owns the transaction.
    pub fn archive_pet(&self, pet: &Pet, died_at: NaiveDateTime) -> Result<PetHistoryEntry> {
        let mut entry = PetHistoryEntry::new(
            pet.user_id,
            pet.name.clone(),
            pet.species,
            pet.created_at,
            died_at,
        );
        entry.id = Some(self.insert_history(&entry)?);
        self.delete_pet(pet.user_id)?;
        Ok(entry)
    }
}
