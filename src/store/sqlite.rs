//! SQLite-backed widget storage
//!
//! Durable variant of the store contract. Ids come from the table's
//! AUTOINCREMENT rowid, which SQLite keeps monotonic and never reuses.
//! Batch entries run as individual statements; the batch contract is
//! per-key atomicity, not one transaction.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, WidgetError};
use crate::widget::{StagedWidget, Widget};

use super::WidgetStore;

/// Schema version tracked through `PRAGMA user_version`.
const SCHEMA_VERSION: i32 = 1;

/// Widget table. `z` is deliberately not UNIQUE: a batch mid-application
/// holds a transient duplicate while a displaced record and its replacement
/// coexist.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS widgets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    x INTEGER NOT NULL,
    y INTEGER NOT NULL,
    z INTEGER NOT NULL,
    width REAL NOT NULL,
    height REAL NOT NULL,
    last_modification INTEGER NOT NULL  -- Unix timestamp in milliseconds
);

CREATE INDEX IF NOT EXISTS idx_widgets_z ON widgets(z);
"#;

const WIDGET_COLUMNS: &str = "id, x, y, z, width, height, last_modification";

/// Widget store backed by a SQLite database (thread-safe via Mutex).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("failed to open database at {:?}", path.as_ref()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init()?;
        Ok(store)
    }

    /// Acquire the connection, converting PoisonError to anyhow::Error.
    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))
    }

    fn init(&self) -> Result<()> {
        let conn = self.conn()?;
        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .context("failed to get schema version")?;

        if version < SCHEMA_VERSION {
            conn.execute_batch(SCHEMA)
                .context("failed to create schema")?;
            conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])
                .context("failed to set schema version")?;
            tracing::info!("initialized widget schema version {}", SCHEMA_VERSION);
        }

        Ok(())
    }

    fn widget_from_row(row: &rusqlite::Row) -> rusqlite::Result<Widget> {
        let width: f64 = row.get(4)?;
        let height: f64 = row.get(5)?;
        let modified_ms: i64 = row.get(6)?;
        Ok(Widget {
            id: row.get(0)?,
            x: row.get(1)?,
            y: row.get(2)?,
            z: row.get(3)?,
            width: width as f32,
            height: height as f32,
            last_modification: millis_to_datetime(modified_ms),
        })
    }
}

fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_else(Utc::now)
}

impl WidgetStore for SqliteStore {
    fn get(&self, id: i64) -> Result<Option<Widget>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM widgets WHERE id = ?1",
                WIDGET_COLUMNS
            ))
            .context("failed to prepare widget query")?;

        let widget = stmt
            .query_row(params![id], Self::widget_from_row)
            .optional()
            .context("failed to query widget")?;

        Ok(widget)
    }

    fn get_by_z(&self, z: i64) -> Result<Option<Widget>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM widgets WHERE z = ?1 LIMIT 1",
                WIDGET_COLUMNS
            ))
            .context("failed to prepare widget query by z")?;

        let widget = stmt
            .query_row(params![z], Self::widget_from_row)
            .optional()
            .context("failed to query widget by z")?;

        Ok(widget)
    }

    fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let affected = conn
            .execute("DELETE FROM widgets WHERE id = ?1", params![id])
            .context("failed to delete widget")?;

        if affected == 0 {
            return Err(WidgetError::NotFound);
        }
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Widget>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM widgets", WIDGET_COLUMNS))
            .context("failed to prepare widgets query")?;

        let widgets = stmt
            .query([])
            .context("failed to query widgets")?
            .mapped(Self::widget_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to list widgets")?;

        Ok(widgets)
    }

    fn save_batch(&self, staged: Vec<StagedWidget>) -> Result<HashMap<i64, Widget>> {
        let mut committed = HashMap::with_capacity(staged.len());

        // Lock per entry, not per batch: readers interleave between entries,
        // matching the per-key atomicity contract.
        for entry in staged {
            let now_ms = Utc::now().timestamp_millis();
            let conn = self.conn()?;
            let id = match entry.id {
                Some(id) => {
                    conn.execute(
                        r#"
                        INSERT INTO widgets (id, x, y, z, width, height, last_modification)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                        ON CONFLICT (id) DO UPDATE SET
                            x = ?2, y = ?3, z = ?4,
                            width = ?5, height = ?6, last_modification = ?7
                        "#,
                        params![
                            id,
                            entry.x,
                            entry.y,
                            entry.z,
                            entry.width as f64,
                            entry.height as f64,
                            now_ms
                        ],
                    )
                    .context("failed to upsert widget")?;
                    id
                }
                None => {
                    conn.execute(
                        r#"
                        INSERT INTO widgets (x, y, z, width, height, last_modification)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                        "#,
                        params![
                            entry.x,
                            entry.y,
                            entry.z,
                            entry.width as f64,
                            entry.height as f64,
                            now_ms
                        ],
                    )
                    .context("failed to insert widget")?;
                    conn.last_insert_rowid()
                }
            };

            committed.insert(
                id,
                Widget {
                    id,
                    x: entry.x,
                    y: entry.y,
                    z: entry.z,
                    width: entry.width,
                    height: entry.height,
                    last_modification: millis_to_datetime(now_ms),
                },
            );
        }

        Ok(committed)
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        // AUTOINCREMENT state survives the delete, so ids keep increasing.
        conn.execute("DELETE FROM widgets", [])
            .context("failed to clear widgets")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(z: i64) -> StagedWidget {
        StagedWidget {
            id: None,
            x: 1,
            y: 2,
            z,
            width: 10.5,
            height: 20.0,
        }
    }

    #[test]
    fn test_schema_initializes_once() -> Result<()> {
        let store = SqliteStore::open_in_memory()?;
        let conn = store.conn()?;
        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .context("version query")?;
        assert_eq!(version, SCHEMA_VERSION);
        Ok(())
    }

    #[test]
    fn test_crud_round_trip() -> Result<()> {
        let store = SqliteStore::open_in_memory()?;

        let committed = store.save_batch(vec![staged(3), staged(8)])?;
        assert_eq!(committed.len(), 2);
        assert!(committed.contains_key(&1));
        assert!(committed.contains_key(&2));

        let widget = store.get(1)?.ok_or(WidgetError::NotFound)?;
        assert_eq!(widget.z, 3);
        assert_eq!(widget.width, 10.5);

        let by_z = store.get_by_z(8)?.ok_or(WidgetError::NotFound)?;
        assert_eq!(by_z.id, 2);
        assert!(store.get_by_z(99)?.is_none());

        assert_eq!(store.list_all()?.len(), 2);

        store.delete(1)?;
        assert!(store.get(1)?.is_none());
        assert!(matches!(store.delete(1), Err(WidgetError::NotFound)));
        Ok(())
    }

    #[test]
    fn test_ids_stay_monotonic_across_deletes() -> Result<()> {
        let store = SqliteStore::open_in_memory()?;
        store.save_batch(vec![staged(1)])?;
        store.delete(1)?;
        let committed = store.save_batch(vec![staged(1)])?;
        assert!(committed.contains_key(&2));

        store.clear()?;
        let committed = store.save_batch(vec![staged(1)])?;
        assert!(committed.contains_key(&3));
        Ok(())
    }

    #[test]
    fn test_upsert_replaces_by_id() -> Result<()> {
        let store = SqliteStore::open_in_memory()?;
        store.save_batch(vec![staged(5)])?;

        let moved = StagedWidget {
            id: Some(1),
            x: -40,
            ..staged(6)
        };
        store.save_batch(vec![moved])?;

        let widget = store.get(1)?.ok_or(WidgetError::NotFound)?;
        assert_eq!(widget.x, -40);
        assert_eq!(widget.z, 6);
        assert_eq!(store.list_all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_timestamps_round_trip_through_millis() -> Result<()> {
        let store = SqliteStore::open_in_memory()?;
        let committed = store.save_batch(vec![staged(1)])?;
        let written = committed.get(&1).ok_or(WidgetError::NotFound)?;

        let read_back = store.get(1)?.ok_or(WidgetError::NotFound)?;
        assert_eq!(read_back.last_modification, written.last_modification);
        Ok(())
    }
}
