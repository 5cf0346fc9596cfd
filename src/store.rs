use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{AppError, AppResult};
use crate::types::{Category, Event, EventInput};

const LAST_NOTIFY_RUN_KEY: &str = "last_notify_run";

/// SQLite-backed event table
pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let store = EventStore {
            conn: Connection::open(path)?,
        };
        store.init_tables()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> AppResult<Self> {
        let store = EventStore {
            conn: Connection::open_in_memory()?,
        };
        store.init_tables()?;
        Ok(store)
    }

    fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<Event> {
        let category: Option<String> = row.get(4)?;
        Ok(Event {
            id: row.get(0)?,
            title: row.get(1)?,
            date: row.get(2)?,
            image: row.get(3)?,
            category: Category::from_tag(category.as_deref().unwrap_or_default()),
            show_notification: row.get(5)?,
            notify_100_days: row.get(6)?,
            notify_yearly: row.get(7)?,
            order: row.get(8)?,
        })
    }

    fn init_tables(&self) -> AppResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                image TEXT,
                category TEXT,
                show_notification INTEGER NOT NULL DEFAULT 0,
                notify_100_days INTEGER NOT NULL DEFAULT 1,
                notify_yearly INTEGER NOT NULL DEFAULT 1,
                \"order\" INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert a new event at the end of the list
    pub fn insert(&self, input: &EventInput) -> AppResult<Event> {
        let next_order: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(\"order\") + 1, 0) FROM events",
            [],
            |row| row.get(0),
        )?;

        self.conn.execute(
            "INSERT INTO events (title, date, image, category, show_notification, notify_100_days, notify_yearly, \"order\")
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                input.title,
                input.date,
                input.image,
                input.category.tag(),
                input.show_notification,
                input.notify_100_days,
                input.notify_yearly,
                next_order,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, title = %input.title, "event created");
        self.get(id)
    }

    pub fn get(&self, id: i64) -> AppResult<Event> {
        self.conn
            .query_row(
                "SELECT id, title, date, image, category, show_notification, notify_100_days, notify_yearly, \"order\"
                 FROM events WHERE id = ?1",
                params![id],
                Self::row_to_event,
            )
            .optional()?
            .ok_or(AppError::EventNotFound(id))
    }

    /// Replace every field except id and order
    pub fn update(&self, id: i64, input: &EventInput) -> AppResult<Event> {
        let changed = self.conn.execute(
            "UPDATE events SET title = ?1, date = ?2, image = ?3, category = ?4,
                 show_notification = ?5, notify_100_days = ?6, notify_yearly = ?7
             WHERE id = ?8",
            params![
                input.title,
                input.date,
                input.image,
                input.category.tag(),
                input.show_notification,
                input.notify_100_days,
                input.notify_yearly,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(AppError::EventNotFound(id));
        }
        tracing::info!(id, "event updated");
        self.get(id)
    }

    /// Delete an event permanently, returning what was removed
    pub fn delete(&self, id: i64) -> AppResult<Event> {
        let event = self.get(id)?;
        self.conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
        tracing::info!(id, "event deleted");
        Ok(event)
    }

    /// All events in display order
    pub fn list_all(&self) -> AppResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, date, image, category, show_notification, notify_100_days, notify_yearly, \"order\"
             FROM events ORDER BY \"order\" ASC, id ASC",
        )?;

        let events = stmt
            .query_map([], Self::row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Give `ids` the orders 0, 1, 2, ...; events not listed keep their order
    /// after the listed ones
    pub fn reorder(&mut self, ids: &[i64]) -> AppResult<()> {
        let tx = self.conn.transaction()?;
        let listed = ids.len() as i64;

        for (position, id) in ids.iter().enumerate() {
            let changed = tx.execute(
                "UPDATE events SET \"order\" = ?1 WHERE id = ?2",
                params![position as i64, id],
            )?;
            if changed == 0 {
                return Err(AppError::EventNotFound(*id));
            }
        }

        // Push the rest behind the listed block, keeping their relative order
        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = if ids.is_empty() {
            "UPDATE events SET \"order\" = \"order\" + ?1".to_string()
        } else {
            format!("UPDATE events SET \"order\" = \"order\" + ?1 WHERE id NOT IN ({placeholders})")
        };
        let mut values: Vec<i64> = vec![listed];
        values.extend_from_slice(ids);
        tx.execute(&sql, rusqlite::params_from_iter(values))?;

        tx.commit()?;
        tracing::info!(count = ids.len(), "events reordered");
        Ok(())
    }

    /// Day the notification job last completed
    pub fn last_notify_run(&self) -> AppResult<Option<NaiveDate>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![LAST_NOTIFY_RUN_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value.and_then(|v| match NaiveDate::parse_from_str(&v, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(value = %v, error = %e, "ignoring corrupt last run date");
                None
            }
        }))
    }

    pub fn set_last_notify_run(&self, date: NaiveDate) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![LAST_NOTIFY_RUN_KEY, date.format("%Y-%m-%d").to_string()],
        )?;
        Ok(())
    }
}
