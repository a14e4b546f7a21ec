//! SQLite-backed record store.
//!
//! Layout mirrors the key-value shape of the data: a `kv` table holding
//! one JSON blob per record collection, plus a `reminders` table for
//! pending local reminders. Collection keys round-trip the original
//! field names (`weightRecords`, `dietRecords`, `fastingDuration`).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{data_dir, RecordStore};
use crate::error::StoreError;
use crate::records::{DietRecord, WeightRecord};
use crate::reminders::{Reminder, ReminderScheduler};

const KEY_WEIGHT_RECORDS: &str = "weightRecords";
const KEY_DIET_RECORDS: &str = "dietRecords";
const KEY_FASTING_DURATION: &str = "fastingDuration";

/// SQLite database holding record collections and pending reminders.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/fastwindow.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("fastwindow.db");
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS reminders (
                id      TEXT PRIMARY KEY,
                fire_at TEXT NOT NULL,
                title   TEXT NOT NULL,
                body    TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reminders_fire_at ON reminders(fire_at);",
        )?;
        Ok(())
    }

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Decode a JSON collection, degrading to the default on corrupt or
    /// missing data. Availability wins over integrity signalling here.
    fn load_collection<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.kv_get(key)? {
            Some(json) => Ok(serde_json::from_str(&json).unwrap_or_default()),
            None => Ok(T::default()),
        }
    }

    fn save_collection<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StoreError::QueryFailed(format!("encode {key}: {e}")))?;
        self.kv_set(key, &json)
    }

    /// Pending reminders ordered by fire time.
    pub fn pending_reminders(&self) -> Result<Vec<Reminder>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, fire_at, title, body FROM reminders ORDER BY fire_at")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut reminders = Vec::new();
        for row in rows {
            let (id, fire_at, title, body) = row?;
            let fire_at = DateTime::parse_from_rfc3339(&fire_at)
                .map_err(|e| StoreError::QueryFailed(format!("reminder time: {e}")))?
                .with_timezone(&Utc);
            reminders.push(Reminder {
                id,
                fire_at,
                title,
                body,
            });
        }
        Ok(reminders)
    }
}

impl RecordStore for Database {
    fn load_weight_records(&self) -> Result<Vec<WeightRecord>, StoreError> {
        self.load_collection(KEY_WEIGHT_RECORDS)
    }

    fn save_weight_records(&self, records: &[WeightRecord]) -> Result<(), StoreError> {
        self.save_collection(KEY_WEIGHT_RECORDS, &records)
    }

    fn load_diet_records(&self) -> Result<Vec<DietRecord>, StoreError> {
        self.load_collection(KEY_DIET_RECORDS)
    }

    fn save_diet_records(&self, records: &[DietRecord]) -> Result<(), StoreError> {
        self.save_collection(KEY_DIET_RECORDS, &records)
    }

    fn load_fasting_duration(&self) -> Result<Option<f64>, StoreError> {
        match self.kv_get(KEY_FASTING_DURATION)? {
            Some(raw) => Ok(raw.parse::<f64>().ok()),
            None => Ok(None),
        }
    }

    fn save_fasting_duration(&self, hours: f64) -> Result<(), StoreError> {
        self.kv_set(KEY_FASTING_DURATION, &hours.to_string())
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        self.kv_delete(KEY_WEIGHT_RECORDS)?;
        self.kv_delete(KEY_DIET_RECORDS)?;
        Ok(())
    }

    fn has_data(&self) -> Result<bool, StoreError> {
        Ok(self.kv_get(KEY_WEIGHT_RECORDS)?.is_some() || self.kv_get(KEY_DIET_RECORDS)?.is_some())
    }
}

impl ReminderScheduler for Database {
    fn schedule_at(
        &self,
        id: &str,
        fire_at: DateTime<Utc>,
        title: &str,
        body: &str,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO reminders (id, fire_at, title, body) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 fire_at = excluded.fire_at,
                 title = excluded.title,
                 body = excluded.body",
            params![id, fire_at.to_rfc3339(), title, body],
        )?;
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM reminders", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn weight_records_round_trip() {
        let db = Database::open_memory().unwrap();
        let record = WeightRecord::new(Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap(), 68.2);
        db.save_weight_records(&[record.clone()]).unwrap();
        assert_eq!(db.load_weight_records().unwrap(), vec![record]);
    }

    #[test]
    fn diet_records_round_trip_in_progress_marker() {
        let db = Database::open_memory().unwrap();
        let record =
            DietRecord::in_progress(Utc.with_ymd_and_hms(2024, 3, 14, 8, 0, 0).unwrap());
        db.save_diet_records(&[record.clone()]).unwrap();
        let loaded = db.load_diet_records().unwrap();
        assert_eq!(loaded, vec![record]);
        assert!(loaded[0].is_in_progress());
    }

    #[test]
    fn corrupt_collection_degrades_to_empty() {
        let db = Database::open_memory().unwrap();
        db.kv_set("weightRecords", "{not json").unwrap();
        assert!(db.load_weight_records().unwrap().is_empty());
    }

    #[test]
    fn missing_duration_is_none() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.load_fasting_duration().unwrap(), None);
        db.save_fasting_duration(18.0).unwrap();
        assert_eq!(db.load_fasting_duration().unwrap(), Some(18.0));
    }

    #[test]
    fn clear_all_drops_collections_but_keeps_duration() {
        let db = Database::open_memory().unwrap();
        db.save_weight_records(&[WeightRecord::new(Utc::now(), 68.0)])
            .unwrap();
        db.save_diet_records(&[DietRecord::new(Utc::now(), true)])
            .unwrap();
        db.save_fasting_duration(14.0).unwrap();
        assert!(db.has_data().unwrap());

        db.clear_all().unwrap();
        assert!(!db.has_data().unwrap());
        assert!(db.load_weight_records().unwrap().is_empty());
        assert!(db.load_diet_records().unwrap().is_empty());
        assert_eq!(db.load_fasting_duration().unwrap(), Some(14.0));
    }

    #[test]
    fn reminders_upsert_by_id_and_cancel() {
        let db = Database::open_memory().unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();
        db.schedule_at("fastingEnd", t1, "End", "body").unwrap();
        db.schedule_at("fastingEnd", t2, "End", "body").unwrap();
        db.schedule_at("weightRecord", t1, "Weight", "body").unwrap();

        let pending = db.pending_reminders().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, "weightRecord");
        assert_eq!(pending[1].fire_at, t2);

        db.cancel_all().unwrap();
        assert!(db.pending_reminders().unwrap().is_empty());
    }
}
