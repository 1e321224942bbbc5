use super::{sort_records, Mutator, Record, Store};
use crate::error::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// Open `<data_dir>/calex.db` and make sure the record table exists.
pub fn open_connection(data_dir: &Path) -> Result<Arc<Mutex<Connection>>> {
    std::fs::create_dir_all(data_dir)?;
    let conn = Connection::open(data_dir.join("calex.db"))?;
    configure(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// In-memory database, for tests.
pub fn open_in_memory() -> Result<Arc<Mutex<Connection>>> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous  = NORMAL;
         PRAGMA temp_store   = MEMORY;

         CREATE TABLE IF NOT EXISTS records (
             collection  TEXT NOT NULL,
             id          TEXT NOT NULL,
             body        TEXT NOT NULL,
             PRIMARY KEY (collection, id)
         );",
    )?;
    Ok(())
}

/// SQLite-backed collection. All collections share one connection and the
/// `records` table, partitioned by [`Record::COLLECTION`]; bodies are the
/// record's JSON.
pub struct SqliteStore<T> {
    conn: Arc<Mutex<Connection>>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> SqliteStore<T> {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }

    fn upsert(conn: &Connection, record: &T) -> Result<()> {
        let body = serde_json::to_string(record)?;
        conn.execute(
            "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body",
            params![T::COLLECTION, record.id(), body],
        )?;
        Ok(())
    }

    fn fetch(conn: &Connection, id: &str) -> Result<Option<T>> {
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM records WHERE collection = ?1 AND id = ?2",
                params![T::COLLECTION, id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body.and_then(|body| Self::decode(id, &body)))
    }

    /// Unreadable rows are skipped, never rewritten.
    fn decode(id: &str, body: &str) -> Option<T> {
        match serde_json::from_str(body) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(collection = T::COLLECTION, id, "Skipping unreadable record: {e}");
                None
            }
        }
    }
}

impl<T: Record> Store<T> for SqliteStore<T> {
    fn get(&self, id: &str) -> Result<Option<T>> {
        let conn = self.conn.lock();
        Self::fetch(&conn, id)
    }

    fn put(&self, record: T) -> Result<()> {
        let conn = self.conn.lock();
        Self::upsert(&conn, &record)
    }

    fn put_many(&self, records: Vec<T>) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for record in &records {
            Self::upsert(&tx, record)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<Option<T>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let existing = Self::fetch(&tx, id)?;
        if existing.is_some() {
            tx.execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2",
                params![T::COLLECTION, id],
            )?;
        }
        tx.commit()?;
        Ok(existing)
    }

    fn list(&self) -> Result<Vec<T>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, body FROM records WHERE collection = ?1")?;
        let rows = stmt
            .query_map(params![T::COLLECTION], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<(String, String)>>>()?;

        let mut records: Vec<T> = rows
            .iter()
            .filter_map(|(id, body)| Self::decode(id, body))
            .collect();
        sort_records(&mut records);
        Ok(records)
    }

    fn update(&self, id: &str, mutate: Mutator<'_, T>) -> Result<Option<T>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let Some(mut record) = Self::fetch(&tx, id)? else {
            return Ok(None);
        };
        // An error here drops `tx`, which rolls back.
        mutate(&mut record)?;
        Self::upsert(&tx, &record)?;
        tx.commit()?;
        Ok(Some(record))
    }
}
