//! Record storage.
//!
//! Every collection (projects, goals, insights, files) is reached through the
//! object-safe [`Store`] trait so handlers never touch the disk layout
//! directly. Three backends are provided:
//!
//! - [`json::JsonStore`] - one pretty-printed `<collection>.json` per collection
//! - [`sqlite::SqliteStore`] - a single `calex.db` shared by all collections
//! - [`memory::MemoryStore`] - process-local maps, used in tests
//!
//! `update` is the only way to mutate a stored record in place; each backend
//! runs it as one atomic read-modify-write.

pub mod json;
pub mod memory;
pub mod sqlite;
pub mod timestamp;

use crate::config::StorageBackend;
use crate::error::Result;
use crate::files::FileRecord;
use crate::research::{Goal, Insight, Project};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub use json::JsonStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A record that can live in a [`Store`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name; also the JSON file stem and the sqlite partition key.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;
}

pub type Mutator<'a, T> = &'a mut dyn FnMut(&mut T) -> Result<()>;

/// Keyed record storage for one collection.
pub trait Store<T: Record>: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<T>>;

    /// Insert or overwrite the record stored under `record.id()`.
    fn put(&self, record: T) -> Result<()>;

    /// Insert several records with a single write.
    fn put_many(&self, records: Vec<T>) -> Result<()> {
        for record in records {
            self.put(record)?;
        }
        Ok(())
    }

    /// Remove and return the record, or `None` if the id is unknown.
    fn delete(&self, id: &str) -> Result<Option<T>>;

    /// All records, oldest first.
    fn list(&self) -> Result<Vec<T>>;

    /// Apply `mutate` to the stored record and persist it.
    ///
    /// Returns `Ok(None)` when the id is unknown. If `mutate` fails nothing
    /// is written.
    fn update(&self, id: &str, mutate: Mutator<'_, T>) -> Result<Option<T>>;

    fn list_where(&self, keep: &dyn Fn(&T) -> bool) -> Result<Vec<T>> {
        Ok(self.list()?.into_iter().filter(|r| keep(r)).collect())
    }
}

/// Sort by creation time, falling back to id for equal timestamps.
pub(crate) fn sort_records<T: Record>(records: &mut [T]) {
    records.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// The four collections the service works with.
#[derive(Clone)]
pub struct Stores {
    pub projects: Arc<dyn Store<Project>>,
    pub goals: Arc<dyn Store<Goal>>,
    pub insights: Arc<dyn Store<Insight>>,
    pub files: Arc<dyn Store<FileRecord>>,
}

impl Stores {
    /// Open every collection on the configured backend under `data_dir`.
    pub fn open(backend: StorageBackend, data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let stores = match backend {
            StorageBackend::Json => Self {
                projects: Arc::new(JsonStore::open(data_dir)?),
                goals: Arc::new(JsonStore::open(data_dir)?),
                insights: Arc::new(JsonStore::open(data_dir)?),
                files: Arc::new(JsonStore::open(data_dir)?),
            },
            StorageBackend::Sqlite => {
                let conn = sqlite::open_connection(data_dir)?;
                Self {
                    projects: Arc::new(SqliteStore::new(Arc::clone(&conn))),
                    goals: Arc::new(SqliteStore::new(Arc::clone(&conn))),
                    insights: Arc::new(SqliteStore::new(Arc::clone(&conn))),
                    files: Arc::new(SqliteStore::new(conn)),
                }
            }
            StorageBackend::Memory => Self::in_memory(),
        };
        tracing::info!(backend = ?backend, data_dir = %data_dir.display(), "Stores opened");
        Ok(stores)
    }

    pub fn in_memory() -> Self {
        Self {
            projects: Arc::new(MemoryStore::new()),
            goals: Arc::new(MemoryStore::new()),
            insights: Arc::new(MemoryStore::new()),
            files: Arc::new(MemoryStore::new()),
        }
    }
}
