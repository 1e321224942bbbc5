use super::{sort_records, Mutator, Record, Store};
use crate::error::Result;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Whole-file JSON collection: `<data_dir>/<collection>.json`, an object
/// mapping id to record.
///
/// Every operation loads the file, works on the map and (for writes) saves it
/// back while holding the collection lock, so read-modify-write cycles from
/// concurrent requests are serialized. Saves go through a sibling temp file
/// and a rename.
///
/// The file is held as raw JSON values and each record is decoded on its
/// own. A record that does not decode is skipped with a warning and written
/// back untouched on the next save.
pub struct JsonStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

type RawCollection = BTreeMap<String, Value>;

impl<T: Record> JsonStore<T> {
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(format!("{}.json", T::COLLECTION)),
            lock: Mutex::new(()),
            _record: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty collection. A file that is not a JSON
    /// object is copied to `<collection>.json.corrupt` and read as empty.
    fn load(&self) -> RawCollection {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return RawCollection::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Error loading collection: {e}");
                return RawCollection::new();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(records) => records,
            Err(e) => {
                let backup = self.path.with_extension("json.corrupt");
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "Error parsing collection: {e}"
                );
                if let Err(e) = std::fs::write(&backup, &raw) {
                    tracing::warn!(backup = %backup.display(), "Could not keep corrupt collection: {e}");
                }
                RawCollection::new()
            }
        }
    }

    fn save(&self, records: &RawCollection) -> Result<()> {
        let body = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn decode(&self, id: &str, value: &Value) -> Option<T> {
        match T::deserialize(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    collection = T::COLLECTION,
                    id,
                    "Skipping unreadable record: {e}"
                );
                None
            }
        }
    }
}

impl<T: Record> Store<T> for JsonStore<T> {
    fn get(&self, id: &str) -> Result<Option<T>> {
        let _guard = self.lock.lock();
        let records = self.load();
        Ok(records.get(id).and_then(|value| self.decode(id, value)))
    }

    fn put(&self, record: T) -> Result<()> {
        let _guard = self.lock.lock();
        let mut records = self.load();
        records.insert(record.id().to_string(), serde_json::to_value(&record)?);
        self.save(&records)
    }

    fn put_many(&self, batch: Vec<T>) -> Result<()> {
        let _guard = self.lock.lock();
        let mut records = self.load();
        for record in batch {
            records.insert(record.id().to_string(), serde_json::to_value(&record)?);
        }
        self.save(&records)
    }

    /// Unreadable records are left in place and reported as unknown.
    fn delete(&self, id: &str) -> Result<Option<T>> {
        let _guard = self.lock.lock();
        let mut records = self.load();
        let Some(removed) = records.get(id).and_then(|value| self.decode(id, value)) else {
            return Ok(None);
        };
        records.remove(id);
        self.save(&records)?;
        Ok(Some(removed))
    }

    fn list(&self) -> Result<Vec<T>> {
        let _guard = self.lock.lock();
        let mut records: Vec<T> = self
            .load()
            .iter()
            .filter_map(|(id, value)| self.decode(id, value))
            .collect();
        sort_records(&mut records);
        Ok(records)
    }

    fn update(&self, id: &str, mutate: Mutator<'_, T>) -> Result<Option<T>> {
        let _guard = self.lock.lock();
        let mut records = self.load();
        let Some(mut next) = records.get(id).and_then(|value| self.decode(id, value)) else {
            return Ok(None);
        };
        mutate(&mut next)?;
        records.insert(id.to_string(), serde_json::to_value(&next)?);
        self.save(&records)?;
        Ok(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::Goal;
    use crate::store::testing::{exercise, note, Note};
    use std::sync::Arc;

    #[test]
    fn behaves_like_a_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Note>::open(dir.path()).unwrap();
        exercise(&store);
        assert!(dir.path().join("notes.json").exists());
        assert!(!dir.path().join("notes.json.tmp").exists());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonStore::<Note>::open(dir.path()).unwrap();
            store.put(note("keep", 0)).unwrap();
        }
        let store = JsonStore::<Note>::open(dir.path()).unwrap();
        assert_eq!(store.get("keep").unwrap().unwrap().body, "body of keep");
    }

    #[test]
    fn file_is_an_object_keyed_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Note>::open(dir.path()).unwrap();
        store.put(note("n1", 0)).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["n1"]["id"], "n1");
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_kept_aside() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.json"), b"{ not json").unwrap();
        let store = JsonStore::<Note>::open(dir.path()).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(store.get("anything").unwrap().is_none());
        assert_eq!(
            std::fs::read(dir.path().join("notes.json.corrupt")).unwrap(),
            b"{ not json"
        );

        store.put(note("fresh", 0)).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn unreadable_record_survives_writes() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Note>::open(dir.path()).unwrap();
        store.put(note("good", 0)).unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        raw["broken"] = serde_json::json!({ "id": "broken", "hits": "many" });
        std::fs::write(store.path(), raw.to_string()).unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert!(store.get("broken").unwrap().is_none());
        assert!(store.delete("broken").unwrap().is_none());

        store.put(note("other", 0)).unwrap();
        store
            .update("good", &mut |n: &mut Note| {
                n.hits = 3;
                Ok(())
            })
            .unwrap();

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk["broken"]["hits"], "many");
        assert_eq!(on_disk["good"]["hits"], 3);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn reads_goals_with_naive_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("goals.json"),
            r#"{
                "g-old": {
                    "id": "g-old",
                    "title": "Legacy goal",
                    "description": "",
                    "priority": "high",
                    "status": "active",
                    "project_id": "p1",
                    "created_at": "2024-05-01T10:00:00.123456",
                    "updated_at": "2024-05-01T10:00:00",
                    "progress": 0
                }
            }"#,
        )
        .unwrap();
        let store = JsonStore::<Goal>::open(dir.path()).unwrap();

        let old = store.get("g-old").unwrap().unwrap();
        assert_eq!(old.title, "Legacy goal");
        assert_eq!(old.created_at.timestamp_subsec_micros(), 123_456);

        let mut fresh = old.clone();
        fresh.id = "g-new".into();
        store.put(fresh).unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|g| g.id).collect();
        assert!(ids.contains(&"g-old".to_string()));
        assert!(ids.contains(&"g-new".to_string()));
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::<Note>::open(dir.path()).unwrap());
        store.put(note("counter", 0)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        store
                            .update("counter", &mut |n: &mut Note| {
                                n.hits += 1;
                                Ok(())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("counter").unwrap().unwrap().hits, 80);
    }
}
