use super::{sort_records, Mutator, Record, Store};
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Process-local collection. Nothing is persisted.
pub struct MemoryStore<T> {
    records: RwLock<BTreeMap<String, T>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Store<T> for MemoryStore<T> {
    fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.records.read().get(id).cloned())
    }

    fn put(&self, record: T) -> Result<()> {
        self.records.write().insert(record.id().to_string(), record);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<Option<T>> {
        Ok(self.records.write().remove(id))
    }

    fn list(&self) -> Result<Vec<T>> {
        let mut records: Vec<T> = self.records.read().values().cloned().collect();
        sort_records(&mut records);
        Ok(records)
    }

    fn update(&self, id: &str, mutate: Mutator<'_, T>) -> Result<Option<T>> {
        let mut records = self.records.write();
        let Some(slot) = records.get_mut(id) else {
            return Ok(None);
        };
        // Mutate a copy so a failed mutation leaves the stored record alone.
        let mut next = slot.clone();
        mutate(&mut next)?;
        *slot = next.clone();
        Ok(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{exercise, Note};

    #[test]
    fn behaves_like_a_store() {
        exercise(&MemoryStore::<Note>::new());
    }
}
