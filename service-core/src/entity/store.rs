use super::{Entity, StoreError};
use std::sync::{PoisonError, RwLock};

/// Append-only, ordered collection of records for one entity type.
///
/// Ids are `len + 1` at insertion time. The length is read and the record
/// appended under the same write guard, so concurrent inserts never share an
/// id. Records are never updated or removed, which keeps the contents
/// consistent even if a writer panicked while holding the lock.
#[derive(Debug)]
pub struct EntityStore<E> {
    records: RwLock<Vec<E>>,
}

impl<E: Entity> EntityStore<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// All records in insertion order.
    pub fn list_all(&self) -> Vec<E> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up a record by id. Ids below 1 are never assigned.
    pub fn get(&self, id: i64) -> Result<E, StoreError> {
        let wanted = u64::try_from(id).ok();
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| Some(record.id()) == wanted)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: E::NAME,
                id,
            })
    }

    /// Assign the next id, append the record and return it.
    pub fn insert(&self, input: E::Create) -> E {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let id = records.len() as u64 + 1;
        let record = E::from_create(id, input);
        records.push(record.clone());
        record
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}
