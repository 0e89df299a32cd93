use super::{Entity, EntityStore, StoreError};
use std::sync::Arc;

/// Request-facing operations over a shared [`EntityStore`].
///
/// Cheap to clone; every clone sees the same store.
pub struct EntityService<E> {
    store: Arc<EntityStore<E>>,
}

impl<E: Entity> EntityService<E> {
    pub fn new() -> Self {
        Self::with_store(Arc::new(EntityStore::new()))
    }

    pub fn with_store(store: Arc<EntityStore<E>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<EntityStore<E>> {
        &self.store
    }

    pub fn list_records(&self) -> Vec<E> {
        self.store.list_all()
    }

    pub fn get_record(&self, id: i64) -> Result<E, StoreError> {
        self.store.get(id).inspect_err(|_| {
            tracing::debug!(entity = E::NAME, id, "Record not found");
        })
    }

    pub fn create_record(&self, input: E::Create) -> E {
        let record = self.store.insert(input);
        tracing::info!(entity = E::NAME, id = record.id(), "Record created");
        record
    }
}

impl<E: Entity> Default for EntityService<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
