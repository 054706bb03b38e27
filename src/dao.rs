use std::marker::PhantomData;
use std::sync::Arc;

use crate::store::{Entity, Store};

/// Collection-level data access over the local store. Every mutation reads
/// the whole collection, applies the change, and writes the whole collection
/// back. Unknown ids are silent no-ops for update and delete.
pub struct Dao<T: Entity> {
    store: Arc<Store>,
    _marker: PhantomData<T>,
}

impl<T: Entity> Dao<T> {
    pub fn new(store: Arc<Store>) -> Self {
        Dao {
            store,
            _marker: PhantomData,
        }
    }

    pub fn get_all(&self) -> Vec<T> {
        self.store.get::<T>()
    }

    pub fn insert(&self, record: T) -> T {
        let mut all = self.get_all();
        all.push(record.clone());
        self.store.set(&all);
        record
    }

    /// Applies `patch` to the record with the given id and persists the
    /// collection. Returns the updated record, or `None` if no record
    /// matched (in which case nothing is written).
    pub fn update(&self, id: &str, patch: impl FnOnce(&mut T)) -> Option<T> {
        let mut all = self.get_all();
        let record = all.iter_mut().find(|r| r.id() == id)?;
        patch(record);
        let updated = record.clone();
        self.store.set(&all);
        Some(updated)
    }

    pub fn delete(&self, id: &str) {
        let mut all = self.get_all();
        let before = all.len();
        all.retain(|r| r.id() != id);
        if all.len() != before {
            self.store.set(&all);
        }
    }
}
