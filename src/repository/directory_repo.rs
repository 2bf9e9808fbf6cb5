// ==========================================
// Proposal Desk - directory repositories
// ==========================================
// Responsibility: territories, users and events as keyed collections
// Storage: kv_store, one namespace per entity type
// ==========================================

use crate::domain::directory::{Event, Praca, User};
use crate::repository::error::RepositoryResult;
use crate::repository::kv_store::KvStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Entity stored in its own namespace under a stable key
pub trait Keyed: Serialize + DeserializeOwned + Send + Sync {
    const NAMESPACE: &'static str;

    fn key(&self) -> &str;
}

impl Keyed for Praca {
    const NAMESPACE: &'static str = "pracas";

    fn key(&self) -> &str {
        &self.praca_id
    }
}

impl Keyed for User {
    const NAMESPACE: &'static str = "users";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Event {
    const NAMESPACE: &'static str = "events";

    fn key(&self) -> &str {
        &self.event_id
    }
}

// ==========================================
// DirectoryRepository<T>
// ==========================================
pub struct DirectoryRepository<T: Keyed> {
    store: KvStore,
    _entity: PhantomData<T>,
}

impl<T: Keyed> Clone for DirectoryRepository<T> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<T: Keyed> DirectoryRepository<T> {
    pub fn new(store: KvStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<T>> {
        self.store.list(T::NAMESPACE)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<T>> {
        self.store.get(T::NAMESPACE, id)
    }

    pub fn upsert(&self, entity: &T) -> RepositoryResult<()> {
        self.store.put(T::NAMESPACE, entity.key(), entity)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<bool> {
        self.store.delete(T::NAMESPACE, id)
    }

    pub fn is_empty(&self) -> RepositoryResult<bool> {
        Ok(self.store.count(T::NAMESPACE)? == 0)
    }
}

pub type PracaRepository = DirectoryRepository<Praca>;
pub type UserRepository = DirectoryRepository<User>;
pub type EventRepository = DirectoryRepository<Event>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::sync::{Arc, Mutex};

    fn store() -> KvStore {
        KvStore::from_connection(Arc::new(Mutex::new(Connection::open_in_memory().unwrap()))).unwrap()
    }

    #[test]
    fn test_praca_crud() {
        let repo = PracaRepository::new(store());
        assert!(repo.is_empty().unwrap());

        repo.upsert(&Praca::new("BH", "Belo Horizonte", "MG")).unwrap();
        repo.upsert(&Praca::new("SP", "São Paulo", "SP")).unwrap();

        let mut bh = repo.find_by_id("BH").unwrap().unwrap();
        bh.active = false;
        repo.upsert(&bh).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].praca_id, "BH");
        assert!(!all[0].active);

        assert!(repo.delete("SP").unwrap());
        assert!(repo.find_by_id("SP").unwrap().is_none());
    }

    #[test]
    fn test_namespaces_are_separate() {
        let kv = store();
        let pracas = PracaRepository::new(kv.clone());
        let events = EventRepository::new(kv);

        pracas.upsert(&Praca::new("BH", "Belo Horizonte", "MG")).unwrap();
        assert!(events.is_empty().unwrap());
    }
}
