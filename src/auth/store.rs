//! Identity storage.
//!
//! The persistent repository is an external concern; [`InMemoryUserStore`]
//! backs the server and the tests.

use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

/// A registered identity. Usernames are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Lookup and persistence of identities.
pub trait UserStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Option<UserRecord>;

    fn find_by_id(&self, id: Uuid) -> Option<UserRecord>;

    /// Insert a record. Returns false if the username is taken.
    fn insert(&self, record: UserRecord) -> bool;

    /// Remove a record by id. Returns false if it did not exist.
    fn delete(&self, id: Uuid) -> bool;
}

/// Concurrent in-memory store keyed by lower-cased username.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        self.users
            .get(&username.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    fn find_by_id(&self, id: Uuid) -> Option<UserRecord> {
        self.users
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.value().clone())
    }

    fn insert(&self, record: UserRecord) -> bool {
        match self.users.entry(record.username.to_lowercase()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    fn delete(&self, id: Uuid) -> bool {
        // Collect the key first; removing while iterating would deadlock the shard.
        let key = self
            .users
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.key().clone());

        key.and_then(|k| self.users.remove_if(&k, |_, record| record.id == id))
            .is_some()
    }
}
