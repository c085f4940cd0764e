//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same observable semantics as
//! SQLite but keeps everything in memory with no persistence.

use std::sync::RwLock;

use async_trait::async_trait;

use filegrant_core::{generate_api_key, ApiKey, Subject, User, UserId, UserSpec};

use crate::error::{Result, StoreError};
use crate::traits::{GrantInsert, GrantRemoval, GrantRow, Store, UserInsert};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Users in insertion order. Ids are assigned sequentially from 1,
    /// matching SQLite's rowid behavior.
    users: Vec<User>,
    next_user_id: i64,

    /// Grants in insertion order.
    grants: Vec<GrantEntry>,
}

struct GrantEntry {
    /// None means the grant applies to every user.
    user_id: Option<UserId>,
    file_path: String,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                users: Vec::new(),
                next_user_id: 1,
                grants: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn lookup_user(&self, spec: &UserSpec) -> Result<Option<User>> {
        let inner = self.inner.read().unwrap();

        let found = match spec {
            UserSpec::Everyone => None,
            UserSpec::Email(s) => inner
                .users
                .iter()
                .find(|u| u.email == *s)
                .or_else(|| inner.users.iter().find(|u| u.api_key.as_str() == s)),
            UserSpec::Key(s) => inner.users.iter().find(|u| u.api_key.as_str() == s),
        };

        Ok(found.cloned())
    }

    async fn create_user_if_absent(&self, email: &str) -> Result<UserInsert> {
        let mut inner = self.inner.write().unwrap();

        if let Some(existing) = inner.users.iter().find(|u| u.email == email) {
            return Ok(UserInsert::Exists(existing.clone()));
        }

        let user = User {
            id: UserId(inner.next_user_id),
            email: email.to_string(),
            api_key: generate_api_key(),
        };
        inner.next_user_id += 1;
        inner.users.push(user.clone());

        Ok(UserInsert::Created(user))
    }

    async fn rotate_api_key(&self, id: UserId) -> Result<ApiKey> {
        let mut inner = self.inner.write().unwrap();

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::UserNotFound(id))?;

        user.api_key = generate_api_key();
        Ok(user.api_key.clone())
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.iter().map(|u| u.api_key.clone()).collect())
    }

    async fn insert_grant(&self, subject: Subject, file_path: &str) -> Result<GrantInsert> {
        let mut inner = self.inner.write().unwrap();

        let user_id = subject.user_id();
        let exists = inner
            .grants
            .iter()
            .any(|g| g.user_id == user_id && g.file_path == file_path);

        if exists {
            return Ok(GrantInsert::AlreadyExists);
        }

        inner.grants.push(GrantEntry {
            user_id,
            file_path: file_path.to_string(),
        });
        Ok(GrantInsert::Added)
    }

    async fn remove_grant(&self, subject: Subject, file_path: &str) -> Result<GrantRemoval> {
        let mut inner = self.inner.write().unwrap();

        let user_id = subject.user_id();
        let pos = inner
            .grants
            .iter()
            .position(|g| g.user_id == user_id && g.file_path == file_path);

        match pos {
            Some(i) => {
                inner.grants.remove(i);
                Ok(GrantRemoval::Removed)
            }
            None => Ok(GrantRemoval::NotFound),
        }
    }

    async fn list_grants(&self) -> Result<Vec<GrantRow>> {
        let inner = self.inner.read().unwrap();

        let rows = inner
            .grants
            .iter()
            .map(|g| {
                let user = g
                    .user_id
                    .and_then(|id| inner.users.iter().find(|u| u.id == id));
                GrantRow {
                    email: user.map(|u| u.email.clone()),
                    api_key: user.map(|u| u.api_key.clone()),
                    file_path: g.file_path.clone(),
                }
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_matches_sqlite_semantics() {
        let store = MemoryStore::new();

        let first = store.create_user_if_absent("bob@example.com").await.unwrap();
        let second = store.create_user_if_absent("bob@example.com").await.unwrap();
        assert!(first.was_created());
        assert!(!second.was_created());
        assert_eq!(first.user().api_key, second.user().api_key);

        let bob = first.into_user();
        assert_eq!(
            store.insert_grant(Subject::User(bob.id), "a.csv").await.unwrap(),
            GrantInsert::Added
        );
        assert_eq!(
            store.insert_grant(Subject::User(bob.id), "a.csv").await.unwrap(),
            GrantInsert::AlreadyExists
        );
        assert_eq!(
            store.insert_grant(Subject::Everyone, "a.csv").await.unwrap(),
            GrantInsert::Added
        );
        assert_eq!(
            store.insert_grant(Subject::Everyone, "a.csv").await.unwrap(),
            GrantInsert::AlreadyExists
        );

        // Public revoke leaves the personal grant alone.
        assert_eq!(
            store.remove_grant(Subject::Everyone, "a.csv").await.unwrap(),
            GrantRemoval::Removed
        );
        let rows = store.list_grants().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email.as_deref(), Some("bob@example.com"));
    }

    #[tokio::test]
    async fn test_memory_rotate_and_lookup_fallback() {
        let store = MemoryStore::new();
        let bob = store
            .create_user_if_absent("bob@example.com")
            .await
            .unwrap()
            .into_user();

        let new_key = store.rotate_api_key(bob.id).await.unwrap();
        assert_ne!(new_key, bob.api_key);
        assert!(store
            .lookup_user(&UserSpec::parse(bob.api_key.as_str()))
            .await
            .unwrap()
            .is_none());

        // An email-shaped spec falls back to key matching.
        let odd_key = new_key.as_str().to_string();
        let resolved = store
            .lookup_user(&UserSpec::Email(odd_key))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, bob.id);
    }
}
