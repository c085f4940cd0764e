//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use filegrant_core::{Subject, User};
use filegrant_store::{MemoryStore, Store};

/// Initialize tracing output for tests. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A test fixture around an in-memory store.
pub struct TestFixture {
    pub store: MemoryStore,
}

impl TestFixture {
    /// Create a fixture with an empty store.
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    /// Ensure a user exists, returning the row.
    pub async fn user(&self, email: &str) -> User {
        self.store
            .create_user_if_absent(email)
            .await
            .expect("memory store create")
            .into_user()
    }

    /// Ensure a user exists and grant them a file.
    pub async fn grant_user(&self, email: &str, file_path: &str) -> User {
        let user = self.user(email).await;
        self.store
            .insert_grant(Subject::User(user.id), file_path)
            .await
            .expect("memory store grant");
        user
    }

    /// Grant a file to everyone.
    pub async fn grant_everyone(&self, file_path: &str) {
        self.store
            .insert_grant(Subject::Everyone, file_path)
            .await
            .expect("memory store grant");
    }

    /// Fill the store with the sample data set: bob and alice with one
    /// personal grant each, and one public file.
    pub async fn seed_sample(&self) -> (User, User) {
        let bob = self.grant_user("bob@example.com", "test1.csv").await;
        let alice = self.grant_user("alice@example.com", "test2.csv").await;
        self.grant_everyone("test3.csv").await;
        (bob, alice)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filegrant_core::UserSpec;

    #[tokio::test]
    async fn test_seed_sample_layout() {
        let fixture = TestFixture::new();
        let (bob, alice) = fixture.seed_sample().await;

        assert_ne!(bob.id, alice.id);
        assert_ne!(bob.api_key, alice.api_key);

        let rows = fixture.store.list_grants().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].email, None); // the public grant

        let keys = fixture.store.list_api_keys().await.unwrap();
        assert_eq!(keys, vec![bob.api_key, alice.api_key]);
    }

    #[tokio::test]
    async fn test_user_helper_is_idempotent() {
        let fixture = TestFixture::new();
        let first = fixture.user("bob@example.com").await;
        let again = fixture.user("bob@example.com").await;
        assert_eq!(first, again);

        let found = fixture
            .store
            .lookup_user(&UserSpec::parse("bob@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, first);
    }
}
