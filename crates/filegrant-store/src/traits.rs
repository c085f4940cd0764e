//! Store trait: the abstract interface for grant persistence.
//!
//! This trait lets the administration layer stay storage-agnostic.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use filegrant_core::{ApiKey, Subject, User, UserId, UserSpec};

use crate::error::Result;

/// Result of creating a user if absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInsert {
    /// The user was inserted with a freshly generated API key.
    Created(User),
    /// A user with this email already existed (idempotent - not an error).
    /// Carries the existing row; its key is unchanged.
    Exists(User),
}

impl UserInsert {
    /// The user row, created or pre-existing.
    pub fn user(&self) -> &User {
        match self {
            UserInsert::Created(user) | UserInsert::Exists(user) => user,
        }
    }

    /// Consume and return the user row.
    pub fn into_user(self) -> User {
        match self {
            UserInsert::Created(user) | UserInsert::Exists(user) => user,
        }
    }

    /// Whether a new row was inserted.
    pub fn was_created(&self) -> bool {
        matches!(self, UserInsert::Created(_))
    }
}

/// Result of inserting a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantInsert {
    /// The grant was inserted.
    Added,
    /// The (subject, file) pair was already granted (idempotent - not an
    /// error).
    AlreadyExists,
}

/// Result of removing a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantRemoval {
    /// The matching row was deleted.
    Removed,
    /// No matching row existed. Distinct from success, not fatal.
    NotFound,
}

/// One row of the grant listing: grants LEFT JOINed against the directory.
///
/// Public grants surface with `None` identity fields rather than being
/// dropped from the join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRow {
    pub email: Option<String>,
    pub api_key: Option<ApiKey>,
    pub file_path: String,
}

/// The Store trait: async interface for the user directory and grant table.
///
/// # Design Notes
///
/// - **Idempotent writes**: duplicate users and grants report `Exists` /
///   `AlreadyExists` rather than erroring.
/// - **Constraints live in the store**: email, api_key, (user_id, file_path)
///   and the one-public-grant-per-file invariant are enforced by the backend
///   inside the insert itself, never by caller check-then-act.
/// - **No sentinel leakage**: `Everyone` is a [`Subject`] variant at this
///   boundary; only the backend knows it is stored as a NULL user id.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // User Directory
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve a specifier to a user.
    ///
    /// An email spec is matched by email first, then retried as an exact
    /// API-key match. A key spec is matched by key only. `Everyone` never
    /// resolves.
    async fn lookup_user(&self, spec: &UserSpec) -> Result<Option<User>>;

    /// Insert a user with a freshly generated API key, unless the email
    /// already exists.
    ///
    /// Atomic with respect to the email uniqueness constraint: of two
    /// concurrent callers, one observes `Created` and the other `Exists`.
    async fn create_user_if_absent(&self, email: &str) -> Result<UserInsert>;

    /// Overwrite the user's API key with a fresh one, unconditionally.
    ///
    /// The old key is invalid immediately. Grants are untouched; they
    /// reference the user id, not the key value.
    async fn rotate_api_key(&self, id: UserId) -> Result<ApiKey>;

    /// Every known user's API key, in directory order.
    ///
    /// Includes users with zero personal grants: any valid user implicitly
    /// gets access to public files.
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Grant Table
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a grant unless the (subject, file) pair already exists.
    async fn insert_grant(&self, subject: Subject, file_path: &str) -> Result<GrantInsert>;

    /// Delete the grant for (subject, file), if present.
    ///
    /// Removing `Everyone` deletes only the public row; per-user grants for
    /// the same file are untouched.
    async fn remove_grant(&self, subject: Subject, file_path: &str) -> Result<GrantRemoval>;

    /// Every grant, joined against the directory, in insertion order.
    async fn list_grants(&self) -> Result<Vec<GrantRow>>;
}
