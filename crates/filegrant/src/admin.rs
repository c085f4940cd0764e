//! Grant administration: the write-side operations.
//!
//! Composes the user directory and the grant table: a specifier is resolved
//! to a subject, then the grant table is mutated. Users are created
//! implicitly when granting to a new email; revocation never creates or
//! deletes users. That asymmetry is deliberate.

use std::sync::Arc;

use filegrant_core::{Subject, User, UserSpec};
use filegrant_store::{GrantInsert, GrantRemoval, Store};

use crate::error::{AdminError, Result};
use crate::export::ExportDocument;

/// Outcome of [`Admin::add_grant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddGrantOutcome {
    /// Whether a grant row was inserted (false: already granted, no-op).
    pub newly_granted: bool,
    /// The user created on the way, if the email was new to the directory.
    /// Carries the freshly generated API key.
    pub created_user: Option<User>,
}

/// Outcome of [`Admin::revoke_grant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// The grant existed and was removed.
    Revoked,
    /// No such grant. Distinct from success, not fatal.
    NotGranted,
}

/// Outcome of [`Admin::new_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The user existed; their key was replaced. Carries the row with the
    /// new key.
    Rotated(User),
    /// The email was unknown, so the user was created instead (creation
    /// generates the key).
    Created(User),
}

impl KeyOutcome {
    /// The affected user, with their current key.
    pub fn user(&self) -> &User {
        match self {
            KeyOutcome::Rotated(user) | KeyOutcome::Created(user) => user,
        }
    }
}

/// The administration API over a store handle.
///
/// Write-side operations resolve a [`UserSpec`] against the directory and
/// mutate the grant table; read-side operations join the two and format or
/// serialize the result.
pub struct Admin<S: Store> {
    store: Arc<S>,
}

impl<S: Store> Admin<S> {
    /// Wrap a store handle.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a specifier to a grant subject, without creating anything.
    ///
    /// `"all"` maps to [`Subject::Everyone`] and bypasses lookup entirely;
    /// anything else must name an existing user.
    async fn resolve(&self, spec: &UserSpec) -> Result<Subject> {
        if let UserSpec::Everyone = spec {
            return Ok(Subject::Everyone);
        }

        let user = self
            .store
            .lookup_user(spec)
            .await?
            .ok_or_else(|| AdminError::UnknownUser(spec.as_str().to_string()))?;
        Ok(Subject::User(user.id))
    }

    /// Grant read access for `spec` to `file_path`.
    ///
    /// An email specifier creates the user first if needed. An API-key
    /// specifier must already resolve; grants are never created for
    /// unresolvable subjects.
    pub async fn add_grant(&self, spec: &UserSpec, file_path: &str) -> Result<AddGrantOutcome> {
        let (subject, created_user) = match spec {
            UserSpec::Everyone => (Subject::Everyone, None),
            UserSpec::Email(email) => {
                let insert = self.store.create_user_if_absent(email).await?;
                let created = insert.was_created().then(|| insert.user().clone());
                (Subject::User(insert.user().id), created)
            }
            UserSpec::Key(_) => (self.resolve(spec).await?, None),
        };

        let inserted = self.store.insert_grant(subject, file_path).await?;
        let newly_granted = inserted == GrantInsert::Added;
        tracing::info!(spec = %spec, file_path = %file_path, newly_granted, "add grant");

        Ok(AddGrantOutcome {
            newly_granted,
            created_user,
        })
    }

    /// Revoke read access for `spec` to `file_path`.
    ///
    /// Revoking `"all"` removes only the public grant; per-user grants for
    /// the same file are untouched even if every user also holds one.
    pub async fn revoke_grant(&self, spec: &UserSpec, file_path: &str) -> Result<RevokeOutcome> {
        let subject = self.resolve(spec).await?;

        let removal = self.store.remove_grant(subject, file_path).await?;
        let removed = removal == GrantRemoval::Removed;
        tracing::info!(spec = %spec, file_path = %file_path, removed, "revoke grant");

        Ok(match removal {
            GrantRemoval::Removed => RevokeOutcome::Revoked,
            GrantRemoval::NotFound => RevokeOutcome::NotGranted,
        })
    }

    /// Rotate the key for an existing user, or create the user if the spec
    /// is an unknown email.
    ///
    /// An unknown API-key spec is an error: keys cannot be rotated into
    /// existence from nothing.
    pub async fn new_key(&self, spec: &UserSpec) -> Result<KeyOutcome> {
        if let Some(user) = self.store.lookup_user(spec).await? {
            let api_key = self.store.rotate_api_key(user.id).await?;
            tracing::info!(email = %user.email, "rotated key");
            return Ok(KeyOutcome::Rotated(User { api_key, ..user }));
        }

        match spec {
            UserSpec::Email(email) => {
                let insert = self.store.create_user_if_absent(email).await?;
                tracing::info!(email = %email, "created user for new_key");
                Ok(KeyOutcome::Created(insert.into_user()))
            }
            _ => Err(AdminError::UnknownUser(spec.as_str().to_string())),
        }
    }

    /// Build the authorization document for the export-consuming system.
    pub async fn export(&self) -> Result<ExportDocument> {
        let api_keys = self.store.list_api_keys().await?;
        let rows = self.store.list_grants().await?;
        Ok(ExportDocument::build(api_keys, rows))
    }

    /// Render every grant as a human-readable table.
    pub async fn render_grants(&self) -> Result<String> {
        let rows = self.store.list_grants().await?;
        Ok(crate::export::render_listing(&rows))
    }
}
