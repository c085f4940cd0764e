//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking. Each operation is a
//! single implicit transaction, so independent short-lived callers sharing
//! one database file stay consistent.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use filegrant_core::{generate_api_key, ApiKey, Subject, User, UserId, UserSpec};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{GrantInsert, GrantRemoval, GrantRow, Store, UserInsert};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation against the connection on a blocking thread.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }
}

// Helper to convert a row to User
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get("id")?),
        email: row.get("email")?,
        api_key: ApiKey::new(row.get::<_, String>("api_key")?),
    })
}

fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, email, api_key FROM users WHERE email = ?1",
        params![email],
        row_to_user,
    )
    .optional()
    .map_err(StoreError::from)
}

fn find_by_key(conn: &Connection, api_key: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, email, api_key FROM users WHERE api_key = ?1",
        params![api_key],
        row_to_user,
    )
    .optional()
    .map_err(StoreError::from)
}

#[async_trait]
impl Store for SqliteStore {
    async fn lookup_user(&self, spec: &UserSpec) -> Result<Option<User>> {
        let spec = spec.clone();

        self.with_conn(move |conn| match spec {
            // The sentinel is handled by the caller; it never names a row.
            UserSpec::Everyone => Ok(None),
            UserSpec::Email(ref s) => {
                if let Some(user) = find_by_email(conn, s)? {
                    return Ok(Some(user));
                }
                // Fall back to an exact key match for specs that merely
                // look like emails.
                find_by_key(conn, s)
            }
            UserSpec::Key(ref s) => find_by_key(conn, s),
        })
        .await
    }

    async fn create_user_if_absent(&self, email: &str) -> Result<UserInsert> {
        let email = email.to_string();

        self.with_conn(move |conn| {
            let api_key = generate_api_key();

            // INSERT OR IGNORE makes the uniqueness race resolve here: the
            // loser of a concurrent create observes rowcount 0, never a
            // constraint fault.
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO users (email, api_key) VALUES (?1, ?2)",
                params![&email, api_key.as_str()],
            )?;

            let user = conn.query_row(
                "SELECT id, email, api_key FROM users WHERE email = ?1",
                params![&email],
                row_to_user,
            )?;

            if inserted > 0 {
                tracing::debug!(email = %user.email, id = %user.id, "created user");
                Ok(UserInsert::Created(user))
            } else {
                Ok(UserInsert::Exists(user))
            }
        })
        .await
    }

    async fn rotate_api_key(&self, id: UserId) -> Result<ApiKey> {
        self.with_conn(move |conn| {
            let api_key = generate_api_key();

            let updated = conn.execute(
                "UPDATE users SET api_key = ?1 WHERE id = ?2",
                params![api_key.as_str(), id.as_i64()],
            )?;

            if updated == 0 {
                return Err(StoreError::UserNotFound(id));
            }

            tracing::debug!(id = %id, "rotated api key");
            Ok(api_key)
        })
        .await
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT api_key FROM users ORDER BY id")?;

            let keys = stmt
                .query_map([], |row| row.get::<_, String>(0).map(ApiKey::new))?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(keys)
        })
        .await
    }

    async fn insert_grant(&self, subject: Subject, file_path: &str) -> Result<GrantInsert> {
        let file_path = file_path.to_string();

        self.with_conn(move |conn| {
            // The UNIQUE(user_id, file_path) constraint and the partial
            // unique index on public rows both back this OR IGNORE.
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO grants (user_id, file_path, granted_at)
                 VALUES (?1, ?2, ?3)",
                params![
                    subject.user_id().map(|id| id.as_i64()),
                    &file_path,
                    now_millis()
                ],
            )?;

            if inserted > 0 {
                tracing::debug!(subject = %subject, file_path = %file_path, "added grant");
                Ok(GrantInsert::Added)
            } else {
                Ok(GrantInsert::AlreadyExists)
            }
        })
        .await
    }

    async fn remove_grant(&self, subject: Subject, file_path: &str) -> Result<GrantRemoval> {
        let file_path = file_path.to_string();

        self.with_conn(move |conn| {
            let removed = match subject.user_id() {
                Some(id) => conn.execute(
                    "DELETE FROM grants WHERE user_id = ?1 AND file_path = ?2",
                    params![id.as_i64(), &file_path],
                )?,
                // Only the public row; per-user grants on the same file
                // stay put.
                None => conn.execute(
                    "DELETE FROM grants WHERE user_id IS NULL AND file_path = ?1",
                    params![&file_path],
                )?,
            };

            if removed > 0 {
                tracing::debug!(subject = %subject, file_path = %file_path, "revoked grant");
                Ok(GrantRemoval::Removed)
            } else {
                Ok(GrantRemoval::NotFound)
            }
        })
        .await
    }

    async fn list_grants(&self) -> Result<Vec<GrantRow>> {
        self.with_conn(|conn| {
            // LEFT JOIN so public grants (NULL user_id) are included with
            // NULL identity fields.
            let mut stmt = conn.prepare(
                "SELECT u.email, u.api_key, g.file_path
                 FROM grants AS g
                 LEFT JOIN users AS u ON g.user_id = u.id
                 ORDER BY g.id",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(GrantRow {
                        email: row.get(0)?,
                        api_key: row.get::<_, Option<String>>(1)?.map(ApiKey::new),
                        file_path: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(rows)
        })
        .await
    }
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
