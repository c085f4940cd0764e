//! Strong type definitions for the filegrant system.
//!
//! Identifiers are newtypes to prevent misuse at compile time: an email
//! string, an API key, and a user row id are not interchangeable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The row id of a user in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl UserId {
    /// Get the raw id.
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// An opaque URL-safe bearer token authenticating a user.
///
/// Keys are compared for exact equality and treated as secrets: the Debug
/// representation shows only a prefix.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap an existing key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "ApiKey({}..)", prefix)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A user directory entry.
///
/// Email and API key are each unique across the directory. The API key is
/// the only mutable field (rotation); users are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub api_key: ApiKey,
}

/// The entity a grant applies to.
///
/// Storage encodes `Everyone` as a NULL user id; that representation is
/// confined to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A specific user, by directory id.
    User(UserId),
    /// Every user, including users added later.
    Everyone,
}

impl Subject {
    /// The user id, if this subject is a specific user.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Subject::User(id) => Some(*id),
            Subject::Everyone => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::User(id) => write!(f, "user {}", id),
            Subject::Everyone => write!(f, "all"),
        }
    }
}

/// The literal specifier that means "every user".
pub const EVERYONE_SPEC: &str = "all";

/// A caller-supplied user specifier.
///
/// Three forms: the literal `"all"`, an email address (contains `'@'`), or
/// an opaque API key. `"all"` never resolves to a user in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSpec {
    /// The distinguished "everyone" marker.
    Everyone,
    /// An email address. May create a user when granting.
    Email(String),
    /// An API key. Must already exist in the directory.
    Key(String),
}

impl UserSpec {
    /// Classify a raw specifier string.
    pub fn parse(spec: &str) -> Self {
        if spec == EVERYONE_SPEC {
            UserSpec::Everyone
        } else if spec.contains('@') {
            UserSpec::Email(spec.to_string())
        } else {
            UserSpec::Key(spec.to_string())
        }
    }

    /// The raw specifier text.
    pub fn as_str(&self) -> &str {
        match self {
            UserSpec::Everyone => EVERYONE_SPEC,
            UserSpec::Email(s) => s,
            UserSpec::Key(s) => s,
        }
    }
}

impl fmt::Display for UserSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for UserSpec {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}
