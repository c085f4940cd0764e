//! # Filegrant Core
//!
//! Leaf types for the filegrant system: user records, grant subjects, and
//! API key generation.
//!
//! ## Key Types
//!
//! - [`User`] - A directory entry: id, email, API key
//! - [`Subject`] - Who a grant applies to: a specific user or everyone
//! - [`UserSpec`] - A caller-supplied user specifier, parsed from a string
//! - [`ApiKey`] - An opaque URL-safe bearer token
//!
//! The storage layer encodes [`Subject::Everyone`] as a NULL user id; that
//! encoding never leaves the store. Callers only see the tagged union.

pub mod keygen;
pub mod types;

pub use keygen::{generate_api_key, API_KEY_BYTES};
pub use types::{ApiKey, Subject, User, UserId, UserSpec};
