//! # Filegrant Store
//!
//! Storage abstraction for filegrant. Provides a trait-based interface for
//! the user directory and grant table, with SQLite and in-memory
//! implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`UserInsert`] / [`GrantInsert`] / [`GrantRemoval`] - Typed write outcomes
//! - [`GrantRow`] - One row of the grant listing, joined against the directory
//!
//! ## Design Notes
//!
//! - **Idempotent writes**: duplicate users and grants are reported as
//!   outcomes, never errors
//! - **Constraints in the store**: every uniqueness invariant (email, key,
//!   grant pair, one public grant per file) is enforced by the backend
//!   inside the write itself, so concurrent create-if-absent callers cannot
//!   race
//! - **Everyone as a variant**: the NULL-user encoding for public grants
//!   exists only inside the backends

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{GrantInsert, GrantRemoval, GrantRow, Store, UserInsert};
