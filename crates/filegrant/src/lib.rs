//! # Filegrant
//!
//! Per-file read-access grants for users identified by email or API key,
//! persisted in SQLite, exportable as a JSON authorization document for an
//! external edge/auth-check function.
//!
//! ## Overview
//!
//! - **User directory**: email and API key each resolve to one user; keys
//!   are random URL-safe bearer tokens and can be rotated.
//! - **Grant table**: a flat (subject, file) allow-list, where a subject is
//!   a specific user or the distinguished "everyone" marker. No roles,
//!   scopes, expiry, or audit trail.
//! - **Administration**: add/revoke grants with create-user-on-grant
//!   semantics, key rotation.
//! - **Query layer**: human-readable listing, and the export document
//!   (`api_keys` / `public_files` / `grants`) that the enforcement side
//!   checks bearer tokens against.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use filegrant::{Admin, Command};
//! use filegrant::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("userfiles.db").unwrap();
//!     let admin = Admin::new(store);
//!
//!     let cmd = Command::AddGrant {
//!         user_spec: "bob@example.com".to_string(),
//!         file_path: "reports/q3.csv".to_string(),
//!     };
//!     let output = cmd.run(&admin).await.unwrap();
//!     println!("{}", output);
//!
//!     let doc = admin.export().await.unwrap();
//!     println!("{}", doc.to_json().unwrap());
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `filegrant::core` - Leaf types (User, Subject, ApiKey, UserSpec)
//! - `filegrant::store` - Storage abstraction and SQLite

pub mod admin;
pub mod command;
pub mod error;
pub mod export;

// Re-export component crates
pub use filegrant_core as core;
pub use filegrant_store as store;

// Re-export main types for convenience
pub use admin::{AddGrantOutcome, Admin, KeyOutcome, RevokeOutcome};
pub use command::Command;
pub use error::{AdminError, Result};
pub use export::{render_listing, ExportDocument, LISTING_HEADER};

// Re-export commonly used core types
pub use filegrant_core::{generate_api_key, ApiKey, Subject, User, UserId, UserSpec};
