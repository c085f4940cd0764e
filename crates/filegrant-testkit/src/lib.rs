//! # Filegrant Testkit
//!
//! Fixtures and proptest generators shared by filegrant tests.

pub mod fixtures;
pub mod generators;

pub use fixtures::{init_test_logging, TestFixture};
