//! Proptest generators for property-based testing.

use proptest::prelude::*;

/// Generate a plausible email address.
pub fn email() -> impl Strategy<Value = String> {
    "[a-z]{1,8}@[a-z]{1,8}\\.(com|org|net)"
}

/// Generate a file path like the ones grants point at.
pub fn file_path() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,8}(/[a-z0-9_]{1,8}){0,2}\\.(csv|json|txt)"
}

/// Generate a string shaped like a generated API key (22 base64url chars).
pub fn api_key_like() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{22}"
}
