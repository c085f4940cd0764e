//! API key generation.
//!
//! Keys are bearer tokens: anyone holding one can read the files granted to
//! it. They must come from a cryptographically secure source.

use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::types::ApiKey;

/// Bytes of entropy per generated key.
pub const API_KEY_BYTES: usize = 16;

/// Generate a fresh random API key.
///
/// 128 bits from the OS CSPRNG, encoded base64url without padding so the
/// token can sit directly in a URL path or header. Randomness exhaustion
/// panics; there is no meaningful recovery.
pub fn generate_api_key() -> ApiKey {
    let mut buf = [0u8; API_KEY_BYTES];
    OsRng.fill_bytes(&mut buf);
    ApiKey::new(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_is_url_safe_unpadded() {
        let key = generate_api_key();
        // 16 bytes -> 22 base64 chars, no '=' padding.
        assert_eq!(key.as_str().len(), 22);
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
