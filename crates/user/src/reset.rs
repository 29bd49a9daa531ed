//! Password-reset tokens.
//!
//! The raw token only ever travels in the email link; the database stores a
//! SHA3-256 digest, so a leaked table cannot be replayed.

use rand::RngExt;
use sha3::{Digest, Sha3_256};
use ulid::Ulid;

/// Reset links stay valid for two hours.
pub const RESET_TOKEN_TTL_SECONDS: i64 = 2 * 60 * 60;

/// A freshly generated reset token: the raw value for the email link and the
/// digest to persist.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub id: String,
    pub raw: String,
    pub hash: String,
}

/// Generate a single-use reset token from 32 random bytes.
pub fn generate_reset_token() -> ResetToken {
    let bytes: [u8; 32] = rand::rng().random();
    let raw = hex_encode(&bytes);
    let hash = hash_reset_token(&raw);
    ResetToken {
        id: Ulid::new().to_string(),
        raw,
        hash,
    }
}

/// Digest a raw token the way it is stored in `password_reset_tokens`.
pub fn hash_reset_token(raw: &str) -> String {
    let digest = Sha3_256::digest(raw.as_bytes());
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_token_is_64_hex_chars() {
        let token = generate_reset_token();
        assert_eq!(token.raw.len(), 64);
        assert!(token.raw.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_matches_regenerated_digest() {
        let token = generate_reset_token();
        assert_eq!(token.hash, hash_reset_token(&token.raw));
    }

    #[test]
    fn tokens_are_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_ne!(a.raw, b.raw);
        assert_ne!(a.hash, b.hash);
    }
}
