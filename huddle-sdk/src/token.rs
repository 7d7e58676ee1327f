//! Host token generation and verification.
//!
//! A host receives the raw token once, when the gathering is created. Only
//! the SHA-256 digest of the token is stored, encoded as unpadded base64:
//!
//! ```text
//! host_token_hash = base64(SHA-256(raw_token))
//! ```
//!
//! Tokens are random v4 UUIDs, so a fast digest is sufficient here; a slow
//! password hash would be paid on every host request.

use ring::digest::{SHA256, digest};

/// Header carrying the raw host token on host-only endpoints.
pub const HOST_TOKEN_HEADER: &str = "Huddle-Host-Token";

/// Generate a new raw host token.
pub fn generate_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Digest a raw token into its stored form.
pub fn hash_token(raw: &str) -> String {
    let digest = digest(&SHA256, raw.as_bytes());
    fast32::base64::RFC4648_NOPAD.encode(digest.as_ref())
}

/// Compare a presented raw token against a stored hash.
///
/// A missing token, an undecodable stored hash, or a digest mismatch all
/// yield `false`. The digest comparison does not short-circuit.
pub fn verify_token(presented: Option<&str>, stored_hash: &str) -> bool {
    let Some(presented) = presented else {
        return false;
    };
    let Ok(stored) = fast32::base64::RFC4648_NOPAD.decode_str(stored_hash) else {
        return false;
    };
    let presented = digest(&SHA256, presented.as_bytes());
    let presented = presented.as_ref();
    if stored.len() != presented.len() {
        return false;
    }
    stored
        .iter()
        .zip(presented)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_token() {
        let token = generate_token();
        let hash = hash_token(&token);

        assert!(verify_token(Some(&token), &hash));
        assert!(!verify_token(Some("not-the-token"), &hash));
        assert!(!verify_token(None, &hash));
    }

    #[test]
    fn test_garbage_hash_never_matches() {
        assert!(!verify_token(Some("anything"), "%%%"));
        assert!(!verify_token(Some("anything"), ""));
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
