//! Host credential checks.

use huddle_sdk::token::verify_token;

/// Compares a presented secret against its stored form.
pub trait SecretVerifier: Send + Sync {
    /// A missing `presented` value never matches.
    fn verify(&self, presented: Option<&str>, stored_hash: &str) -> bool;
}

/// Verifies raw host tokens against `base64(SHA-256(token))` hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostTokenVerifier;

impl SecretVerifier for HostTokenVerifier {
    fn verify(&self, presented: Option<&str>, stored_hash: &str) -> bool {
        verify_token(presented, stored_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_sdk::token::hash_token;

    #[test]
    fn test_host_token_verifier() {
        let hash = hash_token("abc");
        assert!(HostTokenVerifier.verify(Some("abc"), &hash));
        assert!(!HostTokenVerifier.verify(Some("abd"), &hash));
        assert!(!HostTokenVerifier.verify(None, &hash));
    }
}
