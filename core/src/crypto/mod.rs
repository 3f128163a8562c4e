//! Domain-separated hashing
//!
//! Used to derive deterministic identifiers and the ledger state root. Every
//! digest is prefixed with a domain tag so digests of different kinds can never
//! be confused with one another.

use sha2::{Sha256, Digest};
use constant_time_eq::constant_time_eq;

/// Domain for ledger state roots
pub const STATE_ROOT_DOMAIN: &str = "VTL_STATE_ROOT";

/// Domain for generated message ids
pub const MESSAGE_ID_DOMAIN: &str = "VTL_MESSAGE_ID";

/// Create a domain-separated SHA-256 hash of multiple inputs
///
/// # Arguments
///
/// * `domain` - Domain prefix (e.g., "VTL_STATE_ROOT")
/// * `data` - Inputs to hash, each length-prefixed
///
/// # Returns
///
/// A 32-byte hash with domain separation
pub fn secure_hash_multiple(domain: &str, data: &[&[u8]]) -> [u8; 32] {
    let mut hasher = DomainHasher::new(domain);
    for element in data {
        hasher.update(element);
    }
    hasher.finalize()
}

/// Incremental domain-separated hasher
///
/// Each `update` is length-prefixed, so feeding `["ab", "c"]` and `["a", "bc"]`
/// produces different digests.
pub struct DomainHasher {
    inner: Sha256,
}

impl DomainHasher {
    /// Start a new hash in the given domain
    pub fn new(domain: &str) -> Self {
        let mut inner = Sha256::new();
        inner.update(domain.as_bytes());
        // Domain length guards against variable-length domain extension
        inner.update((domain.len() as u32).to_be_bytes());
        Self { inner }
    }

    /// Add one length-prefixed element
    pub fn update(&mut self, element: &[u8]) {
        self.inner.update((element.len() as u32).to_be_bytes());
        self.inner.update(element);
    }

    /// Finish and return the digest
    pub fn finalize(self) -> [u8; 32] {
        self.inner.finalize().into()
    }
}

/// Compare two digests in constant time
pub fn verify_hash(expected: &[u8; 32], actual: &[u8; 32]) -> bool {
    constant_time_eq(expected, actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_hash_multiple() {
        let hash = secure_hash_multiple("TEST", &[&b"data1"[..], &b"data2"[..]]);

        // Same inputs should produce the same hash
        assert_eq!(hash, secure_hash_multiple("TEST", &[&b"data1"[..], &b"data2"[..]]));

        // Different domain should produce different hash
        assert_ne!(hash, secure_hash_multiple("DIFFERENT", &[&b"data1"[..], &b"data2"[..]]));

        // Order matters
        assert_ne!(hash, secure_hash_multiple("TEST", &[&b"data2"[..], &b"data1"[..]]));

        // Shifting bytes between elements changes the hash
        assert_ne!(
            secure_hash_multiple("TEST", &[&b"ab"[..], &b"c"[..]]),
            secure_hash_multiple("TEST", &[&b"a"[..], &b"bc"[..]])
        );
    }

    #[test]
    fn test_verify_hash() {
        let hash = secure_hash_multiple("TEST", &[&b"test data"[..]]);
        let other = secure_hash_multiple("TEST", &[&b"other data"[..]]);

        assert!(verify_hash(&hash, &hash));
        assert!(!verify_hash(&hash, &other));
    }

    #[test]
    fn test_long_domain_length_is_not_truncated() {
        let domain = "D".repeat(300);

        let mut expected = Sha256::new();
        expected.update(domain.as_bytes());
        expected.update(300u32.to_be_bytes());
        let expected: [u8; 32] = expected.finalize().into();

        assert_eq!(DomainHasher::new(&domain).finalize(), expected);
    }
}
