//! Content fingerprints.
//!
//! A fingerprint identifies the exact content a session was run against, so
//! reports produced from different pool revisions can be told apart.

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::pools::ContentPools;

/// Compute SHA-256 hash of content.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Compute the fingerprint of a set of content pools.
pub fn fingerprint_pools(pools: &ContentPools) -> String {
    let json = serde_json::to_string(pools).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to serialize content pools for fingerprinting");
        String::new()
    });
    compute_hash(json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_hash_known_value() {
        assert_eq!(
            compute_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = ContentPools::standard().fingerprint();
        let b = ContentPools::standard().fingerprint();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let mut pools = ContentPools::standard();
        let original = pools.fingerprint();
        pools.forced_choice[0].option_a.strength = 0.1;
        assert_ne!(pools.fingerprint(), original);
    }
}
