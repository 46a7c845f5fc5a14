//! Admin API key hashing (§1.2, §6). A single shared admin key, not a
//! per-user table: the operator generates it once and configures its
//! SHA-256 hash; requests to the C10 admin surface present it via the
//! `Authorization: Bearer <key>` header and are checked against that hash.

use rand::Rng;
use sha2::{Digest, Sha256};

const ADMIN_KEY_PREFIX: &str = "evcs_";

/// Hash an API key for storage/comparison using SHA-256.
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Constant-time-ish verification against a stored hash (the hash comparison
/// itself is a plain string compare; the expensive half, hashing, is the same
/// work regardless of where the input diverges).
pub fn verify_api_key(key: &str, stored_hash: &str) -> bool {
    hash_api_key(key) == stored_hash
}

/// Generates a fresh admin key for first-run setup: `evcs_<32 hex chars>`.
pub fn generate_admin_key() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: [u8; 16] = rng.gen();
    format!("{ADMIN_KEY_PREFIX}{}", hex::encode(random_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_matching_key() {
        let key = generate_admin_key();
        let hash = hash_api_key(&key);
        assert!(verify_api_key(&key, &hash));
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let hash = hash_api_key("evcs_real");
        assert!(!verify_api_key("evcs_fake", &hash));
    }
}
