// SHA-256 hashing and the secret digests derived from it.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a SHA-256 digest.
pub const HASH_BYTES: usize = 32;

/// SHA-256 hash of `data`, returning a 32-byte digest.
pub fn hash_sha256(data: &[u8]) -> [u8; HASH_BYTES] {
    hash_sha256_parts(&[data])
}

/// SHA-256 over the concatenation of `parts`, without materializing it.
pub fn hash_sha256_parts(parts: &[&[u8]]) -> [u8; HASH_BYTES] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut out = [0u8; HASH_BYTES];
    out.copy_from_slice(&result);
    out
}

/// A digest of secret material, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretDigest([u8; HASH_BYTES]);

impl SecretDigest {
    /// Hash the concatenation of `parts` into a secret digest.
    pub fn of(parts: &[&[u8]]) -> Self {
        Self(hash_sha256_parts(parts))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }
}

impl std::fmt::Debug for SecretDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretDigest(..)")
    }
}
