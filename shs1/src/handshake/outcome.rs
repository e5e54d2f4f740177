// Session keys and nonces produced by a completed handshake.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::auth::{AuthTag, NONCE_BYTES};
use crate::crypto::hash::{hash_sha256, hash_sha256_parts, SecretDigest, HASH_BYTES};
use crate::crypto::keys::PUBLIC_KEY_BYTES;

/// Directional keys and nonces for the post-handshake box stream.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Outcome {
    /// Key for messages this side sends.
    pub encryption_key: [u8; HASH_BYTES],
    /// Starting nonce for messages this side sends.
    pub encryption_nonce: [u8; NONCE_BYTES],
    /// Key for messages this side receives.
    pub decryption_key: [u8; HASH_BYTES],
    /// Starting nonce for messages this side receives.
    pub decryption_nonce: [u8; NONCE_BYTES],
}

impl Outcome {
    /// Derive one side's outcome from the final handshake digest.
    ///
    /// ```text
    /// encryption_key   = hash(hash(master) || peer_public)
    /// encryption_nonce = peer_mac[..24]
    /// decryption_key   = hash(hash(master) || own_public)
    /// decryption_nonce = own_mac[..24]
    /// ```
    ///
    /// The server uses the same derivation with the roles swapped, so each
    /// side's encryption pair equals the other's decryption pair.
    pub fn derive(
        master: &SecretDigest,
        peer_public: &[u8; PUBLIC_KEY_BYTES],
        peer_mac: &AuthTag,
        own_public: &[u8; PUBLIC_KEY_BYTES],
        own_mac: &AuthTag,
    ) -> Self {
        let mut inner = hash_sha256(master.as_bytes());
        let outcome = Self {
            encryption_key: hash_sha256_parts(&[&inner[..], &peer_public[..]]),
            encryption_nonce: peer_mac.nonce_prefix(),
            decryption_key: hash_sha256_parts(&[&inner[..], &own_public[..]]),
            decryption_nonce: own_mac.nonce_prefix(),
        };
        inner.zeroize();
        outcome
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outcome").finish_non_exhaustive()
    }
}
