// Network-key MAC: HMAC-SHA-512 truncated to 256 bits (libsodium `crypto_auth`).

use hmac::digest::{Key, KeyInit};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AuthFailure, HandshakeError, Result};

type HmacSha512 = Hmac<Sha512>;

/// Length of the network key.
pub const AUTH_KEY_BYTES: usize = 32;
/// Length of a truncated MAC tag.
pub const AUTH_BYTES: usize = 32;
/// Length of the session nonces cut from a MAC tag.
pub const NONCE_BYTES: usize = 24;

/// The pre-shared network discriminator ("app key").
///
/// Only holders of this key can tell handshake traffic from random noise.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct NetworkKey([u8; AUTH_KEY_BYTES]);

impl NetworkKey {
    pub fn new(key: [u8; AUTH_KEY_BYTES]) -> Self {
        Self(key)
    }

    /// Load a network key, rejecting anything but exactly 32 bytes.
    pub fn from_slice(key: &[u8]) -> Result<Self> {
        HandshakeError::check_len("network key", AUTH_KEY_BYTES, key.len())?;
        let mut bytes = [0u8; AUTH_KEY_BYTES];
        bytes.copy_from_slice(key);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; AUTH_KEY_BYTES] {
        &self.0
    }

    /// HMAC keyed with `K` zero-padded to the SHA-512 block, which is how
    /// HMAC treats any key shorter than a block.
    fn mac(&self) -> HmacSha512 {
        let mut block = Key::<HmacSha512>::default();
        block[..AUTH_KEY_BYTES].copy_from_slice(&self.0);
        let mac = <HmacSha512 as KeyInit>::new(&block);
        block.as_mut_slice().zeroize();
        mac
    }

    /// Compute `MAC(K, message)`.
    pub fn authenticate(&self, message: &[u8]) -> AuthTag {
        let mut mac = self.mac();
        mac.update(message);
        let full = mac.finalize().into_bytes();
        let mut tag = [0u8; AUTH_BYTES];
        tag.copy_from_slice(&full[..AUTH_BYTES]);
        AuthTag(tag)
    }

    /// Check `tag == MAC(K, message)` in constant time.
    pub fn verify(&self, tag: &AuthTag, message: &[u8]) -> Result<()> {
        let mut mac = self.mac();
        mac.update(message);
        mac.verify_truncated_left(&tag.0)
            .map_err(|_| HandshakeError::Authentication(AuthFailure::ChallengeMac))
    }
}

impl std::fmt::Debug for NetworkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NetworkKey(..)")
    }
}

/// A 32-byte MAC tag as carried in a challenge.
#[derive(Debug, Clone, Copy)]
pub struct AuthTag([u8; AUTH_BYTES]);

impl AuthTag {
    pub fn from_bytes(bytes: [u8; AUTH_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; AUTH_BYTES] {
        &self.0
    }

    /// The first 24 bytes, used as a post-handshake stream nonce.
    pub fn nonce_prefix(&self) -> [u8; NONCE_BYTES] {
        let mut nonce = [0u8; NONCE_BYTES];
        nonce.copy_from_slice(&self.0[..NONCE_BYTES]);
        nonce
    }
}
