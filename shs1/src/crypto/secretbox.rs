// XSalsa20-Poly1305 secretbox (libsodium `crypto_secretbox_easy`) under a
// one-shot key.
//
// Handshake boxes always use the all-zero nonce. That is only sound while each
// key seals or opens exactly one message, so `OneShotKey` is consumed by the
// operation it performs.

use xsalsa20poly1305::aead::{Aead, KeyInit};
use xsalsa20poly1305::{Key, Nonce, XSalsa20Poly1305};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{AuthFailure, HandshakeError, Result};

/// Length of a secretbox key.
pub const KEY_BYTES: usize = 32;
/// Length of a secretbox nonce.
pub const NONCE_BYTES: usize = 24;
/// Bytes a secretbox adds to its plaintext (the Poly1305 tag).
pub const MAC_BYTES: usize = 16;

const ZERO_NONCE: [u8; NONCE_BYTES] = [0u8; NONCE_BYTES];

/// A secretbox key that can be used for a single seal or open.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct OneShotKey {
    key: [u8; KEY_BYTES],
}

impl OneShotKey {
    pub fn new(key: [u8; KEY_BYTES]) -> Self {
        Self { key }
    }

    fn cipher(&self) -> XSalsa20Poly1305 {
        XSalsa20Poly1305::new(Key::from_slice(&self.key))
    }

    /// Encrypt `plaintext` under the zero nonce.
    ///
    /// Returns `16-byte tag || ciphertext`, the NaCl secretbox layout.
    pub fn seal(self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.cipher()
            .encrypt(Nonce::from_slice(&ZERO_NONCE), plaintext)
            .map_err(|_| HandshakeError::Encryption)
    }

    /// Decrypt and authenticate a box sealed under the zero nonce.
    pub fn open(self, boxed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        self.cipher()
            .decrypt(Nonce::from_slice(&ZERO_NONCE), boxed)
            .map(Zeroizing::new)
            .map_err(|_| HandshakeError::Authentication(AuthFailure::Decryption))
    }
}

impl std::fmt::Debug for OneShotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OneShotKey(..)")
    }
}
