// X25519 Diffie-Hellman for the three handshake shared secrets.

use rand::rngs::OsRng;
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{HandshakeError, KeyRole, Result};

/// Length of an X25519 public key, secret key, and shared secret.
pub const SCALARMULT_BYTES: usize = 32;

/// Raw X25519 output. Never used as a key directly; it is always hashed first.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SCALARMULT_BYTES]);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; SCALARMULT_BYTES] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

/// `secret * peer`, rejecting the all-zero output produced by low-order
/// points.
pub fn scalar_mult(secret: &StaticSecret, peer: &PublicKey) -> Result<SharedSecret> {
    let shared = secret.diffie_hellman(peer);
    if !shared.was_contributory() {
        return Err(HandshakeError::GroupOperation);
    }
    Ok(SharedSecret(*shared.as_bytes()))
}

/// An X25519 ephemeral keypair for one handshake.
///
/// Deliberately not `Clone`: a handshake takes the pair by value, so the same
/// ephemeral secret cannot feed two handshakes.
pub struct EphemeralKeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl EphemeralKeyPair {
    /// Generate a new random ephemeral keypair.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Create from existing secret bytes (used in deterministic tests).
    pub fn from_secret_bytes(bytes: [u8; SCALARMULT_BYTES]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Load a caller-supplied pair, checking that `public` belongs to `secret`.
    pub fn from_bytes(public: &[u8], secret: &[u8]) -> Result<Self> {
        HandshakeError::check_len("ephemeral public key", SCALARMULT_BYTES, public.len())?;
        HandshakeError::check_len("ephemeral secret key", SCALARMULT_BYTES, secret.len())?;

        let mut bytes = [0u8; SCALARMULT_BYTES];
        bytes.copy_from_slice(secret);
        let pair = Self::from_secret_bytes(bytes);
        bytes.zeroize();

        if !bool::from(pair.public.as_bytes()[..].ct_eq(public)) {
            return Err(HandshakeError::KeyConversion(KeyRole::ClientEphemeral));
        }
        Ok(pair)
    }

    /// The 32-byte public key.
    pub fn public_key_bytes(&self) -> [u8; SCALARMULT_BYTES] {
        *self.public.as_bytes()
    }

    /// Perform Diffie-Hellman with a peer's public key.
    pub fn diffie_hellman(&self, peer_public: &PublicKey) -> Result<SharedSecret> {
        scalar_mult(&self.secret, peer_public)
    }
}

impl std::fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralKeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}
