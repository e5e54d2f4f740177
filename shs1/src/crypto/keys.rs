// Ed25519 identity keys, signing, and Ed25519 -> X25519 key conversion.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::error::{AuthFailure, HandshakeError, KeyRole, Result};

/// Length of an Ed25519 public key.
pub const PUBLIC_KEY_BYTES: usize = 32;
/// Length of an Ed25519 secret key in the `seed || public` layout.
pub const SECRET_KEY_BYTES: usize = 64;
/// Length of a detached Ed25519 signature.
pub const SIGNATURE_BYTES: usize = 64;

/// A long-term Ed25519 identity keypair.
#[derive(Clone)]
pub struct IdentityKeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl IdentityKeyPair {
    /// Generate a fresh random Ed25519 keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Reconstruct from a 32-byte secret seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Load a keypair from its 32-byte public key and 64-byte `seed || public`
    /// secret key.
    ///
    /// Both halves must agree: the public half embedded in `secret` and the
    /// key derived from the seed must each equal `public`.
    pub fn from_bytes(public: &[u8], secret: &[u8]) -> Result<Self> {
        HandshakeError::check_len("identity public key", PUBLIC_KEY_BYTES, public.len())?;
        HandshakeError::check_len("identity secret key", SECRET_KEY_BYTES, secret.len())?;

        let mut keypair = Zeroizing::new([0u8; SECRET_KEY_BYTES]);
        keypair.copy_from_slice(secret);
        let signing_key = SigningKey::from_keypair_bytes(&keypair)
            .map_err(|_| HandshakeError::KeyConversion(KeyRole::ClientIdentity))?;
        let verifying_key = signing_key.verifying_key();

        if !bool::from(verifying_key.as_bytes()[..].ct_eq(public)) {
            return Err(HandshakeError::KeyConversion(KeyRole::ClientIdentity));
        }

        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// The 32-byte Ed25519 public key.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_BYTES] {
        self.verifying_key.to_bytes()
    }

    /// The 64-byte `seed || public` secret key.
    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_BYTES]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// Access the raw verifying (public) key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Sign arbitrary data.
    pub fn sign(&self, data: &[u8]) -> [u8; SIGNATURE_BYTES] {
        let sig: Signature = self.signing_key.sign(data);
        sig.to_bytes()
    }

    /// The X25519 form of the signing secret: the clamped lower half of
    /// SHA-512(seed), exactly as libsodium's `sk_to_curve25519`.
    pub fn to_x25519_secret(&self) -> StaticSecret {
        StaticSecret::from(self.signing_key.to_scalar_bytes())
    }
}

impl std::fmt::Debug for IdentityKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityKeyPair")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}

/// Convert an Ed25519 public key to its X25519 (Montgomery) form.
///
/// Only points in the prime-order subgroup convert: undecodable, small-order
/// and mixed-order points are rejected. `role` names the key in the resulting
/// error.
pub fn public_to_x25519(public: &[u8; PUBLIC_KEY_BYTES], role: KeyRole) -> Result<PublicKey> {
    let vk = VerifyingKey::from_bytes(public).map_err(|_| HandshakeError::KeyConversion(role))?;
    if vk.is_weak() || !vk.to_edwards().is_torsion_free() {
        return Err(HandshakeError::KeyConversion(role));
    }
    Ok(PublicKey::from(vk.to_montgomery().to_bytes()))
}

/// Verify a detached signature given raw public key bytes.
///
/// A key that does not decode is a key-conversion error; a signature that does
/// not verify is an authentication error.
pub fn verify_signature(
    pubkey_bytes: &[u8; PUBLIC_KEY_BYTES],
    message: &[u8],
    signature: &[u8; SIGNATURE_BYTES],
) -> Result<()> {
    let vk = VerifyingKey::from_bytes(pubkey_bytes)
        .map_err(|_| HandshakeError::KeyConversion(KeyRole::ServerIdentity))?;
    let sig = Signature::from_bytes(signature);
    vk.verify_strict(message, &sig)
        .map_err(|_| HandshakeError::Authentication(AuthFailure::Signature))
}
