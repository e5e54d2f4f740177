// Handshake messages exchanged during SHS1, and the byte strings each side signs.
//
//   Client                                  Server
//     |--- Challenge: MAC(K, a_p) || a_p ------>|
//     |<-- Challenge: MAC(K, b_p) || b_p -------|
//     |--- ClientAuth: box[digest2](H) -------->|
//     |<-- ServerAuth: box[digest3](sig_B) -----|
//
// H = sig_A(K || B_p || hash(a_s * b_p)) || A_p

use zeroize::Zeroizing;

use crate::crypto::auth::{AuthTag, NetworkKey, AUTH_BYTES};
use crate::crypto::hash::SecretDigest;
use crate::crypto::keys::{PUBLIC_KEY_BYTES, SIGNATURE_BYTES};
use crate::crypto::secretbox::MAC_BYTES;
use crate::crypto::x25519::SCALARMULT_BYTES;
use crate::error::{HandshakeError, Result};

/// Size of either side's challenge.
pub const CHALLENGE_BYTES: usize = AUTH_BYTES + SCALARMULT_BYTES;
/// Size of the client's signed hello.
pub const HELLO_BYTES: usize = SIGNATURE_BYTES + PUBLIC_KEY_BYTES;
/// Size of the client's auth message.
pub const CLIENT_AUTH_BYTES: usize = HELLO_BYTES + MAC_BYTES;
/// Size of the server's auth message.
pub const SERVER_AUTH_BYTES: usize = SIGNATURE_BYTES + MAC_BYTES;

/// Message 1 / 2: a party's ephemeral key, tagged with the network key.
#[derive(Debug, Clone, Copy)]
pub struct Challenge {
    /// `MAC(K, ephemeral_pub)`.
    pub mac: AuthTag,
    /// The sender's ephemeral X25519 public key.
    pub ephemeral_pub: [u8; SCALARMULT_BYTES],
}

impl Challenge {
    /// Build a challenge for `ephemeral_pub` under `network_key`.
    pub fn new(network_key: &NetworkKey, ephemeral_pub: [u8; SCALARMULT_BYTES]) -> Self {
        Self {
            mac: network_key.authenticate(&ephemeral_pub),
            ephemeral_pub,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HandshakeError::check_len("challenge", CHALLENGE_BYTES, bytes.len())?;
        let mut mac = [0u8; AUTH_BYTES];
        mac.copy_from_slice(&bytes[..AUTH_BYTES]);
        let mut ephemeral_pub = [0u8; SCALARMULT_BYTES];
        ephemeral_pub.copy_from_slice(&bytes[AUTH_BYTES..]);
        Ok(Self {
            mac: AuthTag::from_bytes(mac),
            ephemeral_pub,
        })
    }

    pub fn to_bytes(&self) -> [u8; CHALLENGE_BYTES] {
        let mut out = [0u8; CHALLENGE_BYTES];
        out[..AUTH_BYTES].copy_from_slice(self.mac.as_bytes());
        out[AUTH_BYTES..].copy_from_slice(&self.ephemeral_pub);
        out
    }
}

/// The client's signed commitment: `sig_A(K || B_p || hash(s1)) || A_p`.
#[derive(Debug, Clone, Copy)]
pub struct Hello {
    pub signature: [u8; SIGNATURE_BYTES],
    pub public_key: [u8; PUBLIC_KEY_BYTES],
}

impl Hello {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HandshakeError::check_len("hello", HELLO_BYTES, bytes.len())?;
        let mut signature = [0u8; SIGNATURE_BYTES];
        signature.copy_from_slice(&bytes[..SIGNATURE_BYTES]);
        let mut public_key = [0u8; PUBLIC_KEY_BYTES];
        public_key.copy_from_slice(&bytes[SIGNATURE_BYTES..]);
        Ok(Self {
            signature,
            public_key,
        })
    }

    pub fn to_bytes(&self) -> [u8; HELLO_BYTES] {
        let mut out = [0u8; HELLO_BYTES];
        out[..SIGNATURE_BYTES].copy_from_slice(&self.signature);
        out[SIGNATURE_BYTES..].copy_from_slice(&self.public_key);
        out
    }
}

/// Message 3: the client's hello, boxed under `hash(K || s1 || s2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAuth([u8; CLIENT_AUTH_BYTES]);

impl ClientAuth {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HandshakeError::check_len("client auth", CLIENT_AUTH_BYTES, bytes.len())?;
        let mut out = [0u8; CLIENT_AUTH_BYTES];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; CLIENT_AUTH_BYTES] {
        &self.0
    }
}

/// Message 4: the server's signature, boxed under `hash(K || s1 || s2 || s3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerAuth([u8; SERVER_AUTH_BYTES]);

impl ServerAuth {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HandshakeError::check_len("server auth", SERVER_AUTH_BYTES, bytes.len())?;
        let mut out = [0u8; SERVER_AUTH_BYTES];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; SERVER_AUTH_BYTES] {
        &self.0
    }
}

/// Bytes the client signs: `K || B_p || hash(s1)`.
pub fn client_signed_payload(
    network_key: &NetworkKey,
    server_public: &[u8; PUBLIC_KEY_BYTES],
    shared_hash: &SecretDigest,
) -> Zeroizing<Vec<u8>> {
    concat(&[
        &network_key.as_bytes()[..],
        &server_public[..],
        &shared_hash.as_bytes()[..],
    ])
}

/// Bytes the server signs: `K || H || hash(s1)`.
pub fn server_signed_payload(
    network_key: &NetworkKey,
    hello: &Hello,
    shared_hash: &SecretDigest,
) -> Zeroizing<Vec<u8>> {
    concat(&[
        &network_key.as_bytes()[..],
        &hello.to_bytes()[..],
        &shared_hash.as_bytes()[..],
    ])
}

fn concat(parts: &[&[u8]]) -> Zeroizing<Vec<u8>> {
    let len = parts.iter().map(|p| p.len()).sum();
    let mut out = Zeroizing::new(Vec::with_capacity(len));
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}
