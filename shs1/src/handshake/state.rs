// Client handshake state machine.
//
// Each variant carries only what exists at that point of the protocol, so a
// digest cannot be read before its shared secrets are computed. Secret fields
// are self-zeroizing; replacing a variant wipes what it held.

use crate::crypto::auth::AuthTag;
use crate::crypto::hash::SecretDigest;
use crate::crypto::x25519::{EphemeralKeyPair, SharedSecret, SCALARMULT_BYTES};
use crate::handshake::messages::Hello;

/// The current state of an SHS1 client handshake.
pub enum HandshakeState {
    /// Keys loaded, challenge ready to send.
    Initialized {
        /// The client's ephemeral keypair (a_p, a_s).
        ephemeral: EphemeralKeyPair,
    },

    /// Server challenge verified; the first shared secret is known.
    ChallengeVerified {
        ephemeral: EphemeralKeyPair,
        /// Server ephemeral public key (b_p).
        server_ephemeral: [u8; SCALARMULT_BYTES],
        /// `MAC(K, b_p)`, later the encryption nonce.
        server_mac: AuthTag,
        /// a_s * b_p.
        secret1: SharedSecret,
        /// hash(a_s * b_p).
        shared_hash: SecretDigest,
    },

    /// Client auth sent. The ephemeral secret is gone; the box key for the
    /// client auth was used once and never stored.
    AuthSent {
        server_ephemeral: [u8; SCALARMULT_BYTES],
        server_mac: AuthTag,
        secret1: SharedSecret,
        /// a_s * B_p.
        secret2: SharedSecret,
        shared_hash: SecretDigest,
        /// The hello the server is expected to have signed.
        hello: Hello,
    },

    /// Server authenticated; session keys can be derived.
    Authenticated {
        server_mac: AuthTag,
        /// hash(K || s1 || s2 || s3).
        master: SecretDigest,
    },

    /// Outcome handed to the caller. Terminal.
    Complete,

    /// A step failed or was called out of order. Terminal.
    Failed,
}

impl HandshakeState {
    /// Human-readable label for the current state (used in errors and logs).
    pub fn label(&self) -> &'static str {
        match self {
            HandshakeState::Initialized { .. } => "Initialized",
            HandshakeState::ChallengeVerified { .. } => "ChallengeVerified",
            HandshakeState::AuthSent { .. } => "AuthSent",
            HandshakeState::Authenticated { .. } => "Authenticated",
            HandshakeState::Complete => "Complete",
            HandshakeState::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, HandshakeState::Complete | HandshakeState::Failed)
    }
}

impl std::fmt::Debug for HandshakeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
