// SHS1 error types

use thiserror::Error;

/// Which key a [`HandshakeError::KeyConversion`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// The client's long-term Ed25519 keypair.
    ClientIdentity,
    /// The client's ephemeral X25519 keypair.
    ClientEphemeral,
    /// The server's long-term Ed25519 public key.
    ServerIdentity,
}

impl KeyRole {
    pub fn label(self) -> &'static str {
        match self {
            KeyRole::ClientIdentity => "client identity",
            KeyRole::ClientEphemeral => "client ephemeral",
            KeyRole::ServerIdentity => "server identity",
        }
    }
}

/// Which check rejected the peer during an [`HandshakeError::Authentication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// The server challenge MAC did not verify under the network key.
    ChallengeMac,
    /// The server auth box did not open under the derived key.
    Decryption,
    /// The server's signature over the client hello did not verify.
    Signature,
}

/// Coarse error class, one per row of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    InputShape,
    KeyConversion,
    GroupOperation,
    Authentication,
    Protocol,
}

/// Top-level error type for the SHS1 crate.
///
/// Every variant is fatal to the handshake attempt it came from. Messages
/// never carry key or digest bytes.
#[derive(Debug, Error)]
pub enum HandshakeError {
    // ── Input shape ─────────────────────────────────────────────────────
    #[error("invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    // ── Key conversion ──────────────────────────────────────────────────
    #[error("malformed {} key", .0.label())]
    KeyConversion(KeyRole),

    // ── Group operation ─────────────────────────────────────────────────
    #[error("scalar multiplication produced a non-contributory point")]
    GroupOperation,

    // ── Authentication ──────────────────────────────────────────────────
    #[error("peer authentication failed")]
    Authentication(AuthFailure),

    #[error("secretbox encryption failed")]
    Encryption,

    // ── Protocol misuse ─────────────────────────────────────────────────
    #[error("invalid handshake state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("client builder is missing {0}")]
    MissingField(&'static str),
}

impl HandshakeError {
    /// The taxonomy class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            HandshakeError::InvalidLength { .. } => ErrorClass::InputShape,
            HandshakeError::KeyConversion(_) => ErrorClass::KeyConversion,
            HandshakeError::GroupOperation => ErrorClass::GroupOperation,
            HandshakeError::Authentication(_) => ErrorClass::Authentication,
            HandshakeError::Encryption
            | HandshakeError::InvalidStateTransition { .. }
            | HandshakeError::MissingField(_) => ErrorClass::Protocol,
        }
    }

    pub(crate) fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(HandshakeError::InvalidLength {
                field,
                expected,
                actual,
            })
        }
    }
}

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, HandshakeError>;
