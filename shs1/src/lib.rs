// SHS1: Secret Handshake client: mutual authentication and session key agreement
//
// Crate root: module declarations and public re-exports.

pub mod error;
pub mod crypto;
pub mod handshake;
#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export key types at crate root for convenience.
pub use error::{HandshakeError, Result};
pub use crypto::auth::NetworkKey;
pub use crypto::keys::IdentityKeyPair;
pub use crypto::x25519::EphemeralKeyPair;
pub use handshake::{Client, ClientBuilder, Outcome};
