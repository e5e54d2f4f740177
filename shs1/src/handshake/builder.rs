// ClientBuilder: fluent API for collecting the inputs of a handshake.

use crate::crypto::auth::NetworkKey;
use crate::crypto::keys::{IdentityKeyPair, PUBLIC_KEY_BYTES};
use crate::crypto::x25519::EphemeralKeyPair;
use crate::error::{HandshakeError, Result};
use crate::handshake::client::Client;

/// Builder for a [`Client`].
///
/// # Example
/// ```ignore
/// let client = Client::builder()
///     .identity(&identity)
///     .ephemeral(EphemeralKeyPair::generate())
///     .server_public(&server_public)
///     .network_key(&network_key)
///     .build()?;
/// ```
#[derive(Default)]
pub struct ClientBuilder<'a> {
    identity: Option<&'a IdentityKeyPair>,
    ephemeral: Option<EphemeralKeyPair>,
    server_public: Option<[u8; PUBLIC_KEY_BYTES]>,
    network_key: Option<&'a NetworkKey>,
}

impl<'a> ClientBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The client's long-term signing keypair.
    pub fn identity(mut self, identity: &'a IdentityKeyPair) -> Self {
        self.identity = Some(identity);
        self
    }

    /// A fresh ephemeral keypair, used for this handshake only.
    pub fn ephemeral(mut self, ephemeral: EphemeralKeyPair) -> Self {
        self.ephemeral = Some(ephemeral);
        self
    }

    /// The server's long-term public key, known out of band.
    pub fn server_public(mut self, server_public: &[u8; PUBLIC_KEY_BYTES]) -> Self {
        self.server_public = Some(*server_public);
        self
    }

    pub fn network_key(mut self, network_key: &'a NetworkKey) -> Self {
        self.network_key = Some(network_key);
        self
    }

    /// Consume the builder and produce a [`Client`] in the initial state.
    pub fn build(self) -> Result<Client> {
        let identity = self
            .identity
            .ok_or(HandshakeError::MissingField("identity keypair"))?;
        let ephemeral = self
            .ephemeral
            .ok_or(HandshakeError::MissingField("ephemeral keypair"))?;
        let server_public = self
            .server_public
            .ok_or(HandshakeError::MissingField("server public key"))?;
        let network_key = self
            .network_key
            .ok_or(HandshakeError::MissingField("network key"))?;

        Ok(Client::new(identity, ephemeral, &server_public, network_key))
    }
}
