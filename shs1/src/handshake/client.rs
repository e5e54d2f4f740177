// SHS1 client: the four protocol steps plus outcome derivation.
//
//   Client                         Server
//     |--- create_challenge ------->|
//     |<-- verify_server_challenge -|
//     |--- create_client_auth ----->|
//     |<-- verify_server_auth ------|
//     |    finish -> Outcome        |

use x25519_dalek::PublicKey;

use crate::crypto::auth::{AuthTag, NetworkKey};
use crate::crypto::hash::SecretDigest;
use crate::crypto::keys::{public_to_x25519, verify_signature, IdentityKeyPair, PUBLIC_KEY_BYTES, SIGNATURE_BYTES};
use crate::crypto::secretbox::OneShotKey;
use crate::crypto::x25519::{scalar_mult, EphemeralKeyPair, SCALARMULT_BYTES};
use crate::error::{HandshakeError, KeyRole, Result};
use crate::handshake::builder::ClientBuilder;
use crate::handshake::messages::{
    client_signed_payload, server_signed_payload, Challenge, ClientAuth, Hello, ServerAuth,
};
use crate::handshake::outcome::Outcome;
use crate::handshake::state::HandshakeState;

/// Client side of one SHS1 handshake.
///
/// A `Client` is good for exactly one attempt. Any error moves it to the
/// `Failed` state, wiping the per-session secrets it held, and every later
/// step is rejected. Start over with a new `Client` and a fresh ephemeral
/// keypair to retry.
///
/// The client keeps its own copies of the identity keypair and network key
/// while the handshake is live. Both copies are dropped on `Complete` and on
/// `Failed`, together with the per-session secrets.
pub struct Client {
    keys: Option<LongTermKeys>,
    server_public: [u8; PUBLIC_KEY_BYTES],
    ephemeral_public: [u8; SCALARMULT_BYTES],
    /// `MAC(K, a_p)`, later the decryption nonce.
    app_mac: AuthTag,
    state: HandshakeState,
}

/// Long-term secrets held for the lifetime of one handshake.
struct LongTermKeys {
    identity: IdentityKeyPair,
    network_key: NetworkKey,
}

impl Client {
    /// Start a handshake towards the server identified by `server_public`.
    ///
    /// The ephemeral keypair is consumed: it belongs to this handshake only.
    pub fn new(
        identity: &IdentityKeyPair,
        ephemeral: EphemeralKeyPair,
        server_public: &[u8; PUBLIC_KEY_BYTES],
        network_key: &NetworkKey,
    ) -> Self {
        let ephemeral_public = ephemeral.public_key_bytes();
        let app_mac = network_key.authenticate(&ephemeral_public);

        tracing::debug!(state = "Initialized", "shs1 client created");

        Self {
            keys: Some(LongTermKeys {
                identity: identity.clone(),
                network_key: network_key.clone(),
            }),
            server_public: *server_public,
            ephemeral_public,
            app_mac,
            state: HandshakeState::Initialized { ephemeral },
        }
    }

    /// Start a handshake from raw key bytes, checking every length.
    ///
    /// `secret` is the 64-byte `seed || public` Ed25519 secret key. The
    /// ephemeral pair is X25519.
    pub fn from_slices(
        public: &[u8],
        secret: &[u8],
        server_public: &[u8],
        network_key: &[u8],
        ephemeral_public: &[u8],
        ephemeral_secret: &[u8],
    ) -> Result<Self> {
        let identity = IdentityKeyPair::from_bytes(public, secret)?;
        HandshakeError::check_len("server public key", PUBLIC_KEY_BYTES, server_public.len())?;
        let mut server = [0u8; PUBLIC_KEY_BYTES];
        server.copy_from_slice(server_public);
        let network_key = NetworkKey::from_slice(network_key)?;
        let ephemeral = EphemeralKeyPair::from_bytes(ephemeral_public, ephemeral_secret)?;

        Ok(Self::new(&identity, ephemeral, &server, &network_key))
    }

    /// Builder-style construction.
    pub fn builder<'a>() -> ClientBuilder<'a> {
        ClientBuilder::new()
    }

    /// Label of the current state.
    pub fn state_label(&self) -> &'static str {
        self.state.label()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, HandshakeState::Failed)
    }

    /// Step 1: the client challenge, `MAC(K, a_p) || a_p`.
    pub fn create_challenge(&self) -> Challenge {
        Challenge {
            mac: self.app_mac,
            ephemeral_pub: self.ephemeral_public,
        }
    }

    /// Step 2: check the server's challenge and compute `a_s * b_p`.
    pub fn verify_server_challenge(&mut self, challenge: &[u8]) -> Result<()> {
        self.advance("ChallengeVerified", |client, state| {
            let ephemeral = match state {
                HandshakeState::Initialized { ephemeral } => ephemeral,
                other => return Err(client.out_of_order(&other, "ChallengeVerified")),
            };

            let keys = client.long_term_keys("ChallengeVerified")?;
            let challenge = Challenge::from_bytes(challenge)?;
            keys.network_key.verify(&challenge.mac, &challenge.ephemeral_pub)?;

            let secret1 = ephemeral.diffie_hellman(&PublicKey::from(challenge.ephemeral_pub))?;
            let shared_hash = SecretDigest::of(&[&secret1.as_bytes()[..]]);

            Ok((
                HandshakeState::ChallengeVerified {
                    ephemeral,
                    server_ephemeral: challenge.ephemeral_pub,
                    server_mac: challenge.mac,
                    secret1,
                    shared_hash,
                },
                (),
            ))
        })
    }

    /// Step 3: sign the hello and box it under `hash(K || s1 || s2)`.
    pub fn create_client_auth(&mut self) -> Result<ClientAuth> {
        self.advance("AuthSent", |client, state| {
            let (ephemeral, server_ephemeral, server_mac, secret1, shared_hash) = match state {
                HandshakeState::ChallengeVerified {
                    ephemeral,
                    server_ephemeral,
                    server_mac,
                    secret1,
                    shared_hash,
                } => (ephemeral, server_ephemeral, server_mac, secret1, shared_hash),
                other => return Err(client.out_of_order(&other, "AuthSent")),
            };
            let keys = client.long_term_keys("AuthSent")?;

            let server_x25519 = public_to_x25519(&client.server_public, KeyRole::ServerIdentity)?;
            let secret2 = ephemeral.diffie_hellman(&server_x25519)?;
            // The ephemeral secret is not needed past this point.
            drop(ephemeral);

            let box_key = SecretDigest::of(&[
                &keys.network_key.as_bytes()[..],
                &secret1.as_bytes()[..],
                &secret2.as_bytes()[..],
            ]);

            let signed = client_signed_payload(&keys.network_key, &client.server_public, &shared_hash);
            let hello = Hello {
                signature: keys.identity.sign(&signed),
                public_key: keys.identity.public_key_bytes(),
            };

            let boxed = OneShotKey::new(*box_key.as_bytes()).seal(&hello.to_bytes())?;
            let auth = ClientAuth::from_bytes(&boxed)?;

            Ok((
                HandshakeState::AuthSent {
                    server_ephemeral,
                    server_mac,
                    secret1,
                    secret2,
                    shared_hash,
                    hello,
                },
                auth,
            ))
        })
    }

    /// Step 4: compute `A_s * b_p`, open the server's box, and check its
    /// signature over `K || H || hash(s1)`.
    pub fn verify_server_auth(&mut self, auth: &[u8]) -> Result<()> {
        self.advance("Authenticated", |client, state| {
            let (server_ephemeral, server_mac, secret1, secret2, shared_hash, hello) = match state {
                HandshakeState::AuthSent {
                    server_ephemeral,
                    server_mac,
                    secret1,
                    secret2,
                    shared_hash,
                    hello,
                } => (server_ephemeral, server_mac, secret1, secret2, shared_hash, hello),
                other => return Err(client.out_of_order(&other, "Authenticated")),
            };
            let keys = client.long_term_keys("Authenticated")?;

            let auth = ServerAuth::from_bytes(auth)?;

            let client_x25519 = keys.identity.to_x25519_secret();
            let secret3 = scalar_mult(&client_x25519, &PublicKey::from(server_ephemeral))?;

            let master = SecretDigest::of(&[
                &keys.network_key.as_bytes()[..],
                &secret1.as_bytes()[..],
                &secret2.as_bytes()[..],
                &secret3.as_bytes()[..],
            ]);

            let opened = OneShotKey::new(*master.as_bytes()).open(auth.as_bytes())?;
            HandshakeError::check_len("server signature", SIGNATURE_BYTES, opened.len())?;
            let mut signature = [0u8; SIGNATURE_BYTES];
            signature.copy_from_slice(&opened);

            let expected = server_signed_payload(&keys.network_key, &hello, &shared_hash);
            verify_signature(&client.server_public, &expected, &signature)?;

            Ok((HandshakeState::Authenticated { server_mac, master }, ()))
        })
    }

    /// Derive the session keys and nonces. The handshake secrets and the
    /// long-term key copies are wiped and the client moves to `Complete`.
    pub fn finish(&mut self) -> Result<Outcome> {
        self.advance("Complete", |client, state| {
            let (server_mac, master) = match state {
                HandshakeState::Authenticated { server_mac, master } => (server_mac, master),
                other => return Err(client.out_of_order(&other, "Complete")),
            };
            let keys = client.long_term_keys("Complete")?;

            let outcome = Outcome::derive(
                &master,
                &client.server_public,
                &server_mac,
                &keys.identity.public_key_bytes(),
                &client.app_mac,
            );
            Ok((HandshakeState::Complete, outcome))
        })
    }

    /// Consume the client and return the outcome of a finished handshake.
    pub fn into_outcome(mut self) -> Result<Outcome> {
        self.finish()
    }

    /// Run one step: take the current state, leave `Failed` behind, and only
    /// install the next state if the step succeeds. Long-term keys are
    /// released once the client reaches a terminal state.
    fn advance<T>(
        &mut self,
        to: &'static str,
        step: impl FnOnce(&Self, HandshakeState) -> Result<(HandshakeState, T)>,
    ) -> Result<T> {
        let state = std::mem::replace(&mut self.state, HandshakeState::Failed);
        let from = state.label();

        match step(self, state) {
            Ok((next, value)) => {
                tracing::debug!(from, to, "shs1 client state transition");
                if next.is_terminal() {
                    self.keys = None;
                }
                self.state = next;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(from, to, class = ?err.class(), "shs1 handshake aborted");
                self.keys = None;
                Err(err)
            }
        }
    }

    fn long_term_keys(&self, to: &'static str) -> Result<&LongTermKeys> {
        self.keys
            .as_ref()
            .ok_or(HandshakeError::InvalidStateTransition { from: "Failed", to })
    }

    fn out_of_order(&self, state: &HandshakeState, to: &'static str) -> HandshakeError {
        HandshakeError::InvalidStateTransition {
            from: state.label(),
            to,
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
