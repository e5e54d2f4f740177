// Server side of SHS1, built from the crate's primitives, for driving the
// client in integration tests.

#![allow(dead_code)]

use shs1::crypto::auth::{AuthTag, NetworkKey};
use shs1::crypto::hash::SecretDigest;
use shs1::crypto::keys::{public_to_x25519, verify_signature, IdentityKeyPair};
use shs1::crypto::secretbox::OneShotKey;
use shs1::crypto::x25519::{scalar_mult, EphemeralKeyPair, SharedSecret};
use shs1::error::{HandshakeError, KeyRole, Result};
use shs1::handshake::messages::{
    client_signed_payload, server_signed_payload, Challenge, ClientAuth, Hello, CHALLENGE_BYTES,
    SERVER_AUTH_BYTES,
};
use shs1::{Client, Outcome};
use x25519_dalek::PublicKey;

pub const NETWORK_KEY: [u8; 32] = [
    0xd4, 0xa1, 0xcb, 0x88, 0xa6, 0x6f, 0x02, 0xf8, 0xdb, 0x63, 0x5c, 0xe2, 0x64, 0x41, 0xcc,
    0x5d, 0xac, 0x1b, 0x08, 0x42, 0x0c, 0xea, 0xac, 0x23, 0x08, 0x39, 0xb7, 0x55, 0x84, 0x5a,
    0x9f, 0xfb,
];

pub const CLIENT_SEED: [u8; 32] = [0x01; 32];
pub const SERVER_SEED: [u8; 32] = [0x02; 32];
pub const CLIENT_EPHEMERAL: [u8; 32] = [0x04; 32];
pub const SERVER_EPHEMERAL: [u8; 32] = [0x05; 32];

/// Everything a test needs to run one handshake with fixed keys.
pub struct Fixture {
    pub client_identity: IdentityKeyPair,
    pub server_identity: IdentityKeyPair,
    pub network_key: NetworkKey,
}

impl Fixture {
    pub fn fixed() -> Self {
        Self {
            client_identity: IdentityKeyPair::from_seed(&CLIENT_SEED),
            server_identity: IdentityKeyPair::from_seed(&SERVER_SEED),
            network_key: NetworkKey::new(NETWORK_KEY),
        }
    }

    pub fn random() -> Self {
        let mut key = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut key);
        Self {
            client_identity: IdentityKeyPair::generate(),
            server_identity: IdentityKeyPair::generate(),
            network_key: NetworkKey::new(key),
        }
    }

    pub fn client(&self, ephemeral: EphemeralKeyPair) -> Client {
        Client::new(
            &self.client_identity,
            ephemeral,
            &self.server_identity.public_key_bytes(),
            &self.network_key,
        )
    }

    pub fn server(&self, ephemeral: EphemeralKeyPair) -> MirrorServer {
        MirrorServer::new(self.server_identity.clone(), ephemeral, self.network_key.clone())
    }

    /// Client and server with the fixed ephemeral keys.
    pub fn pair(&self) -> (Client, MirrorServer) {
        (
            self.client(EphemeralKeyPair::from_secret_bytes(CLIENT_EPHEMERAL)),
            self.server(EphemeralKeyPair::from_secret_bytes(SERVER_EPHEMERAL)),
        )
    }
}

/// The server's half of the handshake, step for step.
pub struct MirrorServer {
    identity: IdentityKeyPair,
    ephemeral: EphemeralKeyPair,
    network_key: NetworkKey,
    own_mac: AuthTag,
    client_ephemeral: Option<[u8; 32]>,
    client_mac: Option<AuthTag>,
    secret1: Option<SharedSecret>,
    secret2: Option<SharedSecret>,
    shared_hash: Option<SecretDigest>,
    hello: Option<Hello>,
    master: Option<SecretDigest>,
}

impl MirrorServer {
    pub fn new(identity: IdentityKeyPair, ephemeral: EphemeralKeyPair, network_key: NetworkKey) -> Self {
        let own_mac = network_key.authenticate(&ephemeral.public_key_bytes());
        Self {
            identity,
            ephemeral,
            network_key,
            own_mac,
            client_ephemeral: None,
            client_mac: None,
            secret1: None,
            secret2: None,
            shared_hash: None,
            hello: None,
            master: None,
        }
    }

    pub fn create_challenge(&self) -> [u8; CHALLENGE_BYTES] {
        Challenge {
            mac: self.own_mac,
            ephemeral_pub: self.ephemeral.public_key_bytes(),
        }
        .to_bytes()
    }

    pub fn verify_client_challenge(&mut self, bytes: &[u8]) -> Result<()> {
        let challenge = Challenge::from_bytes(bytes)?;
        self.network_key
            .verify(&challenge.mac, &challenge.ephemeral_pub)?;

        let secret1 = self
            .ephemeral
            .diffie_hellman(&PublicKey::from(challenge.ephemeral_pub))?;
        self.shared_hash = Some(SecretDigest::of(&[&secret1.as_bytes()[..]]));
        self.secret1 = Some(secret1);
        self.client_ephemeral = Some(challenge.ephemeral_pub);
        self.client_mac = Some(challenge.mac);
        Ok(())
    }

    /// Open the client's auth and check its signed hello. Returns the
    /// client's long-term public key.
    pub fn verify_client_auth(&mut self, bytes: &[u8]) -> Result<[u8; 32]> {
        let auth = ClientAuth::from_bytes(bytes)?;
        let client_ephemeral = self.client_ephemeral.expect("client challenge verified");
        let secret1 = self.secret1.as_ref().expect("client challenge verified");

        let secret2 = scalar_mult(
            &self.identity.to_x25519_secret(),
            &PublicKey::from(client_ephemeral),
        )?;
        let box_key = SecretDigest::of(&[
            &self.network_key.as_bytes()[..],
            &secret1.as_bytes()[..],
            &secret2.as_bytes()[..],
        ]);
        let opened = OneShotKey::new(*box_key.as_bytes()).open(auth.as_bytes())?;
        let hello = Hello::from_bytes(&opened)?;

        let shared_hash = self.shared_hash.as_ref().expect("client challenge verified");
        let signed = client_signed_payload(
            &self.network_key,
            &self.identity.public_key_bytes(),
            shared_hash,
        );
        verify_signature(&hello.public_key, &signed, &hello.signature).map_err(|err| match err {
            HandshakeError::KeyConversion(_) => HandshakeError::KeyConversion(KeyRole::ClientIdentity),
            other => other,
        })?;

        self.secret2 = Some(secret2);
        self.hello = Some(hello);
        Ok(hello.public_key)
    }

    pub fn create_server_auth(&mut self) -> Result<[u8; SERVER_AUTH_BYTES]> {
        let identity = self.identity.clone();
        self.create_server_auth_signed_by(&identity)
    }

    /// Like `create_server_auth`, but with the signature made by `signer`
    /// instead of this server's identity.
    pub fn create_server_auth_signed_by(
        &mut self,
        signer: &IdentityKeyPair,
    ) -> Result<[u8; SERVER_AUTH_BYTES]> {
        let hello = self.hello.expect("client auth verified");
        let secret1 = self.secret1.as_ref().expect("client challenge verified");
        let secret2 = self.secret2.as_ref().expect("client auth verified");
        let shared_hash = self.shared_hash.as_ref().expect("client challenge verified");

        let client_x25519 = public_to_x25519(&hello.public_key, KeyRole::ClientIdentity)?;
        let secret3 = self.ephemeral.diffie_hellman(&client_x25519)?;
        let master = SecretDigest::of(&[
            &self.network_key.as_bytes()[..],
            &secret1.as_bytes()[..],
            &secret2.as_bytes()[..],
            &secret3.as_bytes()[..],
        ]);

        let signed = server_signed_payload(&self.network_key, &hello, shared_hash);
        let signature = signer.sign(&signed);
        let boxed = OneShotKey::new(*master.as_bytes()).seal(&signature)?;
        self.master = Some(master);

        let mut out = [0u8; SERVER_AUTH_BYTES];
        out.copy_from_slice(&boxed);
        Ok(out)
    }

    pub fn outcome(&self) -> Outcome {
        let hello = self.hello.expect("client auth verified");
        Outcome::derive(
            self.master.as_ref().expect("server auth created"),
            &hello.public_key,
            self.client_mac.as_ref().expect("client challenge verified"),
            &self.identity.public_key_bytes(),
            &self.own_mac,
        )
    }
}

/// Run a full handshake, returning both sides' outcomes.
pub fn run_handshake(client: &mut Client, server: &mut MirrorServer) -> Result<(Outcome, Outcome)> {
    server.verify_client_challenge(&client.create_challenge().to_bytes())?;
    client.verify_server_challenge(&server.create_challenge())?;
    let client_auth = client.create_client_auth()?;
    server.verify_client_auth(client_auth.as_bytes())?;
    let server_auth = server.create_server_auth()?;
    client.verify_server_auth(&server_auth)?;
    Ok((client.finish()?, server.outcome()))
}
