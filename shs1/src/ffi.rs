// C FFI bindings for the SHS1 client.
//
// All functions return SHS1_OK (0) on success and a negative SHS1_ERR_* code
// on failure; no failure is ever reported as a positive value.
// Buffers are caller-allocated with the fixed sizes documented per function.

use std::slice;

use crate::crypto::auth::{AUTH_KEY_BYTES, NONCE_BYTES};
use crate::crypto::hash::HASH_BYTES;
use crate::crypto::keys::{PUBLIC_KEY_BYTES, SECRET_KEY_BYTES};
use crate::crypto::x25519::SCALARMULT_BYTES;
use crate::error::{ErrorClass, HandshakeError};
use crate::handshake::messages::{CHALLENGE_BYTES, CLIENT_AUTH_BYTES, SERVER_AUTH_BYTES};
use crate::handshake::Client;

// ── Return codes ─────────────────────────────────────────────────────────

pub const SHS1_OK: i32 = 0;
/// A required pointer was null.
pub const SHS1_ERR_NULL: i32 = -1;
/// An input had the wrong length.
pub const SHS1_ERR_INPUT: i32 = -2;
/// A key was malformed or did not match the other half of its pair.
pub const SHS1_ERR_KEY_CONVERSION: i32 = -3;
/// A Diffie-Hellman result was degenerate.
pub const SHS1_ERR_GROUP: i32 = -4;
/// The server failed to authenticate.
pub const SHS1_ERR_AUTH: i32 = -5;
/// A step was called out of order, or on a failed handshake.
pub const SHS1_ERR_PROTOCOL: i32 = -6;

/// Session keys and nonces, laid out for C.
#[repr(C)]
pub struct Shs1Outcome {
    pub encryption_key: [u8; HASH_BYTES],
    pub encryption_nonce: [u8; NONCE_BYTES],
    pub decryption_key: [u8; HASH_BYTES],
    pub decryption_nonce: [u8; NONCE_BYTES],
}

fn error_code(err: &HandshakeError) -> i32 {
    match err.class() {
        ErrorClass::InputShape => SHS1_ERR_INPUT,
        ErrorClass::KeyConversion => SHS1_ERR_KEY_CONVERSION,
        ErrorClass::GroupOperation => SHS1_ERR_GROUP,
        ErrorClass::Authentication => SHS1_ERR_AUTH,
        ErrorClass::Protocol => SHS1_ERR_PROTOCOL,
    }
}

fn status(result: crate::error::Result<()>) -> i32 {
    match result {
        Ok(()) => SHS1_OK,
        Err(err) => error_code(&err),
    }
}

// ── Lifecycle ────────────────────────────────────────────────────────────

/// Create a client handshake.
///
/// `public_key`: 32-byte Ed25519 public key.
/// `secret_key`: 64-byte Ed25519 secret key (`seed || public`).
/// `server_public_key`: 32-byte Ed25519 public key of the server.
/// `network_key`: 32-byte network key.
/// `ephemeral_public`, `ephemeral_secret`: 32-byte X25519 keypair, fresh per handshake.
/// `client_out`: receives an owned handle; release it with [`shs1_free_client`].
///
/// # Safety
/// Every pointer must be null or valid for the documented length.
#[no_mangle]
pub unsafe extern "C" fn shs1_init_client(
    public_key: *const u8,
    secret_key: *const u8,
    server_public_key: *const u8,
    network_key: *const u8,
    ephemeral_public: *const u8,
    ephemeral_secret: *const u8,
    client_out: *mut *mut Client,
) -> i32 {
    if public_key.is_null()
        || secret_key.is_null()
        || server_public_key.is_null()
        || network_key.is_null()
        || ephemeral_public.is_null()
        || ephemeral_secret.is_null()
        || client_out.is_null()
    {
        return SHS1_ERR_NULL;
    }

    let result = unsafe {
        Client::from_slices(
            slice::from_raw_parts(public_key, PUBLIC_KEY_BYTES),
            slice::from_raw_parts(secret_key, SECRET_KEY_BYTES),
            slice::from_raw_parts(server_public_key, PUBLIC_KEY_BYTES),
            slice::from_raw_parts(network_key, AUTH_KEY_BYTES),
            slice::from_raw_parts(ephemeral_public, SCALARMULT_BYTES),
            slice::from_raw_parts(ephemeral_secret, SCALARMULT_BYTES),
        )
    };

    match result {
        Ok(client) => {
            unsafe { *client_out = Box::into_raw(Box::new(client)) };
            SHS1_OK
        }
        Err(err) => error_code(&err),
    }
}

/// Release a client created by [`shs1_init_client`]. Secrets are wiped.
///
/// # Safety
/// `client` must be null or a handle from `shs1_init_client` not yet freed.
#[no_mangle]
pub unsafe extern "C" fn shs1_free_client(client: *mut Client) {
    if !client.is_null() {
        drop(unsafe { Box::from_raw(client) });
    }
}

// ── Protocol steps ───────────────────────────────────────────────────────

/// Write the 64-byte client challenge to `challenge_out`.
///
/// # Safety
/// `client` must be a live handle; `challenge_out` must hold 64 bytes.
#[no_mangle]
pub unsafe extern "C" fn shs1_create_client_challenge(
    client: *const Client,
    challenge_out: *mut u8,
) -> i32 {
    if client.is_null() || challenge_out.is_null() {
        return SHS1_ERR_NULL;
    }
    let client = unsafe { &*client };
    let bytes = client.create_challenge().to_bytes();
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), challenge_out, CHALLENGE_BYTES);
    }
    SHS1_OK
}

/// Verify the server's 64-byte challenge.
///
/// # Safety
/// `client` must be a live handle; `challenge` must hold 64 bytes.
#[no_mangle]
pub unsafe extern "C" fn shs1_verify_server_challenge(
    client: *mut Client,
    challenge: *const u8,
) -> i32 {
    if client.is_null() || challenge.is_null() {
        return SHS1_ERR_NULL;
    }
    let client = unsafe { &mut *client };
    let challenge = unsafe { slice::from_raw_parts(challenge, CHALLENGE_BYTES) };
    status(client.verify_server_challenge(challenge))
}

/// Write the 112-byte client auth message to `auth_out`.
///
/// # Safety
/// `client` must be a live handle; `auth_out` must hold 112 bytes.
#[no_mangle]
pub unsafe extern "C" fn shs1_create_client_auth(client: *mut Client, auth_out: *mut u8) -> i32 {
    if client.is_null() || auth_out.is_null() {
        return SHS1_ERR_NULL;
    }
    let client = unsafe { &mut *client };
    match client.create_client_auth() {
        Ok(auth) => {
            unsafe {
                std::ptr::copy_nonoverlapping(auth.as_bytes().as_ptr(), auth_out, CLIENT_AUTH_BYTES);
            }
            SHS1_OK
        }
        Err(err) => error_code(&err),
    }
}

/// Verify the server's 80-byte auth message.
///
/// # Safety
/// `client` must be a live handle; `auth` must hold 80 bytes.
#[no_mangle]
pub unsafe extern "C" fn shs1_verify_server_auth(client: *mut Client, auth: *const u8) -> i32 {
    if client.is_null() || auth.is_null() {
        return SHS1_ERR_NULL;
    }
    let client = unsafe { &mut *client };
    let auth = unsafe { slice::from_raw_parts(auth, SERVER_AUTH_BYTES) };
    status(client.verify_server_auth(auth))
}

/// Derive the session outcome into `outcome_out`. The handle stays valid
/// but rejects further steps; free it afterwards.
///
/// # Safety
/// `client` must be a live handle; `outcome_out` must point to writable memory.
#[no_mangle]
pub unsafe extern "C" fn shs1_client_outcome(
    client: *mut Client,
    outcome_out: *mut Shs1Outcome,
) -> i32 {
    if client.is_null() || outcome_out.is_null() {
        return SHS1_ERR_NULL;
    }
    let client = unsafe { &mut *client };
    match client.finish() {
        Ok(outcome) => {
            unsafe {
                outcome_out.write(Shs1Outcome {
                    encryption_key: outcome.encryption_key,
                    encryption_nonce: outcome.encryption_nonce,
                    decryption_key: outcome.decryption_key,
                    decryption_nonce: outcome.decryption_nonce,
                });
            }
            SHS1_OK
        }
        Err(err) => error_code(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::auth::NetworkKey;
    use crate::crypto::keys::IdentityKeyPair;
    use crate::crypto::x25519::EphemeralKeyPair;

    struct Inputs {
        public: [u8; 32],
        secret: [u8; 64],
        server: [u8; 32],
        network: [u8; 32],
        eph_public: [u8; 32],
        eph_secret: [u8; 32],
    }

    fn inputs() -> Inputs {
        let identity = IdentityKeyPair::from_seed(&[7u8; 32]);
        let server = IdentityKeyPair::from_seed(&[8u8; 32]);
        Inputs {
            public: identity.public_key_bytes(),
            secret: *identity.secret_key_bytes(),
            server: server.public_key_bytes(),
            network: [9u8; 32],
            eph_public: EphemeralKeyPair::from_secret_bytes([10u8; 32]).public_key_bytes(),
            eph_secret: [10u8; 32],
        }
    }

    unsafe fn init(inputs: &Inputs, out: &mut *mut Client) -> i32 {
        unsafe {
            shs1_init_client(
                inputs.public.as_ptr(),
                inputs.secret.as_ptr(),
                inputs.server.as_ptr(),
                inputs.network.as_ptr(),
                inputs.eph_public.as_ptr(),
                inputs.eph_secret.as_ptr(),
                out,
            )
        }
    }

    #[test]
    fn null_pointers_rejected() {
        let inputs = inputs();
        let rc = unsafe {
            shs1_init_client(
                std::ptr::null(),
                inputs.secret.as_ptr(),
                inputs.server.as_ptr(),
                inputs.network.as_ptr(),
                inputs.eph_public.as_ptr(),
                inputs.eph_secret.as_ptr(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(rc, SHS1_ERR_NULL);

        let mut buf = [0u8; 64];
        let rc = unsafe { shs1_create_client_challenge(std::ptr::null(), buf.as_mut_ptr()) };
        assert_eq!(rc, SHS1_ERR_NULL);

        unsafe { shs1_free_client(std::ptr::null_mut()) };
    }

    #[test]
    fn challenge_matches_rust_api() {
        let inputs = inputs();
        let mut client = std::ptr::null_mut();
        assert_eq!(unsafe { init(&inputs, &mut client) }, SHS1_OK);

        let mut challenge = [0u8; CHALLENGE_BYTES];
        let rc = unsafe { shs1_create_client_challenge(client, challenge.as_mut_ptr()) };
        assert_eq!(rc, SHS1_OK);

        let expected = NetworkKey::new(inputs.network).authenticate(&inputs.eph_public);
        assert_eq!(&challenge[..32], expected.as_bytes());
        assert_eq!(&challenge[32..], &inputs.eph_public);

        unsafe { shs1_free_client(client) };
    }

    #[test]
    fn mismatched_ephemeral_keypair_rejected() {
        let mut inputs = inputs();
        inputs.eph_public[0] ^= 1;
        let mut client = std::ptr::null_mut();
        let rc = unsafe { init(&inputs, &mut client) };
        assert_eq!(rc, SHS1_ERR_KEY_CONVERSION);
        assert!(client.is_null());
    }

    #[test]
    fn failures_are_negative_codes() {
        let inputs = inputs();
        let mut client = std::ptr::null_mut();
        assert_eq!(unsafe { init(&inputs, &mut client) }, SHS1_OK);

        let bogus = [0u8; CHALLENGE_BYTES];
        let rc = unsafe { shs1_verify_server_challenge(client, bogus.as_ptr()) };
        assert_eq!(rc, SHS1_ERR_AUTH);

        let mut auth = [0u8; CLIENT_AUTH_BYTES];
        let rc = unsafe { shs1_create_client_auth(client, auth.as_mut_ptr()) };
        assert_eq!(rc, SHS1_ERR_PROTOCOL);

        let mut outcome = std::mem::MaybeUninit::<Shs1Outcome>::uninit();
        let rc = unsafe { shs1_client_outcome(client, outcome.as_mut_ptr()) };
        assert_eq!(rc, SHS1_ERR_PROTOCOL);

        unsafe { shs1_free_client(client) };
    }
}
