// Crypto module declarations

pub mod auth;
pub mod hash;
pub mod keys;
pub mod secretbox;
pub mod x25519;
