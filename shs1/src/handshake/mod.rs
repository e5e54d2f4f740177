// SHS1 client handshake: messages, state machine and session outcome.

pub mod builder;
pub mod client;
pub mod messages;
pub mod outcome;
pub mod state;

pub use builder::ClientBuilder;
pub use client::Client;
pub use messages::{Challenge, ClientAuth, Hello, ServerAuth};
pub use outcome::Outcome;
pub use state::HandshakeState;
