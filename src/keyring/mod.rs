// Keygate — Keyring Module
//
// The account/request backend behind the router. Holds the in-memory
// keyring state, persists it through the state store after mutations,
// and exposes the keyring-protocol wire methods through a single
// generic entry point.

mod backend;
mod error;
mod models;
mod protocol;

pub use backend::Keyring;
pub use error::KeyringError;
pub use models::{KeyringAccount, SigningRequest, State, ETH_METHODS};
pub use protocol::{KeyringMethod, KeyringRequest};
