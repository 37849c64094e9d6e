// Keygate — Library root
//
// Re-exports the router core and its collaborators: the keyring
// backend, state persistence, host entropy, gateway transport, and CLI.

pub mod cli;
pub mod enclave;
pub mod error;
pub mod gateway;
pub mod keyring;
pub mod router;
pub mod state;

pub use error::{GatewayError, Result};
