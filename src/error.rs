// Keygate — Top-level error types
//
// Aggregates errors from the state, enclave, and keyring modules into a
// single error enum for the routing boundary. The first two variants are
// produced locally by the router; everything else passes through from a
// collaborator unchanged.

use thiserror::Error;

/// Top-level error type for all Keygate routing operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Origin '{origin}' is not allowed to call '{method}'")]
    Unauthorized { origin: String, method: String },

    #[error("Method not supported: {0}")]
    MethodNotSupported(String),

    #[error("State error: {0}")]
    State(#[from] crate::state::StateError),

    #[error("Entropy error: {0}")]
    Entropy(#[from] crate::enclave::EntropyError),

    #[error("Keyring error: {0}")]
    Keyring(#[from] crate::keyring::KeyringError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
