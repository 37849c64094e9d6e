// Keygate — Keyring error types

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Request not found: {0}")]
    RequestNotFound(Uuid),

    #[error("Account already exists for address {0}")]
    AccountExists(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Unknown keyring method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("State error: {0}")]
    State(#[from] crate::state::StateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
