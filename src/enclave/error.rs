// Keygate — Enclave error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntropyError {
    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("Entropy request denied: {0}")]
    Denied(String),

    #[error("Entropy error: generated secret has insufficient entropy ({0} bytes, expected {1})")]
    InsufficientEntropy(usize, usize),
}
