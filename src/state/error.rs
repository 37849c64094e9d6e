// Keygate — State error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("State snapshot is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
