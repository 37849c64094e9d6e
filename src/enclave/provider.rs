// Keygate — Platform Entropy Provider
//
// Serves deterministic, installation-scoped entropy to the router. A
// random master secret is generated once and stored in the platform
// keyring; every entropy request expands it with SHA-256 under the
// caller's salt label. Same installation, same salt — same entropy.
//
// Flow:
//   1. `get_or_create_master_secret()` — retrieves from keyring, or
//      generates + stores a new one on first use
//   2. `request_entropy(salt)` — SHA-256(master || 0x00 || salt), returned
//      as a 0x-prefixed hex string

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::EntropyError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Service name used to identify Keygate entries in the platform keyring.
const KEYRING_SERVICE: &str = "keygate-router";

/// Username for the keyring entry (identifies the master secret).
const KEYRING_USER: &str = "master-secret";

/// Length of the randomly generated master secret in bytes (256-bit entropy).
const MASTER_SECRET_LEN: usize = 32;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The host entropy service the router depends on. The host is trusted
/// to return deterministic, installation-scoped randomness; the router
/// never mixes in additional randomness of its own.
#[async_trait]
pub trait EntropySource: Send + Sync {
    /// Request entropy for the given salt label. Returns a 0x-prefixed
    /// hex string; the same salt always yields the same value within
    /// one installation.
    async fn request_entropy(&self, salt: &str) -> Result<String, EntropyError>;
}

// ─── Platform Implementation ─────────────────────────────────────────────────

/// Production entropy source using the `keyring` crate for the master
/// secret. Dispatches to:
///   - Linux: D-Bus Secret Service (GNOME Keyring / KDE Wallet)
///   - macOS: Security.framework Keychain
///   - Windows: Windows Credential Manager
pub struct PlatformEntropy {
    service: String,
    user: String,
}

impl PlatformEntropy {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        }
    }

    /// Creates a provider with custom service/user names (useful for testing isolation).
    #[allow(dead_code)]
    pub fn with_names(service: &str, user: &str) -> Self {
        Self {
            service: service.to_string(),
            user: user.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, EntropyError> {
        keyring::Entry::new(&self.service, &self.user)
            .map_err(|e| EntropyError::Keyring(format!("failed to create keyring entry: {}", e)))
    }

    /// Retrieve the master secret from the platform keyring. On first
    /// run, generates a new random master secret and stores it.
    fn get_or_create_master_secret(&self) -> Result<Zeroizing<Vec<u8>>, EntropyError> {
        let entry = self.entry()?;

        match entry.get_secret() {
            Ok(secret) => {
                tracing::debug!("Retrieved existing master secret from keyring");
                Ok(Zeroizing::new(secret))
            }
            Err(keyring::Error::NoEntry) => {
                tracing::info!("No master secret found — generating new one");
                let secret = Self::generate_master_secret()?;
                entry.set_secret(&secret).map_err(|e| {
                    EntropyError::Keyring(format!("failed to store master secret: {}", e))
                })?;
                tracing::info!("Master secret stored in platform keyring");
                Ok(secret)
            }
            Err(e) => Err(EntropyError::Keyring(format!(
                "failed to retrieve master secret: {}",
                e
            ))),
        }
    }

    /// Generate a cryptographically secure random master secret.
    fn generate_master_secret() -> Result<Zeroizing<Vec<u8>>, EntropyError> {
        let mut secret = Zeroizing::new(vec![0u8; MASTER_SECRET_LEN]);
        rand::thread_rng().fill_bytes(&mut secret);

        if secret.len() != MASTER_SECRET_LEN {
            return Err(EntropyError::InsufficientEntropy(
                secret.len(),
                MASTER_SECRET_LEN,
            ));
        }

        Ok(secret)
    }

    /// Expand the master secret under a salt label.
    /// entropy = SHA-256(master || 0x00 || salt)
    fn expand(master: &[u8], salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(master);
        hasher.update([0u8]);
        hasher.update(salt.as_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}

impl Default for PlatformEntropy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntropySource for PlatformEntropy {
    async fn request_entropy(&self, salt: &str) -> Result<String, EntropyError> {
        let master = self.get_or_create_master_secret()?;
        Ok(Self::expand(&master, salt))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
