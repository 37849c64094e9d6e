// Keygate — Entropy Deriver
//
// Turns host-provided deterministic entropy into canonical private-key
// material. The host scopes the entropy to this installation; this
// component only strips the presentation prefix and wraps the value in
// a zeroizing container. No fallback randomness source exists — one
// would break the determinism invariant.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::enclave::{EntropyError, EntropySource};

/// Salt label dedicated to signing-key derivation.
pub const SIGNING_KEY_SALT: &str = "signing key";

pub struct EntropyDeriver {
    source: Arc<dyn EntropySource>,
}

impl EntropyDeriver {
    pub fn new(source: Arc<dyn EntropySource>) -> Self {
        Self { source }
    }

    /// Request signing-key entropy from the host and normalize it into
    /// the hex encoding account creation expects (no 0x prefix, value
    /// otherwise unchanged). Host failures propagate unchanged.
    pub async fn derive_signing_key(&self) -> Result<Zeroizing<String>, EntropyError> {
        let entropy = Zeroizing::new(self.source.request_entropy(SIGNING_KEY_SALT).await?);
        let stripped = entropy.strip_prefix("0x").unwrap_or(&entropy);
        Ok(Zeroizing::new(stripped.to_string()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedEntropy {
        value: String,
        calls: AtomicUsize,
    }

    impl FixedEntropy {
        fn new(value: &str) -> Self {
            Self {
                value: value.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EntropySource for FixedEntropy {
        async fn request_entropy(&self, salt: &str) -> Result<String, EntropyError> {
            assert_eq!(salt, SIGNING_KEY_SALT);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.value.clone())
        }
    }

    struct DenyingEntropy;

    #[async_trait]
    impl EntropySource for DenyingEntropy {
        async fn request_entropy(&self, _salt: &str) -> Result<String, EntropyError> {
            Err(EntropyError::Denied("user rejected".to_string()))
        }
    }

    #[tokio::test]
    async fn test_derivation_strips_prefix() {
        let deriver = EntropyDeriver::new(Arc::new(FixedEntropy::new("0xabcdef")));
        let key = deriver.derive_signing_key().await.unwrap();
        assert_eq!(&*key, "abcdef");
    }

    #[tokio::test]
    async fn test_derivation_passes_unprefixed_values_through() {
        let deriver = EntropyDeriver::new(Arc::new(FixedEntropy::new("abcdef")));
        let key = deriver.derive_signing_key().await.unwrap();
        assert_eq!(&*key, "abcdef");
    }

    #[tokio::test]
    async fn test_sequential_derivations_are_identical() {
        let source = Arc::new(FixedEntropy::new("0x1234"));
        let deriver = EntropyDeriver::new(Arc::clone(&source) as Arc<dyn EntropySource>);

        let first = deriver.derive_signing_key().await.unwrap();
        let second = deriver.derive_signing_key().await.unwrap();
        assert_eq!(&*first, &*second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_host_denial_propagates_unchanged() {
        let deriver = EntropyDeriver::new(Arc::new(DenyingEntropy));
        let err = deriver.derive_signing_key().await.unwrap_err();
        assert!(matches!(err, EntropyError::Denied(_)));
    }
}
