// Keygate — Enclave Module
//
// The host-side entropy service. Entropy is deterministic per
// installation and per salt label, backed by a master secret stored in
// the platform keyring (Keychain/DPAPI/libsecret). It never leaves
// this module unprefixed or unhexed.

mod error;
mod provider;

pub use error::EntropyError;
pub use provider::{EntropySource, PlatformEntropy};
