// Keygate — Keyring data models
//
// SECURITY: private keys live only in `State::private_keys`, which is
// redacted from Debug output and never logged. The serialized snapshot
// does contain them (the wallet must survive restarts), which is why
// the state store writes owner-only files.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Account type for externally-owned accounts on EVM chains.
pub const ACCOUNT_TYPE_EOA: &str = "eip155:eoa";

/// Signing methods every account managed here supports.
pub const ETH_METHODS: &[&str] = &[
    "personal_sign",
    "eth_sign",
    "eth_signTransaction",
    "eth_signTypedData_v4",
];

/// A keyring account as exposed over the wire. Never carries key material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyringAccount {
    pub id: Uuid,
    pub address: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub methods: Vec<String>,
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl KeyringAccount {
    pub fn new(id: Uuid, address: String, options: BTreeMap<String, Value>) -> Self {
        Self {
            id,
            address,
            account_type: ACCOUNT_TYPE_EOA.to_string(),
            methods: ETH_METHODS.iter().map(|m| m.to_string()).collect(),
            options,
        }
    }
}

impl fmt::Display for KeyringAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.id, self.address, self.account_type)
    }
}

/// A signing request queued for asynchronous approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    pub id: Uuid,
    pub account: Uuid,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub created_at: DateTime<Utc>,
}

/// The persisted keyring state snapshot.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(default)]
    pub accounts: BTreeMap<Uuid, KeyringAccount>,

    /// Hex-encoded private keys, keyed by account id.
    #[serde(default)]
    pub private_keys: BTreeMap<Uuid, String>,

    #[serde(default)]
    pub requests: BTreeMap<Uuid, SigningRequest>,

    #[serde(default)]
    pub use_synchronous_approvals: bool,
}

/// Custom Debug implementation that NEVER reveals private keys.
impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("accounts", &self.accounts)
            .field("private_keys", &format!("[{} REDACTED]", self.private_keys.len()))
            .field("requests", &self.requests)
            .field("use_synchronous_approvals", &self.use_synchronous_approvals)
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
