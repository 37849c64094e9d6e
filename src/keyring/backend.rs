// Keygate — Keyring Backend
//
// Owns the in-memory keyring state and implements the keyring-protocol
// operations. Mutations clone the state, persist the clone through the
// state store, and only then swap it in, so a failed save leaves no
// partial mutation observable. The host delivers calls one at a time,
// so clone-persist-swap is race-free at this layer.
//
// Chain-specific transaction signing lives outside this service; the
// signature produced here is SHA-256 over the key bytes and the
// canonical JSON of the request.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rand::RngCore;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::state::StateStore;

use super::models::{KeyringAccount, SigningRequest, State};
use super::protocol::{KeyringMethod, KeyringRequest};
use super::KeyringError;

/// Length of a raw private key in bytes.
const PRIVATE_KEY_LEN: usize = 32;

/// Length of a derived address in bytes.
const ADDRESS_LEN: usize = 20;

// ─── Wire Parameter Types ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IdParams {
    id: Uuid,
}

#[derive(Deserialize)]
struct FilterChainsParams {
    id: Uuid,
    chains: Vec<String>,
}

#[derive(Deserialize)]
struct UpdateAccountParams {
    account: KeyringAccount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountParams {
    #[serde(default)]
    private_key: Option<String>,
    #[serde(default)]
    options: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct SubmitRequestParams {
    account: Uuid,
    method: String,
    #[serde(default)]
    params: Value,
}

// ─── Backend ─────────────────────────────────────────────────────────────────

/// The keyring backend. Exactly one instance exists per process; the
/// backend accessor owns its construction.
pub struct Keyring {
    state: RwLock<State>,
    store: Arc<dyn StateStore>,
}

impl Keyring {
    pub fn new(state: State, store: Arc<dyn StateStore>) -> Self {
        Self {
            state: RwLock::new(state),
            store,
        }
    }

    /// Persist a candidate state, then swap it in.
    async fn commit(&self, next: State) -> Result<(), KeyringError> {
        self.store.save(&next).await?;
        *self.state.write().await = next;
        Ok(())
    }

    // ─── Account Operations ──────────────────────────────────────────────────

    /// Create a new account from the given hex-encoded private key, or
    /// from a freshly generated random key when none is supplied.
    pub async fn create_account(
        &self,
        private_key: Option<&str>,
        options: BTreeMap<String, Value>,
    ) -> Result<KeyringAccount, KeyringError> {
        let key_hex = match private_key {
            Some(key) => normalize_private_key(key)?,
            None => generate_private_key(),
        };
        let address = derive_address(&key_hex)?;

        let mut next = self.state.read().await.clone();
        if next.accounts.values().any(|a| a.address == address) {
            return Err(KeyringError::AccountExists(address));
        }

        let account = KeyringAccount::new(Uuid::new_v4(), address, options);
        next.accounts.insert(account.id, account.clone());
        next.private_keys.insert(account.id, key_hex.to_string());
        self.commit(next).await?;

        tracing::info!(account_id = %account.id, address = %account.address, "Account created");
        Ok(account)
    }

    pub async fn list_accounts(&self) -> Vec<KeyringAccount> {
        self.state.read().await.accounts.values().cloned().collect()
    }

    pub async fn get_account(&self, id: Uuid) -> Result<KeyringAccount, KeyringError> {
        self.state
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or(KeyringError::AccountNotFound(id))
    }

    /// Update an account's methods and options. Id, address, and type
    /// are immutable.
    pub async fn update_account(&self, account: KeyringAccount) -> Result<(), KeyringError> {
        let mut next = self.state.read().await.clone();
        let existing = next
            .accounts
            .get_mut(&account.id)
            .ok_or(KeyringError::AccountNotFound(account.id))?;

        if existing.address != account.address || existing.account_type != account.account_type {
            return Err(KeyringError::InvalidParams(
                "account address and type are immutable".to_string(),
            ));
        }

        existing.methods = account.methods;
        existing.options = account.options;
        self.commit(next).await?;

        tracing::info!(account_id = %account.id, "Account updated");
        Ok(())
    }

    pub async fn delete_account(&self, id: Uuid) -> Result<(), KeyringError> {
        let mut next = self.state.read().await.clone();
        if next.accounts.remove(&id).is_none() {
            return Err(KeyringError::AccountNotFound(id));
        }
        next.private_keys.remove(&id);
        next.requests.retain(|_, r| r.account != id);
        self.commit(next).await?;

        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }

    /// Export the raw private key of an account. The key itself is
    /// returned to the caller and never logged.
    pub async fn export_account(&self, id: Uuid) -> Result<Value, KeyringError> {
        let state = self.state.read().await;
        if !state.accounts.contains_key(&id) {
            return Err(KeyringError::AccountNotFound(id));
        }
        let key = state
            .private_keys
            .get(&id)
            .ok_or(KeyringError::AccountNotFound(id))?;

        tracing::warn!(account_id = %id, "Private key exported");
        Ok(json!({ "privateKey": format!("0x{key}") }))
    }

    /// Filter the given chain identifiers down to those this account
    /// can operate on (EVM chains only).
    pub async fn filter_account_chains(
        &self,
        id: Uuid,
        chains: Vec<String>,
    ) -> Result<Vec<String>, KeyringError> {
        if !self.state.read().await.accounts.contains_key(&id) {
            return Err(KeyringError::AccountNotFound(id));
        }
        Ok(chains
            .into_iter()
            .filter(|c| c.starts_with("eip155:"))
            .collect())
    }

    // ─── Request Operations ──────────────────────────────────────────────────

    pub async fn list_requests(&self) -> Vec<SigningRequest> {
        self.state.read().await.requests.values().cloned().collect()
    }

    pub async fn get_request(&self, id: Uuid) -> Result<SigningRequest, KeyringError> {
        self.state
            .read()
            .await
            .requests
            .get(&id)
            .cloned()
            .ok_or(KeyringError::RequestNotFound(id))
    }

    /// Submit a signing request. In synchronous mode the request is
    /// signed immediately; otherwise it is queued for approval.
    pub async fn submit_request(
        &self,
        account: Uuid,
        method: String,
        params: Value,
    ) -> Result<Value, KeyringError> {
        let state = self.state.read().await;
        if !state.accounts.contains_key(&account) {
            return Err(KeyringError::AccountNotFound(account));
        }
        let synchronous = state.use_synchronous_approvals;
        drop(state);

        if synchronous {
            let result = self.sign(account, &method, &params).await?;
            return Ok(json!({ "pending": false, "result": result }));
        }

        let request = SigningRequest {
            id: Uuid::new_v4(),
            account,
            method,
            params,
            created_at: Utc::now(),
        };
        let mut next = self.state.read().await.clone();
        next.requests.insert(request.id, request.clone());
        self.commit(next).await?;

        tracing::info!(request_id = %request.id, account_id = %account, "Request queued");
        Ok(json!({ "pending": true }))
    }

    /// Approve a queued request: sign it, remove it from the queue, and
    /// return the signing result.
    pub async fn approve_request(&self, id: Uuid) -> Result<Value, KeyringError> {
        let request = self.get_request(id).await?;
        let result = self
            .sign(request.account, &request.method, &request.params)
            .await?;

        let mut next = self.state.read().await.clone();
        next.requests.remove(&id);
        self.commit(next).await?;

        tracing::info!(request_id = %id, "Request approved");
        Ok(Value::String(result))
    }

    /// Reject a queued request, removing it without signing.
    pub async fn reject_request(&self, id: Uuid) -> Result<(), KeyringError> {
        let mut next = self.state.read().await.clone();
        if next.requests.remove(&id).is_none() {
            return Err(KeyringError::RequestNotFound(id));
        }
        self.commit(next).await?;

        tracing::info!(request_id = %id, "Request rejected");
        Ok(())
    }

    // ─── Mode Operations ─────────────────────────────────────────────────────

    /// Flip synchronous-approval mode and return the new setting.
    pub async fn toggle_sync_approvals(&self) -> Result<bool, KeyringError> {
        let mut next = self.state.read().await.clone();
        next.use_synchronous_approvals = !next.use_synchronous_approvals;
        let mode = next.use_synchronous_approvals;
        self.commit(next).await?;

        tracing::info!(synchronous = mode, "Approval mode toggled");
        Ok(mode)
    }

    pub async fn is_synchronous_mode(&self) -> bool {
        self.state.read().await.use_synchronous_approvals
    }

    // ─── Generic Entry Point ─────────────────────────────────────────────────

    /// Dispatch a keyring-protocol request by its wire method name.
    /// This is the single entry point the router forwards to.
    pub async fn handle_keyring_request(
        &self,
        request: KeyringRequest,
    ) -> Result<Value, KeyringError> {
        let method = KeyringMethod::parse(&request.method)
            .ok_or_else(|| KeyringError::UnknownMethod(request.method.clone()))?;

        match method {
            KeyringMethod::ListAccounts => Ok(serde_json::to_value(self.list_accounts().await)?),
            KeyringMethod::GetAccount => {
                let p: IdParams = parse_params(request.params)?;
                Ok(serde_json::to_value(self.get_account(p.id).await?)?)
            }
            KeyringMethod::CreateAccount => {
                let p: CreateAccountParams = parse_params(request.params)?;
                let account = self
                    .create_account(p.private_key.as_deref(), p.options)
                    .await?;
                Ok(serde_json::to_value(account)?)
            }
            KeyringMethod::FilterAccountChains => {
                let p: FilterChainsParams = parse_params(request.params)?;
                let chains = self.filter_account_chains(p.id, p.chains).await?;
                Ok(serde_json::to_value(chains)?)
            }
            KeyringMethod::UpdateAccount => {
                let p: UpdateAccountParams = parse_params(request.params)?;
                self.update_account(p.account).await?;
                Ok(Value::Null)
            }
            KeyringMethod::DeleteAccount => {
                let p: IdParams = parse_params(request.params)?;
                self.delete_account(p.id).await?;
                Ok(Value::Null)
            }
            KeyringMethod::ExportAccount => {
                let p: IdParams = parse_params(request.params)?;
                self.export_account(p.id).await
            }
            KeyringMethod::ListRequests => Ok(serde_json::to_value(self.list_requests().await)?),
            KeyringMethod::GetRequest => {
                let p: IdParams = parse_params(request.params)?;
                Ok(serde_json::to_value(self.get_request(p.id).await?)?)
            }
            KeyringMethod::SubmitRequest => {
                let p: SubmitRequestParams = parse_params(request.params)?;
                self.submit_request(p.account, p.method, p.params).await
            }
            KeyringMethod::ApproveRequest => {
                let p: IdParams = parse_params(request.params)?;
                self.approve_request(p.id).await
            }
            KeyringMethod::RejectRequest => {
                let p: IdParams = parse_params(request.params)?;
                self.reject_request(p.id).await?;
                Ok(Value::Null)
            }
        }
    }

    /// Produce the signing result for a request against an account's key.
    async fn sign(
        &self,
        account: Uuid,
        method: &str,
        params: &Value,
    ) -> Result<String, KeyringError> {
        let state = self.state.read().await;
        let key_hex = state
            .private_keys
            .get(&account)
            .ok_or(KeyringError::AccountNotFound(account))?;
        let key = Zeroizing::new(
            hex::decode(key_hex).map_err(|e| KeyringError::InvalidPrivateKey(e.to_string()))?,
        );

        let mut hasher = Sha256::new();
        hasher.update(&*key);
        hasher.update(method.as_bytes());
        hasher.update(serde_json::to_vec(params)?);
        Ok(format!("0x{}", hex::encode(hasher.finalize())))
    }
}

// ─── Key Helpers ─────────────────────────────────────────────────────────────

/// Validate and normalize a hex private key (an optional `0x` prefix is
/// tolerated; the stored form has none).
fn normalize_private_key(key: &str) -> Result<Zeroizing<String>, KeyringError> {
    let stripped = key.strip_prefix("0x").unwrap_or(key);
    let bytes = Zeroizing::new(
        hex::decode(stripped).map_err(|e| KeyringError::InvalidPrivateKey(e.to_string()))?,
    );
    if bytes.len() != PRIVATE_KEY_LEN {
        return Err(KeyringError::InvalidPrivateKey(format!(
            "expected {} bytes, got {}",
            PRIVATE_KEY_LEN,
            bytes.len()
        )));
    }
    Ok(Zeroizing::new(stripped.to_ascii_lowercase()))
}

/// Generate a random private key for accounts created without one.
fn generate_private_key() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new(vec![0u8; PRIVATE_KEY_LEN]);
    rand::thread_rng().fill_bytes(&mut bytes);
    Zeroizing::new(hex::encode(&*bytes))
}

/// Derive the account address from a private key: the trailing 20 bytes
/// of SHA-256 over the raw key, 0x-prefixed.
fn derive_address(key_hex: &str) -> Result<String, KeyringError> {
    let key = Zeroizing::new(
        hex::decode(key_hex).map_err(|e| KeyringError::InvalidPrivateKey(e.to_string()))?,
    );
    let digest = Sha256::digest(&*key);
    Ok(format!(
        "0x{}",
        hex::encode(&digest[digest.len() - ADDRESS_LEN..])
    ))
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, KeyringError> {
    serde_json::from_value(params).map_err(|e| KeyringError::InvalidParams(e.to_string()))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
