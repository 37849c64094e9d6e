// Keygate — Request Dispatcher
//
// The two inbound entry points. Both authorize against the same
// permission table before anything else runs; an unauthorized call
// never touches the backend accessor or the entropy deriver. The
// generic handler executes only the custom method set and the keyring
// handler only forwards — a method permitted for an origin but sent to
// the wrong handler fails with MethodNotSupported rather than
// cross-routing.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enclave::EntropySource;
use crate::error::{GatewayError, Result};
use crate::keyring::KeyringRequest;
use crate::state::StateStore;

use super::accessor::BackendAccessor;
use super::entropy::EntropyDeriver;
use super::permissions::PermissionTable;

/// The closed set of custom (non-keyring-protocol) methods the generic
/// handler executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomMethod {
    ToggleSyncApprovals,
    IsSynchronousMode,
    CreateAccountWithPrivateKey,
}

impl CustomMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleSyncApprovals => "snap.internal.toggleSyncApprovals",
            Self::IsSynchronousMode => "snap.internal.isSynchronousMode",
            Self::CreateAccountWithPrivateKey => "snap.internal.createAccountWithPrivateKey",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "snap.internal.toggleSyncApprovals" => Some(Self::ToggleSyncApprovals),
            "snap.internal.isSynchronousMode" => Some(Self::IsSynchronousMode),
            "snap.internal.createAccountWithPrivateKey" => Some(Self::CreateAccountWithPrivateKey),
            _ => None,
        }
    }
}

/// A generic RPC request as received from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// The authorization-and-dispatch layer in front of the keyring backend.
pub struct Router {
    permissions: PermissionTable,
    accessor: BackendAccessor,
    entropy: EntropyDeriver,
}

impl Router {
    pub fn new(store: Arc<dyn StateStore>, entropy: Arc<dyn EntropySource>) -> Self {
        Self {
            permissions: PermissionTable::builtin(),
            accessor: BackendAccessor::new(store),
            entropy: EntropyDeriver::new(entropy),
        }
    }

    fn authorize(&self, origin: &str, method: &str) -> Result<()> {
        if self.permissions.is_permitted(origin, method) {
            tracing::debug!(origin, method, "Call authorized");
            Ok(())
        } else {
            tracing::warn!(origin, method, "Call rejected by permission table");
            Err(GatewayError::Unauthorized {
                origin: origin.to_string(),
                method: method.to_string(),
            })
        }
    }

    /// Handle a generic RPC call. Three terminal outcomes: unauthorized,
    /// a matched custom operation, or method-not-supported.
    pub async fn handle_rpc_request(&self, origin: &str, request: &RpcRequest) -> Result<Value> {
        self.authorize(origin, &request.method)?;

        match CustomMethod::parse(&request.method) {
            Some(CustomMethod::ToggleSyncApprovals) => {
                let keyring = self.accessor.get().await?;
                Ok(Value::Bool(keyring.toggle_sync_approvals().await?))
            }
            Some(CustomMethod::IsSynchronousMode) => {
                let keyring = self.accessor.get().await?;
                Ok(Value::Bool(keyring.is_synchronous_mode().await))
            }
            Some(CustomMethod::CreateAccountWithPrivateKey) => {
                let private_key = self.entropy.derive_signing_key().await?;
                let keyring = self.accessor.get().await?;
                let account = keyring
                    .create_account(Some(private_key.as_str()), BTreeMap::new())
                    .await?;
                Ok(serde_json::to_value(account)?)
            }
            None => Err(GatewayError::MethodNotSupported(request.method.clone())),
        }
    }

    /// Handle a keyring-protocol call: authorize, then forward the whole
    /// request to the backend's generic entry point. No method branching
    /// happens here.
    pub async fn handle_keyring_request(
        &self,
        origin: &str,
        request: KeyringRequest,
    ) -> Result<Value> {
        self.authorize(origin, &request.method)?;

        let keyring = self.accessor.get().await?;
        Ok(keyring.handle_keyring_request(request).await?)
    }

    /// Whether the backend has been constructed (diagnostics only).
    pub fn backend_initialized(&self) -> bool {
        self.accessor.is_initialized()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
