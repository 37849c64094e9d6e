// Keygate — Keyring Protocol Types
//
// Wire-level method names and the request envelope for the keyring
// protocol. The router authorizes against these names but never
// branches on them; dispatch by method belongs to the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of keyring-protocol methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyringMethod {
    ListAccounts,
    GetAccount,
    CreateAccount,
    FilterAccountChains,
    UpdateAccount,
    DeleteAccount,
    ExportAccount,
    ListRequests,
    GetRequest,
    SubmitRequest,
    ApproveRequest,
    RejectRequest,
}

impl KeyringMethod {
    /// The wire name of this method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ListAccounts => "keyring_listAccounts",
            Self::GetAccount => "keyring_getAccount",
            Self::CreateAccount => "keyring_createAccount",
            Self::FilterAccountChains => "keyring_filterAccountChains",
            Self::UpdateAccount => "keyring_updateAccount",
            Self::DeleteAccount => "keyring_deleteAccount",
            Self::ExportAccount => "keyring_exportAccount",
            Self::ListRequests => "keyring_listRequests",
            Self::GetRequest => "keyring_getRequest",
            Self::SubmitRequest => "keyring_submitRequest",
            Self::ApproveRequest => "keyring_approveRequest",
            Self::RejectRequest => "keyring_rejectRequest",
        }
    }

    /// Parse a wire name. Returns None for anything outside the closed set.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "keyring_listAccounts" => Some(Self::ListAccounts),
            "keyring_getAccount" => Some(Self::GetAccount),
            "keyring_createAccount" => Some(Self::CreateAccount),
            "keyring_filterAccountChains" => Some(Self::FilterAccountChains),
            "keyring_updateAccount" => Some(Self::UpdateAccount),
            "keyring_deleteAccount" => Some(Self::DeleteAccount),
            "keyring_exportAccount" => Some(Self::ExportAccount),
            "keyring_listRequests" => Some(Self::ListRequests),
            "keyring_getRequest" => Some(Self::GetRequest),
            "keyring_submitRequest" => Some(Self::SubmitRequest),
            "keyring_approveRequest" => Some(Self::ApproveRequest),
            "keyring_rejectRequest" => Some(Self::RejectRequest),
            _ => None,
        }
    }
}

/// A keyring-protocol request as received from the host. The router
/// forwards this object verbatim to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyringRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_all_methods() {
        let all = [
            KeyringMethod::ListAccounts,
            KeyringMethod::GetAccount,
            KeyringMethod::CreateAccount,
            KeyringMethod::FilterAccountChains,
            KeyringMethod::UpdateAccount,
            KeyringMethod::DeleteAccount,
            KeyringMethod::ExportAccount,
            KeyringMethod::ListRequests,
            KeyringMethod::GetRequest,
            KeyringMethod::SubmitRequest,
            KeyringMethod::ApproveRequest,
            KeyringMethod::RejectRequest,
        ];
        for method in all {
            assert_eq!(KeyringMethod::parse(method.as_str()), Some(method));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert_eq!(KeyringMethod::parse("keyring_stealFunds"), None);
        assert_eq!(KeyringMethod::parse(""), None);
        assert_eq!(KeyringMethod::parse("snap.internal.isSynchronousMode"), None);
    }

    #[test]
    fn test_request_without_params_deserializes() {
        let req: KeyringRequest =
            serde_json::from_str(r#"{"method":"keyring_listAccounts"}"#).unwrap();
        assert_eq!(req.method, "keyring_listAccounts");
        assert_eq!(req.params, Value::Null);
    }
}
