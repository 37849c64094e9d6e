// Keygate — Origin Permission Table
//
// Static origin → allowed-methods allow-list. This is the system's sole
// authorization gate: absent origins have the empty permission set, and
// no per-method secondary checks exist elsewhere. The table is built
// once at startup and never mutated.

use std::collections::{HashMap, HashSet};

use crate::keyring::KeyringMethod;

use super::dispatch::CustomMethod;

/// The trusted first-party wallet origin. Restricted to the
/// read/approve-oriented subset of the protocol.
pub const ORIGIN_METAMASK: &str = "metamask";

/// The reference companion dapp origin. Full access.
pub const ORIGIN_DAPP: &str = "https://metamask.github.io";

/// Local development origin. Full access.
pub const ORIGIN_LOCALHOST: &str = "http://localhost:8000";

/// Immutable mapping from calling origin to the set of method names the
/// origin may invoke.
pub struct PermissionTable {
    entries: HashMap<&'static str, HashSet<&'static str>>,
}

impl PermissionTable {
    /// Build the fixed, built-in permission table.
    pub fn builtin() -> Self {
        let wallet_methods: HashSet<&'static str> = [
            KeyringMethod::ListAccounts,
            KeyringMethod::GetAccount,
            KeyringMethod::FilterAccountChains,
            KeyringMethod::DeleteAccount,
            KeyringMethod::ListRequests,
            KeyringMethod::GetRequest,
            KeyringMethod::SubmitRequest,
            KeyringMethod::RejectRequest,
        ]
        .iter()
        .map(|m| m.as_str())
        .collect();

        let full_methods: HashSet<&'static str> = [
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
        ]
        .iter()
        .map(|m| m.as_str())
        .chain(
            [
                CustomMethod::ToggleSyncApprovals,
                CustomMethod::IsSynchronousMode,
                CustomMethod::CreateAccountWithPrivateKey,
            ]
            .iter()
            .map(|m| m.as_str()),
        )
        .collect();

        let mut entries = HashMap::new();
        entries.insert(ORIGIN_METAMASK, wallet_methods);
        entries.insert(ORIGIN_DAPP, full_methods.clone());
        entries.insert(ORIGIN_LOCALHOST, full_methods);

        Self { entries }
    }

    /// Returns true iff `origin` has an entry and `method` is a member
    /// of that entry's set. Pure and total; unknown origins and
    /// methods — including empty strings — are denied.
    pub fn is_permitted(&self, origin: &str, method: &str) -> bool {
        self.entries
            .get(origin)
            .map_or(false, |methods| methods.contains(method))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_origin_is_denied() {
        let table = PermissionTable::builtin();
        assert!(!table.is_permitted("https://evil.example", "keyring_listAccounts"));
        assert!(!table.is_permitted("", "keyring_listAccounts"));
    }

    #[test]
    fn test_unknown_method_is_denied() {
        let table = PermissionTable::builtin();
        assert!(!table.is_permitted(ORIGIN_METAMASK, "keyring_mintTokens"));
        assert!(!table.is_permitted(ORIGIN_METAMASK, ""));
    }

    #[test]
    fn test_wallet_origin_has_read_approve_subset() {
        let table = PermissionTable::builtin();

        for method in [
            KeyringMethod::ListAccounts,
            KeyringMethod::GetAccount,
            KeyringMethod::FilterAccountChains,
            KeyringMethod::DeleteAccount,
            KeyringMethod::ListRequests,
            KeyringMethod::GetRequest,
            KeyringMethod::SubmitRequest,
            KeyringMethod::RejectRequest,
        ] {
            assert!(
                table.is_permitted(ORIGIN_METAMASK, method.as_str()),
                "wallet origin should be allowed {}",
                method.as_str()
            );
        }
    }

    #[test]
    fn test_wallet_origin_lacks_mutation_and_custom_methods() {
        let table = PermissionTable::builtin();

        for method in [
            KeyringMethod::CreateAccount.as_str(),
            KeyringMethod::UpdateAccount.as_str(),
            KeyringMethod::ExportAccount.as_str(),
            KeyringMethod::ApproveRequest.as_str(),
            CustomMethod::ToggleSyncApprovals.as_str(),
            CustomMethod::IsSynchronousMode.as_str(),
            CustomMethod::CreateAccountWithPrivateKey.as_str(),
        ] {
            assert!(
                !table.is_permitted(ORIGIN_METAMASK, method),
                "wallet origin must not be allowed {}",
                method
            );
        }
    }

    #[test]
    fn test_dev_origins_have_full_set() {
        let table = PermissionTable::builtin();

        for origin in [ORIGIN_DAPP, ORIGIN_LOCALHOST] {
            for method in [
                KeyringMethod::CreateAccount.as_str(),
                KeyringMethod::ExportAccount.as_str(),
                KeyringMethod::ApproveRequest.as_str(),
                CustomMethod::ToggleSyncApprovals.as_str(),
                CustomMethod::IsSynchronousMode.as_str(),
                CustomMethod::CreateAccountWithPrivateKey.as_str(),
            ] {
                assert!(
                    table.is_permitted(origin, method),
                    "{} should be allowed {}",
                    origin,
                    method
                );
            }
        }
    }

    #[test]
    fn test_origin_match_is_exact() {
        let table = PermissionTable::builtin();
        assert!(!table.is_permitted("Metamask", "keyring_listAccounts"));
        assert!(!table.is_permitted("metamask ", "keyring_listAccounts"));
        assert!(!table.is_permitted("https://metamask.github.io/", "keyring_listAccounts"));
    }
}
