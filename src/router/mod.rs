// Keygate — Router Module
//
// The authorization-and-dispatch core. Every inbound call is checked
// against the static origin allow-list before any other component runs;
// authorized calls are routed either to a small set of custom
// operations or forwarded verbatim to the keyring backend, which is
// lazily constructed exactly once.

mod accessor;
mod dispatch;
mod entropy;
mod permissions;

pub use accessor::BackendAccessor;
pub use dispatch::{CustomMethod, Router, RpcRequest};
pub use entropy::{EntropyDeriver, SIGNING_KEY_SALT};
pub use permissions::{PermissionTable, ORIGIN_DAPP, ORIGIN_LOCALHOST, ORIGIN_METAMASK};
