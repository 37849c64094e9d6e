// Keygate — Gateway Module
//
// Unix Domain Socket transport for the router. Carries JSON-RPC 2.0
// with an envelope naming the caller origin and the endpoint (generic
// RPC or keyring protocol), keeping the two dispatcher entry points
// distinct on the wire.

mod protocol;
mod uds;

pub use protocol::{Endpoint, JsonRpcRequest, JsonRpcResponse};
pub use uds::UdsServer;
