// Keygate — Unix Domain Socket Server
//
// Listens on a Unix domain socket for JSON-RPC 2.0 requests from the
// host process. Each connection is handled in a spawned tokio task;
// requests are newline-delimited. The envelope's endpoint field selects
// which dispatcher entry point runs — the server itself never branches
// on method names.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

use crate::error::GatewayError;
use crate::keyring::{KeyringError, KeyringRequest};
use crate::router::{Router, RpcRequest};

use super::protocol::{
    Endpoint, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, UNAUTHORIZED,
};

/// Unix Domain Socket server for Keygate.
pub struct UdsServer {
    socket_path: PathBuf,
    router: Arc<Router>,
}

impl UdsServer {
    /// Create a new UDS server in front of the given router.
    pub fn new(socket_path: PathBuf, router: Arc<Router>) -> Self {
        Self {
            socket_path,
            router,
        }
    }

    /// Default socket path: `$XDG_RUNTIME_DIR/keygate/keygate.sock`
    /// Falls back to `/tmp/keygate/keygate.sock`.
    pub fn default_socket_path() -> PathBuf {
        let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"));
        runtime_dir.join("keygate").join("keygate.sock")
    }

    /// Start the UDS server. This runs until the process is terminated.
    pub async fn run(&self) -> Result<(), GatewayError> {
        // Ensure the socket directory exists
        if let Some(parent) = self.socket_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Remove stale socket file if it exists
        if self.socket_path.exists() {
            tokio::fs::remove_file(&self.socket_path).await?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!(
            socket = %self.socket_path.display(),
            "Keygate UDS server listening"
        );

        // Set restrictive permissions on the socket (owner-only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.socket_path, perms)?;
        }

        loop {
            let (stream, _addr) = listener.accept().await?;
            let router = Arc::clone(&self.router);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, router).await {
                    tracing::error!("Connection handler error: {}", e);
                }
            });
        }
    }
}

/// Handle a single client connection.
/// Reads newline-delimited JSON-RPC requests and writes responses.
async fn handle_connection(
    stream: tokio::net::UnixStream,
    router: Arc<Router>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let response = process_request(&line, &router).await;
        let mut json = serde_json::to_string(&response)?;
        json.push('\n');
        writer.write_all(json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Parse a single JSON-RPC request and run it through the router.
async fn process_request(raw: &str, router: &Router) -> JsonRpcResponse {
    let request: JsonRpcRequest = match serde_json::from_str(raw) {
        Ok(req) => req,
        Err(e) => return JsonRpcResponse::parse_error(format!("Parse error: {}", e)),
    };

    if let Err(e) = request.validate() {
        return JsonRpcResponse::error(request.id, INVALID_REQUEST, e);
    }

    let result = match request.endpoint {
        Endpoint::Rpc => {
            router
                .handle_rpc_request(
                    &request.origin,
                    &RpcRequest {
                        method: request.method,
                        params: request.params,
                    },
                )
                .await
        }
        Endpoint::Keyring => {
            router
                .handle_keyring_request(
                    &request.origin,
                    KeyringRequest {
                        method: request.method,
                        params: request.params,
                    },
                )
                .await
        }
    };

    match result {
        Ok(value) => JsonRpcResponse::success(request.id, value),
        Err(e) => JsonRpcResponse::error(request.id, error_code(&e), format!("{}", e)),
    }
}

/// Map router errors onto JSON-RPC error codes.
fn error_code(error: &GatewayError) -> i32 {
    match error {
        GatewayError::Unauthorized { .. } => UNAUTHORIZED,
        GatewayError::MethodNotSupported(_) => METHOD_NOT_FOUND,
        GatewayError::Keyring(KeyringError::UnknownMethod(_)) => METHOD_NOT_FOUND,
        GatewayError::Keyring(KeyringError::InvalidParams(_)) => INVALID_PARAMS,
        _ => INTERNAL_ERROR,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
