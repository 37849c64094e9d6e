// Keygate — CLI command handlers

use std::sync::Arc;

use crate::enclave::PlatformEntropy;
use crate::gateway::UdsServer;
use crate::router::Router;
use crate::state::{FileStateStore, StateStore};
use crate::Result;

use super::Commands;

/// Execute a parsed CLI command.
pub async fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Serve { socket, state_file } => {
            let socket_path = socket.unwrap_or_else(UdsServer::default_socket_path);
            let state_path = state_file.unwrap_or_else(FileStateStore::default_path);

            let store: Arc<dyn StateStore> = Arc::new(FileStateStore::new(state_path));
            let router = Arc::new(Router::new(store, Arc::new(PlatformEntropy::new())));

            UdsServer::new(socket_path, router).run().await
        }
        Commands::Status { state_file } => {
            let state_path = state_file.unwrap_or_else(FileStateStore::default_path);
            let store = FileStateStore::new(state_path);
            let state = store.load().await?;

            println!("accounts:              {}", state.accounts.len());
            println!("pending requests:      {}", state.requests.len());
            println!("synchronous approvals: {}", state.use_synchronous_approvals);
            Ok(())
        }
    }
}
