// Keygate — State Store
//
// Loads and saves the keyring state snapshot as a JSON file. A missing
// file yields the default empty state (first run); an unreadable or
// unparseable file is an error so a wrong key or truncated write never
// silently resets the wallet.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::keyring::State;

use super::StateError;

/// Abstraction over state persistence, enabling in-memory mocks for
/// testing the accessor's lazy-construction behavior.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the current state snapshot.
    async fn load(&self) -> Result<State, StateError>;

    /// Persist a state snapshot, replacing any previous one.
    async fn save(&self, state: &State) -> Result<(), StateError>;
}

/// JSON-file backed state store.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default state path: `$XDG_DATA_HOME/keygate/state.json`,
    /// falling back to `~/.local/share/keygate/state.json`.
    pub fn default_path() -> PathBuf {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local").join("share")
            });
        data_dir.join("keygate").join("state.json")
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<State, StateError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.path.display(),
                    "No state snapshot found, starting with empty state"
                );
                return Ok(State::default());
            }
            Err(e) => return Err(StateError::Io(e)),
        };

        let state: State = serde_json::from_slice(&raw)?;
        tracing::debug!(path = %self.path.display(), "State snapshot loaded");
        Ok(state)
    }

    async fn save(&self, state: &State) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(&self.path, json).await?;

        // The snapshot contains private-key material; owner-only access.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, perms).await?;
        }

        tracing::debug!(path = %self.path.display(), "State snapshot saved");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_returns_default_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));

        let state = store.load().await.unwrap();
        assert!(state.accounts.is_empty());
        assert!(state.requests.is_empty());
        assert!(!state.use_synchronous_approvals);
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));

        let mut state = State::default();
        state.use_synchronous_approvals = true;
        store.save(&state).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert!(loaded.use_synchronous_approvals);
    }

    #[tokio::test]
    async fn test_load_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"not json at all").await.unwrap();

        let store = FileStateStore::new(path);
        let result = store.load().await;
        assert!(matches!(result, Err(StateError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");

        let store = FileStateStore::new(path.clone());
        store.save(&State::default()).await.unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_saved_snapshot_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileStateStore::new(path.clone());
        store.save(&State::default()).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_default_path_ends_with_state_json() {
        let path = FileStateStore::default_path();
        assert!(path.to_string_lossy().contains("keygate"));
        assert!(path.to_string_lossy().ends_with("state.json"));
    }
}
