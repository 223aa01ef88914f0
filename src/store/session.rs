//! Session-scoped snapshot storage
//!
//! Each client process gets its own folder under the base directory, so a
//! restarted client starts clean. Logout and shutdown wipe the folder.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone, Debug)]
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage private to the running process
    pub fn for_process(base: impl Into<PathBuf>) -> Self {
        Self::scoped(base, std::process::id())
    }

    pub fn scoped(base: impl Into<PathBuf>, process_id: u32) -> Self {
        Self::new(base.into().join(format!("pid-{}", process_id)))
    }

    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("spotify-clone-tui").join("session")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Missing or unreadable snapshots both come back as `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        let loaded = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str(&content)?));
        match loaded {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable session snapshot");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let content = serde_json::to_string(value)?;
        fs::write(self.path_for(key), content)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(key, error = %e, "Failed to remove session snapshot");
            }
        }
    }

    pub fn clear(&self) {
        if self.dir.exists() {
            if let Err(e) = fs::remove_dir_all(&self.dir) {
                tracing::warn!(dir = %self.dir.display(), error = %e, "Failed to clear session storage");
            }
        }
    }
}
