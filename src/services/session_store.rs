use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// The one process-wide bearer credential, optionally mirrored to a file.
#[derive(Clone, Default)]
pub struct SessionStore {
    token: Arc<RwLock<Option<String>>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// In-memory store, empty at start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by `path`; a credential already saved there is restored.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let restored = load_file(&path);
        if restored.is_some() {
            tracing::info!(path = %path.display(), "Restored saved session credential");
        }
        Self {
            token: Arc::new(RwLock::new(restored)),
            path: Some(path),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_present(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if let Some(path) = &self.path {
            if let Err(error) = fs::write(path, &token) {
                tracing::warn!(%error, path = %path.display(), "Failed to persist session credential");
            }
        }
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }

    /// Removes the credential. Returns whether one was present.
    pub fn clear(&self) -> bool {
        let had = self
            .token
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .is_some();
        if let Some(path) = &self.path {
            if path.exists() {
                if let Err(error) = fs::remove_file(path) {
                    tracing::warn!(%error, path = %path.display(), "Failed to delete saved session credential");
                }
            }
        }
        had
    }
}

fn load_file(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}
