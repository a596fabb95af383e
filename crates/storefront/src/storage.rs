//! Durable storage for the auth token.
//!
//! The store holds exactly one value, the session token. It is read once at
//! start-up, written on login/register and removed on logout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors from the token store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Token file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single-key durable store for the session token.
pub trait TokenStore: Send {
    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing storage cannot be read.
    fn load(&self) -> Result<Option<SecretString>, StorageError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing storage cannot be written.
    fn save(&mut self, token: &SecretString) -> Result<(), StorageError>;

    /// Delete the stored token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing storage cannot be modified.
    fn remove(&mut self) -> Result<(), StorageError>;
}

// =============================================================================
// File store
// =============================================================================

/// Token kept in a plain file, readable only by the owner on unix.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token)))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, token: &SecretString) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, token.expose_secret()).map_err(|e| self.io_error(e))?;
        restrict_permissions(&self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Saved session token");
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed session token");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

fn restrict_permissions(path: &Path) -> Result<(), io::Error> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

// =============================================================================
// Memory store
// =============================================================================

/// Token kept in memory only. Nothing survives the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Option<SecretString>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token, as if a previous run had logged in.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(SecretString::from(token)),
        }
    }
}

impl std::fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &SecretString) -> Result<(), StorageError> {
        self.token = Some(token.clone());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        self.token = None;
        Ok(())
    }
}
