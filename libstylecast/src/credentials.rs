//! Bearer token storage
//!
//! The backend issues a token at login or registration. It is kept in a
//! single file under the data directory (`<data_dir>/stylecast/token`) so
//! every Stylecast tool shares one session. On Unix the file is created with
//! mode 600.
//!
//! Tokens are held in memory as [`SecretString`] so they are zeroed on drop
//! and never show up in `Debug` output.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::config::resolve_data_path;
use crate::error::{Result, StylecastError};

const TOKEN_FILE: &str = "token";

/// File-backed store for the session token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the default location
    pub fn new() -> Result<Self> {
        Ok(Self::at(resolve_data_path()?.join(TOKEN_FILE)))
    }

    /// Store at an explicit file path
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `token`, replacing any existing one
    pub fn save(&self, token: &SecretString) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StylecastError::Credentials(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        std::fs::write(&self.path, token.expose_secret()).map_err(|e| {
            StylecastError::Credentials(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        // Set file permissions to 600 on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms).map_err(|e| {
                StylecastError::Credentials(format!(
                    "Failed to set permissions on {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        }

        tracing::debug!("Stored session token at {:?}", self.path);
        Ok(())
    }

    /// The stored token, or `None` when no session is saved
    pub fn load(&self) -> Result<Option<SecretString>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token.to_string())))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StylecastError::Credentials(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Remove the stored token; succeeds when there was none
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Removed session token at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StylecastError::Credentials(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
