use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use monitor_logging::{monitor_info, monitor_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode credentials: {0}")]
    Encode(String),
}

/// Where the bearer token lives between calls.
pub trait TokenStore: Send + Sync {
    fn credentials(&self) -> Option<Credentials>;

    fn store(&self, credentials: Credentials) -> Result<(), TokenStoreError>;

    fn clear(&self) -> Result<(), TokenStoreError>;

    fn token(&self) -> Option<String> {
        self.credentials().map(|credentials| credentials.token)
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credentials: Mutex<Option<Credentials>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            credentials: Mutex::new(Some(Credentials::new(token))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, credentials: Credentials) -> Result<(), TokenStoreError> {
        *self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(credentials);
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// Credentials persisted as RON, re-read on every lookup.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn credentials(&self) -> Option<Credentials> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                monitor_warn!("Failed to read credentials from {:?}: {}", self.path, err);
                return None;
            }
        };

        match ron::from_str::<Credentials>(&content) {
            Ok(credentials) if !credentials.token.trim().is_empty() => Some(credentials),
            Ok(_) => None,
            Err(err) => {
                monitor_warn!("Failed to parse credentials from {:?}: {}", self.path, err);
                None
            }
        }
    }

    fn store(&self, credentials: Credentials) -> Result<(), TokenStoreError> {
        let dir = self.dir();
        fs::create_dir_all(&dir)?;

        let content = ron::ser::to_string_pretty(&credentials, ron::ser::PrettyConfig::new())
            .map_err(|err| TokenStoreError::Encode(err.to_string()))?;

        // Temp file in the same directory so the rename stays atomic.
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).map_err(|err| TokenStoreError::Io(err.error))?;

        monitor_info!("Stored credentials in {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                monitor_info!("Removed stored credentials at {:?}", self.path);
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
