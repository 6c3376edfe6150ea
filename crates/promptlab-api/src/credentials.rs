//! Local storage for the provider API key
//!
//! The key is a single opaque string kept under a fixed storage key. It is
//! read at the moment each test is submitted, so a change made in the
//! settings screen applies to the very next run.

use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use promptlab_core::prelude::*;

/// Storage key for the provider API key
pub const API_KEY_STORAGE_KEY: &str = "openai_api_key";

const CREDENTIALS_FILENAME: &str = "credentials.toml";

/// Persistence for the provider API key
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Current key, `None` when nothing is stored
    fn load(&self) -> Result<Option<String>>;

    /// Store a key; a blank key removes it
    fn save(&self, key: &str) -> Result<()>;

    /// Remove the stored key
    fn clear(&self) -> Result<()>;
}

/// Read the key for a submission.
///
/// A store that cannot be read is logged and treated as "no key" so the
/// request still goes out and the backend reports the missing credential.
pub fn read_api_key(store: &dyn CredentialStore) -> Option<String> {
    match store.load() {
        Ok(Some(key)) if !key.trim().is_empty() => Some(key),
        Ok(_) => None,
        Err(e) => {
            warn!("Failed to read stored API key: {}", e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed store
// ─────────────────────────────────────────────────────────────────────────────

/// TOML file holding `openai_api_key = "..."`
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_local_dir>/promptlab/credentials.toml`
    pub fn default_path() -> PathBuf {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("promptlab").join(CREDENTIALS_FILENAME)
    }

    pub fn in_default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::credentials(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        content.parse::<toml::Table>().map_err(|e| {
            Error::credentials(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write_table(&self, table: &toml::Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::credentials(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let content = toml::to_string(table)
            .map_err(|e| Error::credentials(format!("Failed to serialize credentials: {}", e)))?;

        // Truncate only once the lock is held
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| Error::credentials(format!("Failed to open credentials file: {}", e)))?;

        file.lock_exclusive()
            .map_err(|e| Error::credentials(format!("Failed to lock credentials file: {}", e)))?;

        restrict_permissions(&self.path)?;

        file.set_len(0)
            .and_then(|_| file.rewind())
            .map_err(|e| Error::credentials(format!("Failed to truncate credentials: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| Error::credentials(format!("Failed to write credentials: {}", e)))?;
        file.flush()
            .map_err(|e| Error::credentials(format!("Failed to flush credentials: {}", e)))?;

        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::credentials(format!("Failed to restrict permissions: {}", e)))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        let table = self.read_table()?;
        Ok(table
            .get(API_KEY_STORAGE_KEY)
            .and_then(toml::Value::as_str)
            .map(str::to_string))
    }

    fn save(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return self.clear();
        }
        let mut table = self.read_table()?;
        table.insert(
            API_KEY_STORAGE_KEY.to_string(),
            toml::Value::String(key.to_string()),
        );
        self.write_table(&table)?;
        info!("API key saved to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut table = self.read_table()?;
        if table.remove(API_KEY_STORAGE_KEY).is_none() {
            return Ok(());
        }
        if table.is_empty() {
            std::fs::remove_file(&self.path).map_err(|e| {
                Error::credentials(format!("Failed to remove credentials file: {}", e))
            })?;
        } else {
            self.write_table(&table)?;
        }
        info!("API key removed");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local store; nothing touches disk
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Mutex::new(Some(key.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        let guard = self
            .key
            .lock()
            .map_err(|_| Error::credentials("credential lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, key: &str) -> Result<()> {
        let mut guard = self
            .key
            .lock()
            .map_err(|_| Error::credentials("credential lock poisoned"))?;
        let key = key.trim();
        *guard = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save("")
    }
}
