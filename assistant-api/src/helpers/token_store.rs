use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const KEYRING_SERVICE: &str = "smart-assistant-google";

/// Persisted OAuth tokens for the connected Google account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp, seconds
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored token is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain operation failed: {0}")]
    Keyring(String),
}

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredToken>, TokenStoreError>;
    fn save(&self, token: &StoredToken) -> Result<(), TokenStoreError>;
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Tokens as JSON in a single file (`token.json`)
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredToken>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, token: &StoredToken) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(token)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Tokens as a JSON blob in the OS keychain
pub struct KeyringTokenStore {
    account: String,
}

impl KeyringTokenStore {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry, TokenStoreError> {
        Entry::new(KEYRING_SERVICE, &self.account).map_err(|e| {
            TokenStoreError::Keyring(format!("Failed to create keychain entry: {}", e))
        })
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<StoredToken>, TokenStoreError> {
        match self.entry()?.get_password() {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(TokenStoreError::Keyring(format!(
                "Failed to read token: {}",
                e
            ))),
        }
    }

    fn save(&self, token: &StoredToken) -> Result<(), TokenStoreError> {
        let json = serde_json::to_string(token)?;
        self.entry()?
            .set_password(&json)
            .map_err(|e| TokenStoreError::Keyring(format!("Failed to store token: {}", e)))
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(TokenStoreError::Keyring(format!(
                "Failed to delete token: {}",
                e
            ))),
        }
    }
}
