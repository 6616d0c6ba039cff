//! Secure token storage
//!
//! Access and refresh tokens are persisted behind the [`TokenStore`] trait so
//! the fetch wrapper can be exercised without a real keychain.

use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::restrict_permissions;
use crate::error::{Result, StoreError};

/// Keys held by a token store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    AccessToken,
    RefreshToken,
}

impl TokenKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::AccessToken => "access_token",
            TokenKey::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent storage for credentials
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read a token, `None` when absent
    async fn read(&self, key: TokenKey) -> Result<Option<String>>;

    /// Store a token, replacing any previous value
    async fn save(&self, key: TokenKey, value: &str) -> Result<()>;

    /// Remove a token; clearing an absent key is not an error
    async fn clear(&self, key: TokenKey) -> Result<()>;
}

/// YAML-file token store written with owner-only permissions
pub struct FileTokenStore {
    path: PathBuf,
    // serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> std::result::Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_yaml::from_str(&contents)?)
    }

    fn persist(&self, tokens: &BTreeMap<String, String>) -> std::result::Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(tokens)?;
        std::fs::write(&self.path, contents)?;
        restrict_permissions(&self.path)?;

        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn read(&self, key: TokenKey) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.get(key.as_str()).cloned())
    }

    async fn save(&self, key: TokenKey, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut tokens = self.load()?;
        tokens.insert(key.as_str().to_string(), value.to_string());
        self.persist(&tokens)?;
        log::debug!("Saved {} to {}", key, self.path.display());
        Ok(())
    }

    async fn clear(&self, key: TokenKey) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut tokens = self.load()?;
        if tokens.remove(key.as_str()).is_some() {
            self.persist(&tokens)?;
            log::debug!("Cleared {} from {}", key, self.path.display());
        }
        Ok(())
    }
}

/// Process-local token store
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<TokenKey, String>>,
}

#[cfg(test)]
impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an optional access and refresh token
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let mut tokens = HashMap::new();
        if let Some(access) = access {
            tokens.insert(TokenKey::AccessToken, access.to_string());
        }
        if let Some(refresh) = refresh {
            tokens.insert(TokenKey::RefreshToken, refresh.to_string());
        }
        Self {
            tokens: Mutex::new(tokens),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn read(&self, key: TokenKey) -> Result<Option<String>> {
        Ok(self.tokens.lock().await.get(&key).cloned())
    }

    async fn save(&self, key: TokenKey, value: &str) -> Result<()> {
        self.tokens.lock().await.insert(key, value.to_string());
        Ok(())
    }

    async fn clear(&self, key: TokenKey) -> Result<()> {
        self.tokens.lock().await.remove(&key);
        Ok(())
    }
}
