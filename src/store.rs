//! Local device storage.
//!
//! Small key-value persistence for things that must survive restarts: the
//! guest cart and the session tokens. Backed by either JSON files on disk or
//! an in-memory map, behind [`StorageBackend`].

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;

/// Key the guest cart is persisted under.
pub const GUEST_CART_KEY: &str = "guest_cart";
/// Key for the short-lived access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Key for the long-lived refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Pluggable persistence behind [`Store`].
///
/// Absent keys are a normal state, not an error, so reads return `Option`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// File-per-key storage under a base directory.
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        // Sanitize so keys can never escape the base directory.
        let safe_key = key.replace(['/', ':', '\\', '.'], "_");
        self.base_dir.join(format!("{safe_key}.json"))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.file_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.file_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // Write to a temp file then rename so readers never see a half write.
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value).await?;
        fs::rename(&temp_path, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.file_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Map-backed storage with no persistence. Used in tests.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Typed JSON view over a storage backend. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StorageBackend>,
}

impl Store {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn file(base_dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(base_dir)))
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Read and decode a value.
    ///
    /// A value that fails to decode is treated as absent rather than an
    /// error, so a corrupted cart or token file degrades to the empty state
    /// instead of wedging every caller.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable stored value");
                Ok(None)
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw).await
    }

    pub async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key).await
    }

    pub async fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set(key, value.to_string()).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key).await
    }
}
