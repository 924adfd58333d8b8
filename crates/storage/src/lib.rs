use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::sync::Mutex;

use shared::domain::Identity;

/// Persistence seam for the identity remembered across visits. Hosts inject
/// a concrete store; controller tests inject the in-memory one.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn load(&self) -> Result<Option<Identity>>;
    async fn save(&self, identity: &Identity) -> Result<()>;
}

/// Keeps the remembered identity as a single plain-text file.
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional per-user location; `None` when the platform reports no
    /// local data directory.
    pub fn open_default() -> Option<Self> {
        let dir = dirs::data_local_dir()?;
        Some(Self::new(
            dir.join("affiliate-portal").join("remembered_identity"),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IdentityStore for FileIdentityStore {
    async fn load(&self) -> Result<Option<Identity>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read identity file '{}'", self.path.display())
                })
            }
        };
        Ok(Identity::parse(&raw))
    }

    async fn save(&self, identity: &Identity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!(
                    "failed to create identity directory '{}'",
                    parent.display()
                )
            })?;
        }
        tokio::fs::write(&self.path, identity.as_str())
            .await
            .with_context(|| format!("failed to write identity file '{}'", self.path.display()))?;
        Ok(())
    }
}

/// Holds the remembered identity for the process lifetime only. Used when no
/// data directory resolves and as the test double.
#[derive(Default)]
pub struct MemoryIdentityStore {
    identity: Mutex<Option<Identity>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: Mutex::new(Some(identity)),
        }
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn load(&self) -> Result<Option<Identity>> {
        Ok(self.identity.lock().await.clone())
    }

    async fn save(&self, identity: &Identity) -> Result<()> {
        *self.identity.lock().await = Some(identity.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
