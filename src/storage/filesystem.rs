//! Filesystem artifact store

use crate::storage::traits::{ArtifactStore, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes artifacts as files inside one directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save(&self, bytes: &[u8], filename: &str) -> StorageResult<PathBuf> {
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Creates every directory in `dirs`, including missing parents
pub fn create_directories<P: AsRef<Path>>(dirs: &[P]) -> StorageResult<()> {
    for dir in dirs {
        std::fs::create_dir_all(dir.as_ref())?;
    }
    Ok(())
}
