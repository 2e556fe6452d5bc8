//! Bundle storage
//!
//! Handles getting the exported record into memory:
//! - Decoding the JSON payload into typed resources
//! - Indexing resources by type and id
//! - Memoizing the index until the bundle content changes

pub mod index;
pub mod loader;

pub use index::ResourceIndex;
pub use loader::{load_resources, load_resources_from_slice, load_resources_from_str};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::transform::HealthRecords;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
struct CachedIndex {
    fingerprint: u64,
    index: Arc<ResourceIndex>,
}

/// Loads the bundle from disk and hands out [`HealthRecords`] snapshots.
///
/// The file is re-read on every call so snapshots always reflect the
/// current bundle, but it is only re-parsed when its content hash changes.
#[derive(Debug)]
pub struct BundleStore {
    path: PathBuf,
    config: Config,
    cached: RwLock<Option<CachedIndex>>,
}

impl BundleStore {
    pub fn new(config: &Config) -> Self {
        BundleStore {
            path: config.bundle.path.clone(),
            config: config.clone(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Current index, parsed afresh only if the bundle bytes changed.
    pub async fn index(&self) -> Result<Arc<ResourceIndex>, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        let fingerprint = fingerprint(&bytes);

        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.fingerprint == fingerprint {
                debug!("Bundle cache hit for {}", self.path.display());
                return Ok(Arc::clone(&cached.index));
            }
        }

        debug!("Bundle cache miss for {}, re-indexing", self.path.display());
        let index = Arc::new(ResourceIndex::new(load_resources_from_slice(&bytes)));
        *self.cached.write().await = Some(CachedIndex {
            fingerprint,
            index: Arc::clone(&index),
        });
        Ok(index)
    }

    /// Snapshot of the records as of now.
    pub async fn records(&self) -> Result<HealthRecords, StoreError> {
        let index = self.index().await?;
        Ok(HealthRecords::new(index, self.config.summary.clone()))
    }

    /// Drops the memoized index; the next call re-parses unconditionally.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    pub async fn is_cached(&self) -> bool {
        self.cached.read().await.is_some()
    }
}

fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}
