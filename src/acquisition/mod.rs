//! Data acquisition: local files or remote downloads, memoized per source

mod cache;
mod error;
mod loader;
mod remote;

pub use cache::{AcquisitionCache, SourceKey};
pub use error::AcquisitionError;
pub use loader::{load_csv, parse_csv};
pub use remote::{RemoteFetcher, ID_PLACEHOLDER};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::ShipmentTable;

/// Where the shipment table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Local(PathBuf),
    Remote { id: String },
}

impl DataSource {
    pub fn key(&self) -> SourceKey {
        match self {
            DataSource::Local(path) => SourceKey::Path(path.clone()),
            DataSource::Remote { id } => SourceKey::Remote(id.clone()),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Local(path) => write!(f, "{}", path.display()),
            DataSource::Remote { id } => write!(f, "remote dataset '{}'", id),
        }
    }
}

/// Read and derive a CSV on the blocking pool
async fn read_table(path: PathBuf) -> Result<ShipmentTable, AcquisitionError> {
    tokio::task::spawn_blocking(move || load_csv(&path)).await?
}

/// Loads tables through the cache, downloading remote sources when needed
pub struct DataLoader {
    fetcher: RemoteFetcher,
    cache: AcquisitionCache,
    /// Held from download until the cache file is parsed; every identifier shares that file
    fetch_lock: Mutex<()>,
}

impl DataLoader {
    pub fn new(fetcher: RemoteFetcher) -> Self {
        Self {
            fetcher,
            cache: AcquisitionCache::new(),
            fetch_lock: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &AcquisitionCache {
        &self.cache
    }

    /// Cached table for the source, loading it on first use.
    ///
    /// Failures are returned without touching the cache, so a later call retries.
    pub async fn load(&self, source: &DataSource) -> Result<Arc<ShipmentTable>, AcquisitionError> {
        let key = source.key();
        if let Some(table) = self.cache.get(&key).await {
            debug!("Cache hit for {}", key);
            return Ok(table);
        }

        let table = match source {
            DataSource::Local(path) => read_table(path.clone()).await?,
            DataSource::Remote { id } => {
                let _fetching = self.fetch_lock.lock().await;
                if let Some(table) = self.cache.get(&key).await {
                    debug!("Cache filled while waiting for {}", key);
                    return Ok(table);
                }
                let path = self.fetcher.download(id).await?;
                read_table(path).await?
            }
        };

        info!("Loaded {} shipments from {}", table.len(), source);
        let table = Arc::new(table);
        self.cache.insert(key, table.clone()).await;
        Ok(table)
    }

    pub async fn invalidate(&self, source: &DataSource) -> bool {
        let removed = self.cache.invalidate(&source.key()).await;
        if removed {
            info!("Invalidated cached table for {}", source);
        }
        removed
    }
}
