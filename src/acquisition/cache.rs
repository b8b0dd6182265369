//! Session-lifetime cache of loaded tables

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::ShipmentTable;

/// Identity of a data source within the cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Path(PathBuf),
    Remote(String),
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKey::Path(path) => write!(f, "path:{}", path.display()),
            SourceKey::Remote(id) => write!(f, "remote:{}", id),
        }
    }
}

/// Loaded tables keyed by source.
///
/// Entries stay until invalidated. Only successful loads are stored.
#[derive(Default)]
pub struct AcquisitionCache {
    entries: RwLock<HashMap<SourceKey, Arc<ShipmentTable>>>,
}

impl AcquisitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &SourceKey) -> Option<Arc<ShipmentTable>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: SourceKey, table: Arc<ShipmentTable>) {
        self.entries.write().await.insert(key, table);
    }

    /// Drop one entry; returns whether it was cached
    pub async fn invalidate(&self, key: &SourceKey) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Drop every entry; returns how many were cached
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_invalidate() {
        let cache = AcquisitionCache::new();
        let key = SourceKey::Remote("abc".to_string());
        assert!(cache.get(&key).await.is_none());

        cache.insert(key.clone(), Arc::new(ShipmentTable::default())).await;
        assert!(cache.get(&key).await.is_some());
        assert!(cache.get(&SourceKey::Remote("other".to_string())).await.is_none());

        assert!(cache.invalidate(&key).await);
        assert!(!cache.invalidate(&key).await);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = AcquisitionCache::new();
        cache.insert(SourceKey::Path("a.csv".into()), Arc::new(ShipmentTable::default())).await;
        cache.insert(SourceKey::Remote("b".into()), Arc::new(ShipmentTable::default())).await;
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.clear().await, 2);
        assert_eq!(cache.len().await, 0);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(SourceKey::Remote("x1".into()).to_string(), "remote:x1");
        assert_eq!(SourceKey::Path("data/a.csv".into()).to_string(), "path:data/a.csv");
    }
}
