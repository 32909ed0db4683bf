use std::{env, path::PathBuf, rc::Rc, time::Duration};

use crate::{
    events::DEFAULT_NOTIFICATION_TTL,
    store::{FileStore, MemoryStore, SharedStore, StoreResult},
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON file backing the store; `None` keeps everything in memory.
    pub store_path: Option<PathBuf>,
    pub notification_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_path = env::var("STOREFRONT_STORE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let notification_ttl = env::var("STOREFRONT_NOTIFICATION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_NOTIFICATION_TTL);
        Ok(Self {
            store_path,
            notification_ttl,
        })
    }

    pub fn open_store(&self) -> StoreResult<SharedStore> {
        match &self.store_path {
            Some(path) => Ok(Rc::new(FileStore::open(path)?)),
            None => Ok(MemoryStore::shared()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}
