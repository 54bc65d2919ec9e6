use crate::conf::{StoreConfig, StoreKind};
use crate::store::{EventStore, FileEventStore, MemoryEventStore};
use anyhow::{Context, Result, bail};
use std::fs;
use std::sync::Arc;

/// Build the configured store. The parent directory of a file store is
/// created up front so the first write cannot fail on a missing directory.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn EventStore>> {
    match config.kind {
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; events are lost on exit");
            Ok(Arc::new(MemoryEventStore::new()))
        }
        StoreKind::File => {
            let Some(path) = &config.path else {
                bail!("file store requires `store.path`");
            };

            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }

            tracing::info!(path = %path.display(), "using file store");
            Ok(Arc::new(FileEventStore::new(path)))
        }
    }
}
