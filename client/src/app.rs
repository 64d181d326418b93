//! Startup wiring: open the store, migrate legacy data, load the repository
//! and run the automatic pull.

use crate::config::Config;
use crate::error::Result;
use crate::repository::Repository;
use crate::store::{self, legacy};
use crate::sync::RemoteSync;

/// Open the repository described by `config`.
///
/// When sync is configured, `pull_on_start` is set and this device already has
/// a sync key, the remote document is pulled once. A failed pull is logged and
/// the local list kept.
pub async fn open(config: &Config) -> Result<Repository> {
    let store = store::open(config).await?;
    legacy::migrate_legacy(store.as_ref(), &config.legacy_path()).await;

    let sync = match &config.sync_url {
        Some(url) => Some(RemoteSync::new(url, store.clone(), config.http_timeout)?),
        None => None,
    };

    let mut repository = Repository::load(store, sync).await?;
    if config.pull_on_start {
        auto_pull(&mut repository).await;
    }
    Ok(repository)
}

async fn auto_pull(repository: &mut Repository) {
    let Some(sync) = repository.sync() else {
        return;
    };
    match sync.sync_key().await {
        Ok(Some(_)) => {}
        Ok(None) => return,
        Err(e) => {
            tracing::warn!("Could not read sync key: {}", e);
            return;
        }
    }

    match repository.pull().await {
        Ok(count) => tracing::info!(count, "Pulled products from remote document"),
        Err(e) => tracing::warn!("Startup pull failed, using local data: {}", e),
    }
}
