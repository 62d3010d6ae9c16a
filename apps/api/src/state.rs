use std::sync::Arc;

use anyhow::{Context, Result};

use crate::collection::Collection;
use crate::config::Config;
use crate::models::{Job, Record, Target};

/// Everything the router needs: the two collections and the config they came from.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<Collection<Job>>,
    pub targets: Arc<Collection<Target>>,
    pub config: Config,
}

impl AppState {
    /// Resolves the data directory to an absolute path (creating it if needed)
    /// and opens one collection per data file. Files themselves are created
    /// lazily on first load.
    pub async fn new(config: Config) -> Result<Self> {
        let raw_dir = &config.data_dir;
        tokio::fs::create_dir_all(raw_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", raw_dir.display()))?;
        let data_dir = tokio::fs::canonicalize(raw_dir)
            .await
            .with_context(|| format!("Failed to resolve data directory {}", raw_dir.display()))?;

        Ok(AppState {
            jobs: Arc::new(Collection::new(data_dir.join(Job::FILE_NAME))),
            targets: Arc::new(Collection::new(data_dir.join(Target::FILE_NAME))),
            config,
        })
    }
}
