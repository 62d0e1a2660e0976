use std::path::Path;

use anyhow::Context;
use tw_config::TrackwayConfig;
use tw_db::service::ProgressService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: ProgressService,
    pub config: TrackwayConfig,
}

impl AppContext {
    /// Open the configured database, creating its directory when needed.
    pub async fn init(config: TrackwayConfig) -> anyhow::Result<Self> {
        if !config.database.is_in_memory() {
            if let Some(parent) = Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create database directory {}", parent.display())
                    })?;
                }
            }
        }

        let service = ProgressService::from_config(&config)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        tracing::debug!(path = %config.database.path, "trackway context ready");

        Ok(Self { service, config })
    }
}
