use anyhow::Context;
use tw_config::TrackwayConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TrackwayConfig> {
    let mut config = TrackwayConfig::load_with_dotenv().context("failed to load configuration")?;
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
    Ok(config)
}
