use std::path::Path;

use anyhow::Context;
use gate_config::{ConfigError, GateConfig};

/// Load `.env` and the layered configuration for the project at `root`.
pub fn load_config(root: &Path) -> anyhow::Result<GateConfig> {
    load_project_dotenv(root)?;

    let config = GateConfig::load_at(root).context("failed to load gate configuration")?;
    match config.validate() {
        Ok(()) => {}
        // The guard can still log with static notes.
        Err(ConfigError::NotConfigured { section }) => {
            tracing::warn!("{section} section is incomplete; using defaults");
        }
        Err(error) => return Err(error).context("invalid gate configuration"),
    }
    Ok(config)
}

fn load_project_dotenv(root: &Path) -> anyhow::Result<()> {
    let env_path = root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}
