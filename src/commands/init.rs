use crate::config::{default_config_toml, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Write the default config into `dir`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, default_config_toml())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}

pub fn init_config(force: bool) -> Result<()> {
    let dir = std::env::current_dir().context("Failed to get current directory")?;
    init_config_in(&dir, force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}
