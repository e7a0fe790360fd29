//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod inspect;
pub mod sections;

use std::path::{Path, PathBuf};

use tracing::debug;

use ksef_core::KsefConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ksef2csv")
        .join("config.json")
}

/// Load configuration from `--config`, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<KsefConfig> {
    if let Some(path) = config_path {
        return Ok(KsefConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(KsefConfig::from_file(&path)?)
    } else {
        Ok(KsefConfig::default())
    }
}
