use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Header-probe timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

/// Duplicate-record lookup retry parameters. The record store can lag behind
/// submission; lookups are retried on a fixed delay, then dropped silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheckConfig {
    /// Maximum lookup retries after the initial attempt.
    pub max_retries: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for DuplicateCheckConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay_ms: 50,
        }
    }
}

/// Global configuration loaded from `~/.config/mediasave/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaverConfig {
    pub probe: ProbeConfig,
    pub duplicate_check: DuplicateCheckConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mediasave")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SaverConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SaverConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SaverConfig = toml::from_str(&data)?;
    Ok(cfg)
}
