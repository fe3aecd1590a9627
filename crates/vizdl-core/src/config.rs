use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{DEFAULT_ACCEPT_LANGUAGE, DEFAULT_CATALOG_URL};
use crate::retry::RetryPolicy;

/// Retry parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt of each page fetch or download.
    pub retry_count: u32,
    /// Fixed pause between attempts, in seconds (e.g. 0.5 = 500ms).
    pub retry_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_delay_secs: 5.0,
        }
    }
}

/// Global configuration loaded from `~/.config/vizdl/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizdlConfig {
    /// Catalog endpoint; the page number is set as the `page` query parameter.
    pub catalog_url: String,
    /// Sent as `Accept-Language` on catalog requests.
    pub accept_language: String,
    /// Destination folder, relative to the working directory unless absolute.
    pub download_dir: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for VizdlConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            download_dir: PathBuf::from("downloads"),
            timeout_secs: 30,
            retry: None,
        }
    }
}

/// Per-invocation overrides; `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub retry_count: Option<u32>,
    pub retry_delay_secs: Option<f64>,
    pub timeout_secs: Option<u64>,
    pub download_dir: Option<PathBuf>,
}

/// Effective settings for one run: flag > config file > default.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub catalog_url: String,
    pub accept_language: String,
    pub download_dir: PathBuf,
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
}

impl Settings {
    pub fn resolve(cfg: &VizdlConfig, overrides: &Overrides) -> Result<Settings> {
        let retry = cfg.retry.clone().unwrap_or_default();
        let delay_secs = overrides.retry_delay_secs.unwrap_or(retry.retry_delay_secs);
        let retry_delay = Duration::try_from_secs_f64(delay_secs)
            .with_context(|| format!("invalid retry delay: {} seconds", delay_secs))?;
        let timeout_secs = overrides.timeout_secs.unwrap_or(cfg.timeout_secs);
        if timeout_secs == 0 {
            anyhow::bail!("timeout must be at least 1 second");
        }
        Ok(Settings {
            catalog_url: cfg.catalog_url.clone(),
            accept_language: cfg.accept_language.clone(),
            download_dir: overrides
                .download_dir
                .clone()
                .unwrap_or_else(|| cfg.download_dir.clone()),
            timeout: Duration::from_secs(timeout_secs),
            retry_policy: RetryPolicy::new(
                overrides.retry_count.unwrap_or(retry.retry_count),
                retry_delay,
            ),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vizdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VizdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VizdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file; it must exist.
pub fn load_from_path(path: &Path) -> Result<VizdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: VizdlConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}
