use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::{ConvertConfig, DEFAULT_BATCH_THRESHOLD_MS};

/// Default script filename when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "har-script.js";

/// Caller-side defaults loaded from `~/.config/har2k6/config.toml`.
///
/// Command-line flags override every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Script output filename.
    pub output: String,
    /// Start-time gap in milliseconds at which requests are split into a new batch.
    pub batch_threshold_ms: i64,
    /// Add a status check for each replayed request.
    pub enable_status_code_checks: bool,
    /// Stop the iteration on the first failed check (requires checks).
    #[serde(default)]
    pub return_on_failed_check: bool,
    /// Domains always included when no `--only` is given.
    #[serde(default)]
    pub only: Vec<String>,
    /// Domains always skipped when no `--skip` is given.
    #[serde(default)]
    pub skip: Vec<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.to_string(),
            batch_threshold_ms: DEFAULT_BATCH_THRESHOLD_MS,
            enable_status_code_checks: false,
            return_on_failed_check: false,
            only: Vec::new(),
            skip: Vec::new(),
        }
    }
}

impl FileConfig {
    /// Generator settings from these defaults alone.
    pub fn convert_config(&self) -> ConvertConfig {
        ConvertConfig {
            only_domains: self.only.clone(),
            skip_domains: self.skip.clone(),
            batch_threshold_ms: self.batch_threshold_ms,
            enable_checks: self.enable_status_code_checks,
            return_on_failed_check: self.return_on_failed_check,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("har2k6")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FileConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        let default_cfg = FileConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    read_config(path)
}

/// Like [`load_or_init`], but an unusable config location (no XDG home, read-only
/// directory) falls back to the defaults instead of failing. A config file that
/// exists but cannot be read or parsed is still an error.
pub fn load_or_default() -> Result<FileConfig> {
    match config_path() {
        Ok(path) => load_or_default_at(&path),
        Err(e) => {
            tracing::warn!("config directory unavailable, using defaults: {e:#}");
            Ok(FileConfig::default())
        }
    }
}

/// Same as [`load_or_default`] for an explicit path.
pub fn load_or_default_at(path: &Path) -> Result<FileConfig> {
    if path.exists() {
        return read_config(path);
    }
    match load_or_init_at(path) {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            tracing::warn!("could not create {}, using defaults: {e:#}", path.display());
            Ok(FileConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FileConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
