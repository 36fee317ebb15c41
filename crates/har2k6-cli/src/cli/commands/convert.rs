//! `har2k6 convert <path>` – decode a HAR file and write a k6 script.

use anyhow::{Context, Result};
use har2k6_core::config::FileConfig;
use har2k6_core::{convert, decode_reader, output, ConvertConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Values given on the command line; `None`/empty fall back to the config file.
#[derive(Debug, Clone, Default)]
pub struct ConvertOverrides {
    pub output: Option<PathBuf>,
    pub only: Vec<String>,
    pub skip: Vec<String>,
    pub batch_threshold: Option<u64>,
    pub enable_status_code_checks: Option<bool>,
    pub return_on_failed_check: Option<bool>,
}

/// Collapses a `--flag`/`--no-flag` pair: `None` when neither was given.
/// clap keeps only the last of the pair, so at most one is set.
pub fn flag_override(set: bool, unset: bool) -> Option<bool> {
    match (set, unset) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Output path and generator settings after applying flags over file defaults.
pub fn resolve_settings(
    overrides: &ConvertOverrides,
    cfg: &FileConfig,
) -> Result<(PathBuf, ConvertConfig)> {
    let mut settings = cfg.convert_config();
    if !overrides.only.is_empty() {
        settings.only_domains = overrides.only.clone();
    }
    if !overrides.skip.is_empty() {
        settings.skip_domains = overrides.skip.clone();
    }
    if let Some(ms) = overrides.batch_threshold {
        settings.batch_threshold_ms =
            i64::try_from(ms).context("--batch-threshold is too large")?;
    }
    if let Some(enabled) = overrides.enable_status_code_checks {
        settings.enable_checks = enabled;
    }
    if let Some(ret) = overrides.return_on_failed_check {
        settings.return_on_failed_check = ret;
    }

    let output = overrides
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.output));
    Ok((output, settings))
}

pub fn run_convert(path: &Path, overrides: &ConvertOverrides, cfg: &FileConfig) -> Result<()> {
    let (output_path, settings) = resolve_settings(overrides, cfg)?;
    let script = convert_file(path, &settings)?;
    output::write_script(&output_path, &script)?;
    println!("Wrote k6 script to {}", output_path.display());
    Ok(())
}

/// Reads and converts one HAR file. The input handle is closed before conversion.
pub fn convert_file(path: &Path, settings: &ConvertConfig) -> Result<String> {
    let archive = {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        decode_reader(BufReader::new(file))
            .with_context(|| format!("decode HAR file: {}", path.display()))?
    };
    tracing::info!(
        path = %path.display(),
        entries = archive.entries.len(),
        pages = archive.pages.len(),
        "decoded HAR file"
    );
    let script = convert(&archive, settings).context("convert HAR to k6 script")?;
    Ok(script)
}
