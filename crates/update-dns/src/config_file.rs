//! Configuration file discovery and loading.
//!
//! Search order, first existing file wins:
//!
//! 1. `--config` / `UPDATE_DNS_CONFIG`
//! 2. `$HOME/.update-dns/update-dns.toml`
//! 3. `$HOME/.update-dns/update-dns.json`
//! 4. `<platform config dir>/config.toml`

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};
use update_dns_core::UpdateConfig;

/// Default locations, in search order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(base) = BaseDirs::new() {
        let dir = base.home_dir().join(".update-dns");
        paths.push(dir.join("update-dns.toml"));
        paths.push(dir.join("update-dns.json"));
    }

    if let Some(dirs) = ProjectDirs::from("org", "update-dns", "update-dns") {
        paths.push(dirs.config_dir().join("config.toml"));
    }

    paths
}

/// Find the configuration file to load
///
/// An explicit path must exist. Otherwise the first existing candidate is
/// returned.
pub fn find_config_file(explicit: Option<&Path>, candidates: &[PathBuf]) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_file() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        return Ok(path.to_path_buf());
    }

    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| {
            let searched: Vec<String> =
                candidates.iter().map(|p| p.display().to_string()).collect();
            anyhow::anyhow!("No config file found (searched: {})", searched.join(", "))
        })
}

/// Load a configuration file, choosing the format by extension
pub fn load_config(path: &Path) -> Result<UpdateConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Fatal error reading config file {}", path.display()))?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => UpdateConfig::from_json_str(&content),
        Some("toml") | None => UpdateConfig::from_toml_str(&content),
        Some(other) => anyhow::bail!("Unsupported config file extension: .{}", other),
    }
    .with_context(|| format!("Fatal error parsing config file {}", path.display()))?;

    Ok(config)
}
