use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/reqcat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReqcatConfig {
    /// Catalogue database location. Defaults to `~/.local/state/reqcat/catalog.db`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Header names excluded from filtered fingerprints on every import,
    /// in addition to the names given per import.
    #[serde(default)]
    pub default_ignored_headers: Vec<String>,
    /// Rows per multi-row INSERT when persisting an import.
    pub insert_batch_size: usize,
    /// Decode `content.encoding = "base64"` response bodies before hashing and storage.
    /// Changes fingerprint values, so keep it fixed for a given catalogue.
    #[serde(default)]
    pub decode_base64_bodies: bool,
    /// Reject uploads whose file name does not end in `.har`.
    pub require_har_extension: bool,
}

impl Default for ReqcatConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            default_ignored_headers: Vec::new(),
            insert_batch_size: 100,
            decode_base64_bodies: false,
            require_har_extension: true,
        }
    }
}

impl ReqcatConfig {
    /// Resolved database path: the configured override or the XDG state default.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(p) => Ok(p.clone()),
            None => default_database_path(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reqcat")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

pub fn default_database_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reqcat")?;
    Ok(xdg_dirs.get_state_home().join("reqcat").join("catalog.db"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReqcatConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ReqcatConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ReqcatConfig = toml::from_str(&data)?;
    Ok(cfg)
}
