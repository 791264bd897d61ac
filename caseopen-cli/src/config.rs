use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults remembered between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    pub catalog_path: Option<PathBuf>,
    pub currency_index: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            currency_index: 0,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir().or_else(dirs::data_dir)?;
    base.push("CaseOpener");
    base.push("cli_config.json");
    Some(base)
}

pub fn load_config() -> CliConfig {
    config_path()
        .map(|path| load_config_from(&path))
        .unwrap_or_default()
}

pub fn load_config_from(path: &Path) -> CliConfig {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return CliConfig::default(),
    };
    match serde_json::from_str::<CliConfig>(&data) {
        Ok(cfg) => cfg,
        Err(err) => {
            log::warn!("ignoring unreadable config {}: {err}", path.display());
            CliConfig::default()
        }
    }
}

pub fn save_config(cfg: &CliConfig) -> std::io::Result<PathBuf> {
    let path = config_path().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
    })?;
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &CliConfig, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(cfg)?;
    fs::write(path, data)
}
