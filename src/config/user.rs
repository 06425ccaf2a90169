use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{MakeIosError, Result};

/// User-level defaults loaded from `~/.config/make-ios/config.toml`.
///
/// Every field is optional; command-line flags always win.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Prefix for derived bundle identifiers, e.g. `"com.acme"`.
    pub bundle_id_prefix: Option<String>,
    pub ios_version: Option<String>,
    pub organization: Option<String>,
    /// Template set used when `--ui` is not given.
    pub ui: Option<String>,
    pub templates_dir: Option<PathBuf>,
    /// Path to the tuist executable.
    pub tuist: Option<PathBuf>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("make-ios").join("config.toml"))
}

/// Load user configuration from the XDG config directory.
///
/// Returns `Ok(None)` if the config file does not exist.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<Option<UserConfig>> {
    let path = match config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| MakeIosError::Io {
        context: format!("reading user config {}", path.display()),
        source: e,
    })?;

    let config: UserConfig =
        toml::from_str(&content).map_err(|e| MakeIosError::ConfigParse { path, source: e })?;

    Ok(Some(config))
}
