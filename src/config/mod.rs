pub mod schema;
pub mod user;

use std::path::{Path, PathBuf};

use crate::error::{MakeIosError, Result};

pub use schema::{FilesConfig, Mount, SetConfig, StoreConfig};
pub use user::{load_user_config, UserConfig};

pub const STORE_CONFIG_FILE: &str = "make-ios.toml";
pub const TEMPLATES_ENV: &str = "MAKE_IOS_TEMPLATES";

/// Load and validate the `make-ios.toml` of a template store.
pub fn load_store_config(store_root: &Path) -> Result<StoreConfig> {
    let config_path = store_root.join(STORE_CONFIG_FILE);
    if !config_path.exists() {
        return Err(MakeIosError::StoreNotFound {
            path: store_root.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| MakeIosError::Io {
        context: format!("reading {}", config_path.display()),
        source: e,
    })?;

    let config: StoreConfig =
        toml::from_str(&content).map_err(|e| MakeIosError::ConfigParse {
            path: config_path,
            source: e,
        })?;

    config.validate()?;

    Ok(config)
}

/// Find the template store directory.
///
/// Priority: explicit flag > user config > `MAKE_IOS_TEMPLATES` > next to the
/// installed binary > the source checkout this binary was built from.
pub fn locate_store(explicit: Option<&Path>, user: Option<&UserConfig>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = user.and_then(|u| u.templates_dir.as_ref()) {
        return Ok(path.clone());
    }

    if let Some(path) = std::env::var_os(TEMPLATES_ENV) {
        return Ok(PathBuf::from(path));
    }

    let installed = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|bin| bin.join("../share/make-ios/templates"));
    if let Some(path) = installed {
        if path.join(STORE_CONFIG_FILE).exists() {
            return Ok(path);
        }
    }

    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
    if bundled.join(STORE_CONFIG_FILE).exists() {
        return Ok(bundled);
    }

    Err(MakeIosError::StoreNotFound { path: bundled })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_store_config(dir.path()).unwrap_err();
        assert!(matches!(err, MakeIosError::StoreNotFound { .. }));
    }

    #[test]
    fn test_load_store_config_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_CONFIG_FILE), "[store\nname=").unwrap();
        let err = load_store_config(dir.path()).unwrap_err();
        assert!(matches!(err, MakeIosError::ConfigParse { .. }));
    }

    #[test]
    fn test_locate_store_prefers_explicit() {
        let user = UserConfig {
            templates_dir: Some(PathBuf::from("/from/user")),
            ..Default::default()
        };
        let found = locate_store(Some(Path::new("/from/flag")), Some(&user)).unwrap();
        assert_eq!(found, PathBuf::from("/from/flag"));

        let found = locate_store(None, Some(&user)).unwrap();
        assert_eq!(found, PathBuf::from("/from/user"));
    }

    #[test]
    fn test_bundled_store_loads() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        let config = load_store_config(&root).unwrap();
        assert!(config.find_set("SwiftUI").is_some());
        assert!(config.find_set("UIKit").is_some());
    }
}
