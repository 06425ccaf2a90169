use std::collections::BTreeMap;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{MakeIosError, Result};

/// Contents of `make-ios.toml` at the root of a template store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub store: StoreMetadata,

    #[serde(default)]
    pub files: FilesConfig,

    /// Mounts applied to every template set.
    #[serde(default)]
    pub shared: Vec<Mount>,

    #[serde(default)]
    pub sets: BTreeMap<String, SetConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreMetadata {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub default_set: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FilesConfig {
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub copy_without_render: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SetConfig {
    pub description: Option<String>,

    #[serde(default)]
    pub mounts: Vec<Mount>,
}

/// Maps a directory inside the store onto a directory inside the generated project.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Mount {
    pub source: String,
    /// May contain placeholder tokens, e.g. `Targets/APP_NAME_PLACEHOLDER/Sources`.
    #[serde(default = "default_destination")]
    pub destination: String,
}

fn default_destination() -> String {
    ".".to_string()
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sets.is_empty() {
            return Err(MakeIosError::ConfigInvalid {
                reason: "no template sets defined under [sets]".into(),
            });
        }

        if let Some(default) = &self.store.default_set {
            if self.find_set(default).is_none() {
                return Err(MakeIosError::ConfigInvalid {
                    reason: format!("default_set '{default}' is not defined under [sets]"),
                });
            }
        }

        let all_mounts = self
            .shared
            .iter()
            .map(|m| ("shared", m))
            .chain(
                self.sets
                    .iter()
                    .flat_map(|(name, set)| set.mounts.iter().map(move |m| (name.as_str(), m))),
            );

        for (owner, mount) in all_mounts {
            if !is_contained(Path::new(&mount.source)) {
                return Err(MakeIosError::ConfigInvalid {
                    reason: format!(
                        "mount source '{}' in {owner} must be a relative path inside the store",
                        mount.source
                    ),
                });
            }
            if !is_contained(Path::new(&mount.destination)) {
                return Err(MakeIosError::ConfigInvalid {
                    reason: format!(
                        "mount destination '{}' in {owner} must be a relative path inside the project",
                        mount.destination
                    ),
                });
            }
        }

        Ok(())
    }

    /// Look up a set by name, ignoring ASCII case.
    pub fn find_set(&self, name: &str) -> Option<(&str, &SetConfig)> {
        self.sets
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn set_names(&self) -> Vec<String> {
        self.sets.keys().cloned().collect()
    }
}

/// True for relative paths that never climb above their root.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
