use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::config::schema::{Mount, StoreConfig};
use crate::error::{MakeIosError, Result};
use crate::template::file::TemplateFile;

/// A named collection of template files, ordered by destination path.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub name: String,
    pub description: Option<String>,
    pub files: Vec<TemplateFile>,
}

impl TemplateSet {
    /// Union of every token referenced by the set.
    pub fn tokens(&self) -> BTreeSet<String> {
        self.files
            .iter()
            .flat_map(|f| f.tokens.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Load a template set: shared mounts first, then the set's own mounts.
///
/// `name` is matched case-insensitively against `[sets]`.
pub fn load_template_set(
    store_root: &Path,
    config: &StoreConfig,
    name: &str,
) -> Result<TemplateSet> {
    let (set_name, set_config) =
        config
            .find_set(name)
            .ok_or_else(|| MakeIosError::UnknownTemplateSet {
                name: name.to_string(),
                available: config.set_names(),
            })?;

    let exclude_set = build_glob_set(&config.files.exclude)?;
    let copy_set = build_glob_set(&config.files.copy_without_render)?;

    let mut by_destination: BTreeMap<PathBuf, TemplateFile> = BTreeMap::new();

    for mount in config.shared.iter().chain(set_config.mounts.iter()) {
        for file in load_mount(store_root, mount, &exclude_set, &copy_set)? {
            if let Some(existing) = by_destination.get(&file.destination) {
                return Err(MakeIosError::TemplateConflict {
                    destination: file.destination.clone(),
                    first: existing.source.clone(),
                    second: file.source,
                });
            }
            by_destination.insert(file.destination.clone(), file);
        }
    }

    Ok(TemplateSet {
        name: set_name.to_string(),
        description: set_config.description.clone(),
        files: by_destination.into_values().collect(),
    })
}

fn load_mount(
    store_root: &Path,
    mount: &Mount,
    exclude_set: &GlobSet,
    copy_set: &GlobSet,
) -> Result<Vec<TemplateFile>> {
    let source_dir = store_root.join(&mount.source);
    if !source_dir.is_dir() {
        return Err(MakeIosError::TemplateDirectoryMissing { path: source_dir });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(&source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| MakeIosError::Io {
            context: format!("walking {}", source_dir.display()),
            source: e.into(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let src_path = entry.path();
        let rel_path = src_path
            .strip_prefix(&source_dir)
            .expect("entry must be under source_dir");
        let destination = normalize(&Path::new(&mount.destination).join(rel_path));
        let dest_str = destination.to_string_lossy();

        if exclude_set.is_match(dest_str.as_ref()) {
            continue;
        }

        let content = std::fs::read(src_path).map_err(|e| MakeIosError::Io {
            context: format!("reading {}", src_path.display()),
            source: e,
        })?;

        let force_copy = copy_set.is_match(dest_str.as_ref());
        files.push(TemplateFile::new(
            src_path.to_path_buf(),
            destination,
            content,
            force_copy,
        ));
    }

    Ok(files)
}

/// Drop `.` components so `./Project.swift` and `Project.swift` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| MakeIosError::GlobPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| MakeIosError::GlobPattern {
        pattern: "<combined>".into(),
        source: e,
    })
}
