use std::path::{Path, PathBuf};

use crate::error::{MakeIosError, Result};

/// Files that must ship with a release of make-ios.
pub const RELEASE_MANIFEST: &[&str] = &[
    "Cargo.toml",
    "README.md",
    "LICENSE",
    "templates/make-ios.toml",
    "templates/SwiftUI/AppDelegate.swift",
    "templates/UIKit/AppDelegate.swift",
    "templates/tuist/Project.swift",
];

pub struct ManifestReport {
    pub present: Vec<PathBuf>,
    /// Every missing path, in manifest order.
    pub missing: Vec<PathBuf>,
}

impl ManifestReport {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check that every manifest path exists under `root`. Read-only.
pub fn check_manifest<P: AsRef<Path>>(root: &Path, manifest: &[P]) -> ManifestReport {
    let mut present = Vec::new();
    let mut missing = Vec::new();

    for entry in manifest {
        let rel = entry.as_ref();
        if root.join(rel).exists() {
            present.push(rel.to_path_buf());
        } else {
            missing.push(rel.to_path_buf());
        }
    }

    ManifestReport { present, missing }
}

/// Read a manifest file: one relative path per line, `#` comments and blank lines ignored.
pub fn load_manifest(path: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path).map_err(|e| MakeIosError::ManifestRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}
