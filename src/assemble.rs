use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{MakeIosError, Result};
use crate::placeholder::{contains_tokens, substitute, substitute_path, PlaceholderBindings};
use crate::template::{FileKind, TemplateSet};

/// A file that would be written during assembly.
#[derive(Debug)]
pub struct PlannedFile {
    /// Template file this was produced from.
    pub source: PathBuf,
    /// Path relative to the target directory, tokens already substituted.
    pub relative_path: PathBuf,
    pub content: Vec<u8>,
    /// Whether this file is copied verbatim (true) or had tokens substituted (false).
    pub is_copy: bool,
}

/// The result of planning an assembly without writing to disk.
#[derive(Debug)]
pub struct AssemblyPlan {
    pub set_name: String,
    pub files: Vec<PlannedFile>,
}

impl AssemblyPlan {
    pub fn rendered_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_copy).count()
    }

    pub fn copied_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_copy).count()
    }
}

#[derive(Debug)]
pub struct AssembledProject {
    pub output_dir: PathBuf,
    pub files_rendered: Vec<PathBuf>,
    pub files_copied: Vec<PathBuf>,
}

/// Substitute tokens in every file of the set, in memory.
///
/// Fails with `MissingBinding` if any path or text file uses a token that
/// `bindings` does not cover, and with `TemplateConflict` if two files end up
/// at the same path.
pub fn plan_assembly(set: &TemplateSet, bindings: &PlaceholderBindings) -> Result<AssemblyPlan> {
    for (token, value) in bindings.iter() {
        if contains_tokens(value) {
            return Err(MakeIosError::Validation {
                field: token.to_string(),
                message: format!("'{value}' must not itself contain a placeholder token"),
            });
        }
    }

    let mut files = Vec::with_capacity(set.files.len());
    let mut seen: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();

    for file in &set.files {
        let missing = |token: String| MakeIosError::MissingBinding {
            file: file.destination.clone(),
            token,
        };

        let relative_path =
            substitute_path(&file.destination, bindings).map_err(|t| missing(t.0))?;

        if let Some(first) = seen.get(&relative_path) {
            return Err(MakeIosError::TemplateConflict {
                destination: relative_path,
                first: first.clone(),
                second: file.source.clone(),
            });
        }
        seen.insert(relative_path.clone(), file.source.clone());

        let planned = match file.kind {
            FileKind::Binary => PlannedFile {
                source: file.source.clone(),
                relative_path,
                content: file.content.clone(),
                is_copy: true,
            },
            FileKind::Text => {
                let text = std::str::from_utf8(&file.content).map_err(|e| MakeIosError::Io {
                    context: format!("decoding {}", file.source.display()),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                })?;
                let rendered = substitute(text, bindings).map_err(|t| missing(t.0))?;
                PlannedFile {
                    source: file.source.clone(),
                    relative_path,
                    content: rendered.into_bytes(),
                    is_copy: false,
                }
            }
        };
        files.push(planned);
    }

    Ok(AssemblyPlan {
        set_name: set.name.clone(),
        files,
    })
}

/// The target must not exist, or be an empty directory.
pub fn check_target(target: &Path) -> Result<()> {
    if !target.exists() {
        return Ok(());
    }
    if !target.is_dir() {
        return Err(MakeIosError::TargetConflict {
            path: target.to_path_buf(),
        });
    }
    let has_contents = std::fs::read_dir(target)
        .map_err(|e| MakeIosError::Io {
            context: format!("reading {}", target.display()),
            source: e,
        })?
        .next()
        .is_some();
    if has_contents {
        return Err(MakeIosError::TargetConflict {
            path: target.to_path_buf(),
        });
    }
    Ok(())
}

/// Write a plan into `target`.
///
/// Files are written into a staging directory beside `target` and moved into
/// place only once every file has been written. On error the staging
/// directory is removed and `target` is left as it was.
///
/// If the process is killed while files are being written, the
/// `.make-ios-*` staging directory stays beside `target` and can be deleted.
pub fn execute_assembly(plan: &AssemblyPlan, target: &Path) -> Result<AssembledProject> {
    check_target(target)?;

    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| MakeIosError::Io {
        context: format!("creating directory {}", parent.display()),
        source: e,
    })?;

    let staging = tempfile::Builder::new()
        .prefix(".make-ios-")
        .tempdir_in(&parent)
        .map_err(|e| MakeIosError::Io {
            context: format!("creating staging directory in {}", parent.display()),
            source: e,
        })?;

    let mut files_rendered = Vec::new();
    let mut files_copied = Vec::new();

    for file in &plan.files {
        let dest_path = staging.path().join(&file.relative_path);
        if let Some(dir) = dest_path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| MakeIosError::Io {
                context: format!("creating directory for {}", file.relative_path.display()),
                source: e,
            })?;
        }
        std::fs::write(&dest_path, &file.content).map_err(|e| MakeIosError::Io {
            context: format!("writing {}", file.relative_path.display()),
            source: e,
        })?;
        if file.is_copy {
            files_copied.push(file.relative_path.clone());
        } else {
            files_rendered.push(file.relative_path.clone());
        }
    }

    if target.is_dir() {
        fill_empty_dir(staging.path(), target)?;
    } else {
        commit_staging(staging.path(), &parent, target)?;
    }
    // Whatever `staging` still guards is empty or vacant; dropping it cleans up.

    Ok(AssembledProject {
        output_dir: target.to_path_buf(),
        files_rendered,
        files_copied,
    })
}

/// Rename the staging directory onto a `target` that does not exist yet.
fn commit_staging(staging: &Path, parent: &Path, target: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // tempdir is created 0700. Follow the parent instead, without group or other write.
        let parent_mode = std::fs::metadata(parent)
            .map(|m| m.permissions().mode())
            .map_err(|e| MakeIosError::Io {
                context: format!("reading permissions of {}", parent.display()),
                source: e,
            })?;
        let mode = (parent_mode & 0o755) | 0o700;
        std::fs::set_permissions(staging, std::fs::Permissions::from_mode(mode)).map_err(
            |e| MakeIosError::Io {
                context: format!("setting permissions on {}", staging.display()),
                source: e,
            },
        )?;
    }
    #[cfg(not(unix))]
    let _ = parent;

    std::fs::rename(staging, target).map_err(|e| MakeIosError::Io {
        context: format!("moving generated project into {}", target.display()),
        source: e,
    })
}

/// Move each top-level staged entry into an existing empty `target`.
///
/// The directory itself is kept, so a shell sitting in it stays valid.
fn fill_empty_dir(staging: &Path, target: &Path) -> Result<()> {
    let entries = std::fs::read_dir(staging).map_err(|e| MakeIosError::Io {
        context: format!("reading {}", staging.display()),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| MakeIosError::Io {
            context: format!("reading {}", staging.display()),
            source: e,
        })?;
        let dest = target.join(entry.file_name());
        std::fs::rename(entry.path(), &dest).map_err(|e| MakeIosError::Io {
            context: format!("moving {} into place", dest.display()),
            source: e,
        })?;
    }
    Ok(())
}

/// Plan and write a template set into `target`.
pub fn assemble(
    set: &TemplateSet,
    bindings: &PlaceholderBindings,
    target: &Path,
) -> Result<AssembledProject> {
    let plan = plan_assembly(set, bindings)?;
    execute_assembly(&plan, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateFile;
    use std::fs;

    fn set_of(files: &[(&str, &str)]) -> TemplateSet {
        TemplateSet {
            name: "Test".into(),
            description: None,
            files: files
                .iter()
                .map(|(dest, content)| {
                    TemplateFile::new(
                        PathBuf::from("/store").join(dest),
                        PathBuf::from(dest),
                        content.as_bytes().to_vec(),
                        false,
                    )
                })
                .collect(),
        }
    }

    fn bindings() -> PlaceholderBindings {
        let mut b = PlaceholderBindings::new();
        b.insert("APP_NAME_PLACEHOLDER", "MyApp");
        b.insert("BUNDLE_ID_PLACEHOLDER", "com.example.myapp");
        b
    }

    #[test]
    fn test_plan_substitutes_paths_and_content() {
        let set = set_of(&[(
            "Targets/APP_NAME_PLACEHOLDER/Info.plist",
            "<string>BUNDLE_ID_PLACEHOLDER</string>",
        )]);
        let plan = plan_assembly(&set, &bindings()).unwrap();
        assert_eq!(plan.files.len(), 1);
        assert_eq!(
            plan.files[0].relative_path,
            PathBuf::from("Targets/MyApp/Info.plist")
        );
        assert_eq!(
            plan.files[0].content,
            b"<string>com.example.myapp</string>".to_vec()
        );
        assert_eq!(plan.rendered_count(), 1);
        assert_eq!(plan.copied_count(), 0);
    }

    #[test]
    fn test_plan_missing_binding_names_file_and_token() {
        let set = set_of(&[("Config.xcconfig", "TEAM = TEAM_ID_PLACEHOLDER")]);
        let err = plan_assembly(&set, &bindings()).unwrap_err();
        match err {
            MakeIosError::MissingBinding { file, token } => {
                assert_eq!(file, PathBuf::from("Config.xcconfig"));
                assert_eq!(token, "TEAM_ID_PLACEHOLDER");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plan_missing_binding_in_path() {
        let set = set_of(&[("TEAM_ID_PLACEHOLDER/readme.md", "hello")]);
        let err = plan_assembly(&set, &bindings()).unwrap_err();
        assert!(matches!(err, MakeIosError::MissingBinding { .. }));
    }

    #[test]
    fn test_plan_rejects_token_in_value() {
        let mut b = bindings();
        b.insert("ORGANIZATION_NAME_PLACEHOLDER", "ACME_PLACEHOLDER");
        let err = plan_assembly(&set_of(&[]), &b).unwrap_err();
        assert!(matches!(err, MakeIosError::Validation { .. }));
    }

    #[test]
    fn test_plan_detects_rendered_collision() {
        let set = set_of(&[
            ("APP_NAME_PLACEHOLDER.swift", "a"),
            ("MyApp.swift", "b"),
        ]);
        let err = plan_assembly(&set, &bindings()).unwrap_err();
        assert!(matches!(err, MakeIosError::TemplateConflict { .. }));
    }

    #[test]
    fn test_binary_copied_verbatim() {
        let png: &[u8] = b"\x89PNG\r\n\x1a\n\0\0APP_NAME_PLACEHOLDER\0";
        let set = TemplateSet {
            name: "Test".into(),
            description: None,
            files: vec![TemplateFile::new(
                PathBuf::from("/store/icon.png"),
                PathBuf::from("Resources/icon.png"),
                png.to_vec(),
                false,
            )],
        };
        let plan = plan_assembly(&set, &bindings()).unwrap();
        assert!(plan.files[0].is_copy);
        assert_eq!(plan.files[0].content, png.to_vec());
    }

    #[test]
    fn test_execute_writes_tree() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("out/MyApp");
        let set = set_of(&[
            ("Project.swift", "let name = \"APP_NAME_PLACEHOLDER\"\n"),
            ("Targets/APP_NAME_PLACEHOLDER/Sources/App.swift", "// APP_NAME_PLACEHOLDER\n"),
        ]);

        let result = assemble(&set, &bindings(), &target).unwrap();
        assert_eq!(result.files_rendered.len(), 2);
        assert_eq!(
            fs::read_to_string(target.join("Project.swift")).unwrap(),
            "let name = \"MyApp\"\n"
        );
        assert!(target.join("Targets/MyApp/Sources/App.swift").exists());

        // No staging directory left behind.
        let leftovers: Vec<_> = fs::read_dir(root.path().join("out"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".make-ios-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_execute_into_empty_dir() {
        let root = tempfile::tempdir().unwrap();
        let set = set_of(&[
            ("README.md", "# APP_NAME_PLACEHOLDER"),
            ("Targets/APP_NAME_PLACEHOLDER/App.swift", "// APP_NAME_PLACEHOLDER"),
        ]);
        assemble(&set, &bindings(), root.path()).unwrap();
        assert_eq!(
            fs::read_to_string(root.path().join("README.md")).unwrap(),
            "# MyApp"
        );
        assert!(root.path().join("Targets/MyApp/App.swift").is_file());
    }

    #[test]
    fn test_execute_into_empty_dir_given_as_dot_path() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("empty-app");
        fs::create_dir(&target).unwrap();
        let set = set_of(&[("README.md", "# APP_NAME_PLACEHOLDER")]);

        assemble(&set, &bindings(), &target.join(".")).unwrap();
        assert_eq!(
            fs::read_to_string(target.join("README.md")).unwrap(),
            "# MyApp"
        );

        let leftovers: Vec<_> = fs::read_dir(root.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".make-ios-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_keeps_existing_empty_dir() {
        use std::os::unix::fs::MetadataExt;

        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("MyApp");
        fs::create_dir(&target).unwrap();
        let inode = fs::metadata(&target).unwrap().ino();

        assemble(&set_of(&[("README.md", "# APP_NAME_PLACEHOLDER")]), &bindings(), &target)
            .unwrap();

        assert_eq!(fs::metadata(&target).unwrap().ino(), inode);
        assert!(target.join("README.md").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_target_follows_parent_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let parent = root.path().join("projects");
        fs::create_dir(&parent).unwrap();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o750)).unwrap();
        let target = parent.join("MyApp");

        assemble(&set_of(&[("README.md", "x")]), &bindings(), &target).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }

    #[test]
    fn test_execute_refuses_non_empty_target() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("keep.txt"), "user data").unwrap();
        let set = set_of(&[("README.md", "# APP_NAME_PLACEHOLDER")]);

        let err = assemble(&set, &bindings(), root.path()).unwrap_err();
        assert!(matches!(err, MakeIosError::TargetConflict { .. }));
        assert_eq!(
            fs::read_to_string(root.path().join("keep.txt")).unwrap(),
            "user data"
        );
        assert!(!root.path().join("README.md").exists());
    }

    #[test]
    fn test_execute_refuses_file_target() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("MyApp");
        fs::write(&target, "not a directory").unwrap();
        let err = check_target(&target).unwrap_err();
        assert!(matches!(err, MakeIosError::TargetConflict { .. }));
    }

    #[test]
    fn test_failed_plan_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("MyApp");
        let set = set_of(&[
            ("A.swift", "APP_NAME_PLACEHOLDER"),
            ("B.swift", "UNKNOWN_PLACEHOLDER"),
        ]);
        assert!(assemble(&set, &bindings(), &target).is_err());
        assert!(!target.exists());
    }
}
