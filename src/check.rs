use std::path::Path;

use crate::config::load_store_config;
use crate::error::{MakeIosError, Result};
use crate::placeholder::KNOWN_TOKENS;
use crate::template::load_template_set;

/// Summary of one template set in a checked store.
pub struct SetSummary {
    pub name: String,
    pub description: Option<String>,
    pub file_count: usize,
    pub binary_count: usize,
    pub tokens: Vec<String>,
}

/// Result of validating a template store.
pub struct CheckResult {
    pub store_name: String,
    pub sets: Vec<SetSummary>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CheckResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a template store: every set loads, and every token it uses can be bound.
///
/// Problems with individual sets are collected rather than returned, so one
/// run reports all of them. A missing or unparsable `make-ios.toml` is still
/// an error.
pub fn check_store(store_root: &Path) -> Result<CheckResult> {
    let config = load_store_config(store_root)?;

    let mut sets = Vec::new();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for name in config.sets.keys() {
        let set = match load_template_set(store_root, &config, name) {
            Ok(set) => set,
            Err(e) => {
                errors.push(format!("Set '{name}': {}", describe(&e)));
                continue;
            }
        };

        if set.is_empty() {
            warnings.push(format!("Set '{name}' contains no files"));
        }

        for file in &set.files {
            for token in &file.tokens {
                if !KNOWN_TOKENS.contains(&token.as_str()) {
                    errors.push(format!(
                        "Set '{name}': {} uses unknown token {token}",
                        file.destination.display()
                    ));
                }
            }
        }

        sets.push(SetSummary {
            name: set.name.clone(),
            description: set.description.clone(),
            file_count: set.len(),
            binary_count: set.files.iter().filter(|f| f.is_binary()).count(),
            tokens: set.tokens().into_iter().collect(),
        });
    }

    if config.store.version.is_none() {
        warnings.push("No 'version' specified in [store] section".to_string());
    }

    Ok(CheckResult {
        store_name: config.store.name,
        sets,
        warnings,
        errors,
    })
}

fn describe(err: &MakeIosError) -> String {
    match err {
        MakeIosError::Io { context, source } => format!("{context}: {source}"),
        other => other.to_string(),
    }
}
