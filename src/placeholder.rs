use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::params::ParameterSet;

pub const APP_NAME: &str = "APP_NAME_PLACEHOLDER";
pub const BUNDLE_ID: &str = "BUNDLE_ID_PLACEHOLDER";
pub const IOS_VERSION: &str = "IOS_VERSION_PLACEHOLDER";
pub const ORGANIZATION_NAME: &str = "ORGANIZATION_NAME_PLACEHOLDER";

/// Every token a `ParameterSet` can bind.
pub const KNOWN_TOKENS: &[&str] = &[APP_NAME, BUNDLE_ID, IOS_VERSION, ORGANIZATION_NAME];

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z][A-Z0-9_]*_PLACEHOLDER").expect("token pattern is valid"))
}

/// A token that appeared in a template but has no bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundToken(pub String);

/// Token → value mapping applied uniformly to every template file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderBindings {
    values: BTreeMap<String, String>,
}

impl PlaceholderBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(params: &ParameterSet) -> Self {
        let mut bindings = Self::new();
        bindings.insert(APP_NAME, &params.project_name);
        bindings.insert(BUNDLE_ID, &params.bundle_id);
        bindings.insert(IOS_VERSION, &params.ios_version);
        bindings.insert(ORGANIZATION_NAME, &params.organization);
        bindings
    }

    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token.into(), value.into());
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Collect every distinct placeholder token in `text`.
pub fn find_tokens(text: &str) -> BTreeSet<String> {
    token_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn contains_tokens(text: &str) -> bool {
    token_regex().is_match(text)
}

/// Tokens found in the components of a relative path.
pub fn find_path_tokens(path: &Path) -> BTreeSet<String> {
    path.components()
        .flat_map(|c| find_tokens(&c.as_os_str().to_string_lossy()))
        .collect()
}

/// Replace every token in `text` with its bound value in one left-to-right pass.
///
/// Values are inserted literally and never rescanned, so a value that happens to
/// look like a token stays as-is. Everything between tokens is copied untouched.
pub fn substitute(
    text: &str,
    bindings: &PlaceholderBindings,
) -> std::result::Result<String, UnboundToken> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in token_regex().find_iter(text) {
        let value = bindings
            .get(m.as_str())
            .ok_or_else(|| UnboundToken(m.as_str().to_string()))?;
        out.push_str(&text[last..m.start()]);
        out.push_str(value);
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Substitute tokens in each component of a relative path.
pub fn substitute_path(
    path: &Path,
    bindings: &PlaceholderBindings,
) -> std::result::Result<PathBuf, UnboundToken> {
    let mut rendered = PathBuf::new();
    for component in path.components() {
        let part = component.as_os_str().to_string_lossy();
        rendered.push(substitute(&part, bindings)?);
    }
    Ok(rendered)
}
