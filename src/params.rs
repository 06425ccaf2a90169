//! Collects and validates the values substituted into the templates.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::config::UserConfig;
use crate::error::{MakeIosError, Result};

pub const DEFAULT_BUNDLE_ID_PREFIX: &str = "com.example";
pub const DEFAULT_IOS_VERSION: &str = "16.0";
pub const DEFAULT_ORGANIZATION: &str = "YourOrganization";
pub const MIN_IOS_MAJOR: u32 = 13;
const MAX_PROJECT_NAME_LEN: usize = 64;

/// UI paradigm; names the template set to generate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Paradigm {
    #[default]
    SwiftUI,
    UIKit,
}

impl Paradigm {
    pub const ALL: [Paradigm; 2] = [Paradigm::SwiftUI, Paradigm::UIKit];

    pub fn set_name(self) -> &'static str {
        match self {
            Paradigm::SwiftUI => "SwiftUI",
            Paradigm::UIKit => "UIKit",
        }
    }
}

impl fmt::Display for Paradigm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.set_name())
    }
}

impl FromStr for Paradigm {
    type Err = MakeIosError;

    fn from_str(s: &str) -> Result<Self> {
        Paradigm::ALL
            .into_iter()
            .find(|p| p.set_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MakeIosError::Validation {
                field: "ui".into(),
                message: format!("'{s}' is not one of: swiftui, uikit"),
            })
    }
}

/// Validated generation parameters. Built once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    pub project_name: String,
    pub bundle_id: String,
    pub ios_version: String,
    pub organization: String,
    pub paradigm: Paradigm,
}

impl ParameterSet {
    /// Build a parameter set from explicit values, validating each one.
    pub fn new(
        project_name: impl Into<String>,
        bundle_id: impl Into<String>,
        ios_version: impl Into<String>,
        organization: impl Into<String>,
        paradigm: Paradigm,
    ) -> Result<Self> {
        let params = Self {
            project_name: project_name.into(),
            bundle_id: bundle_id.into(),
            ios_version: ios_version.into(),
            organization: organization.into(),
            paradigm,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check("project name", &self.project_name, validate_project_name)?;
        check("bundle id", &self.bundle_id, validate_bundle_id)?;
        check("iOS version", &self.ios_version, validate_ios_version)?;
        check("organization", &self.organization, validate_organization)?;
        Ok(())
    }
}

/// Raw values from the command line; any of them may be absent.
#[derive(Debug, Clone, Default)]
pub struct ParameterInput {
    pub project_name: Option<String>,
    pub output: Option<PathBuf>,
    pub bundle_id: Option<String>,
    pub ios_version: Option<String>,
    pub organization: Option<String>,
    pub ui: Option<String>,
}

pub struct ResolveOptions {
    /// Ask for missing values instead of using defaults.
    pub interactive: bool,
    /// Base for relative paths and for the derived project name.
    pub cwd: PathBuf,
}

/// Parameters plus the directory the project is generated into.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub params: ParameterSet,
    pub target: PathBuf,
}

/// Resolve every parameter: explicit input, then prompt, then user config, then built-in default.
pub fn resolve_parameters(
    input: ParameterInput,
    options: &ResolveOptions,
    user: &UserConfig,
) -> Result<Resolved> {
    let output = input.output.map(|o| options.cwd.join(o));

    let name_source = output.as_deref().unwrap_or(&options.cwd);
    let derived_name = derive_project_name(&base_name(name_source));

    let project_name = match input.project_name {
        Some(name) => explicit("project name", name, validate_project_name)?,
        None if options.interactive => {
            prompt_text("Project name", &derived_name, validate_project_name)?
        }
        None => derived_name,
    };

    let prefix = user
        .bundle_id_prefix
        .as_deref()
        .unwrap_or(DEFAULT_BUNDLE_ID_PREFIX);
    let default_bundle_id = derive_bundle_id(prefix, &project_name);
    let bundle_id = resolve_field(
        "bundle id",
        "Bundle identifier",
        input.bundle_id,
        &default_bundle_id,
        options.interactive,
        validate_bundle_id,
    )?;

    let ios_version = resolve_field(
        "iOS version",
        "Minimum iOS version",
        input.ios_version,
        user.ios_version.as_deref().unwrap_or(DEFAULT_IOS_VERSION),
        options.interactive,
        validate_ios_version,
    )?;

    let organization = resolve_field(
        "organization",
        "Organization name",
        input.organization,
        user.organization.as_deref().unwrap_or(DEFAULT_ORGANIZATION),
        options.interactive,
        validate_organization,
    )?;

    let paradigm = match input.ui.or_else(|| user.ui.clone()) {
        Some(ui) => ui.parse()?,
        None if options.interactive => prompt_paradigm()?,
        None => Paradigm::default(),
    };

    let target = output.unwrap_or_else(|| options.cwd.join(&project_name));

    let params = ParameterSet::new(project_name, bundle_id, ios_version, organization, paradigm)?;
    Ok(Resolved { params, target })
}

fn resolve_field(
    field: &str,
    prompt: &str,
    explicit_value: Option<String>,
    default: &str,
    interactive: bool,
    validate: fn(&str) -> std::result::Result<(), String>,
) -> Result<String> {
    match explicit_value {
        Some(value) => explicit(field, value, validate),
        None if interactive => prompt_text(prompt, default, validate),
        None => Ok(default.to_string()),
    }
}

fn explicit(
    field: &str,
    value: String,
    validate: fn(&str) -> std::result::Result<(), String>,
) -> Result<String> {
    check(field, &value, validate)?;
    Ok(value)
}

fn check(
    field: &str,
    value: &str,
    validate: fn(&str) -> std::result::Result<(), String>,
) -> Result<()> {
    validate(value).map_err(|message| MakeIosError::Validation {
        field: field.to_string(),
        message,
    })
}

fn prompt_text(
    prompt: &str,
    default: &str,
    validate: fn(&str) -> std::result::Result<(), String>,
) -> Result<String> {
    inquire::Text::new(prompt)
        .with_default(default)
        .with_validator(move |input: &str| match validate(input) {
            Ok(()) => Ok(inquire::validator::Validation::Valid),
            Err(msg) => Ok(inquire::validator::Validation::Invalid(
                inquire::validator::ErrorMessage::Custom(msg),
            )),
        })
        .prompt()
        .map_err(|_| MakeIosError::PromptCancelled)
}

fn prompt_paradigm() -> Result<Paradigm> {
    inquire::Select::new("UI framework", Paradigm::ALL.to_vec())
        .prompt()
        .map_err(|_| MakeIosError::PromptCancelled)
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("pattern is valid"))
}

fn bundle_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9-]*(\.[A-Za-z0-9][A-Za-z0-9-]*)+$")
            .expect("pattern is valid")
    })
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\.\d+(\.\d+)?$").expect("pattern is valid"))
}

pub fn validate_project_name(name: &str) -> std::result::Result<(), String> {
    if name.len() > MAX_PROJECT_NAME_LEN {
        return Err(format!("must be at most {MAX_PROJECT_NAME_LEN} characters"));
    }
    if !identifier_regex().is_match(name) {
        return Err(
            "must start with a letter and contain only letters, digits and underscores".into(),
        );
    }
    Ok(())
}

pub fn validate_bundle_id(bundle_id: &str) -> std::result::Result<(), String> {
    if bundle_id_regex().is_match(bundle_id) {
        Ok(())
    } else {
        Err("must be reverse-DNS, e.g. com.example.myapp".into())
    }
}

pub fn validate_ios_version(version: &str) -> std::result::Result<(), String> {
    let caps = version_regex()
        .captures(version)
        .ok_or_else(|| "must look like 16.0 or 16.4.1".to_string())?;
    let major: u32 = caps[1]
        .parse()
        .map_err(|_| "major version is out of range".to_string())?;
    if major < MIN_IOS_MAJOR {
        return Err(format!("must be {MIN_IOS_MAJOR}.0 or newer"));
    }
    Ok(())
}

pub fn validate_organization(organization: &str) -> std::result::Result<(), String> {
    if organization.trim().is_empty() {
        return Err("must not be empty".into());
    }
    if organization
        .chars()
        .any(|c| c.is_control() || c == '"' || c == '\\')
    {
        return Err("must not contain quotes, backslashes or control characters".into());
    }
    Ok(())
}

/// Turn a directory name into a project name: `my-cool_app` → `MyCoolApp`.
pub fn derive_project_name(base: &str) -> String {
    let mut name: String = base
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if name.is_empty() {
        return "MyApp".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "App");
    }
    name.truncate(MAX_PROJECT_NAME_LEN);
    name
}

/// `com.example` + `My_App` → `com.example.my-app`.
pub fn derive_bundle_id(prefix: &str, project_name: &str) -> String {
    let suffix = project_name.to_ascii_lowercase().replace('_', "-");
    format!("{prefix}.{suffix}")
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
