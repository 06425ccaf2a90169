#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Coarse error category, so callers can react without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    MissingBinding,
    TargetConflict,
    Template,
    Io,
    ExternalTool,
    Cancelled,
}

#[derive(Debug, Error, Diagnostic)]
pub enum MakeIosError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Template {file} uses {token}, which has no value")]
    #[diagnostic(help(
        "The template store and this version of make-ios disagree; update one of them"
    ))]
    MissingBinding { file: PathBuf, token: String },

    #[error("Target directory already has content: {path}")]
    #[diagnostic(help("Choose another directory, or empty this one and try again"))]
    TargetConflict { path: PathBuf },

    #[error("Templates {first} and {second} both write {destination}")]
    #[diagnostic(help("Give one of the mounts in make-ios.toml a different destination"))]
    TemplateConflict {
        destination: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Template directory not found: {path}")]
    #[diagnostic(help("Every mount source in make-ios.toml must exist inside the store"))]
    TemplateDirectoryMissing { path: PathBuf },

    #[error("Template store not found at {path}")]
    #[diagnostic(help(
        "Pass --templates <dir>, or set MAKE_IOS_TEMPLATES to a directory containing make-ios.toml"
    ))]
    StoreNotFound { path: PathBuf },

    #[error("Failed to parse {path}")]
    #[diagnostic(help("Check the TOML syntax"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid template store config: {reason}")]
    ConfigInvalid { reason: String },

    #[error("Unknown template set '{name}'")]
    #[diagnostic(help("Available sets: {}", available.join(", ")))]
    UnknownTemplateSet {
        name: String,
        available: Vec<String>,
    },

    #[error("Glob pattern error: {pattern}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("{tool} is not installed or not on PATH")]
    #[diagnostic(help("Install Tuist (https://docs.tuist.dev) or pass --tuist <path>"))]
    ToolNotFound { tool: String },

    #[error("{tool} was interrupted")]
    Interrupted { tool: String },

    #[error("Prompt cancelled by user")]
    PromptCancelled,

    #[error("Failed to read manifest {path}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MakeIosError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MakeIosError::Validation { .. } => ErrorKind::Validation,
            MakeIosError::MissingBinding { .. } => ErrorKind::MissingBinding,
            MakeIosError::TargetConflict { .. } => ErrorKind::TargetConflict,
            MakeIosError::TemplateConflict { .. }
            | MakeIosError::TemplateDirectoryMissing { .. }
            | MakeIosError::StoreNotFound { .. }
            | MakeIosError::ConfigParse { .. }
            | MakeIosError::ConfigInvalid { .. }
            | MakeIosError::UnknownTemplateSet { .. }
            | MakeIosError::GlobPattern { .. } => ErrorKind::Template,
            MakeIosError::Io { .. } | MakeIosError::ManifestRead { .. } => ErrorKind::Io,
            MakeIosError::ExternalTool { .. }
            | MakeIosError::ToolNotFound { .. }
            | MakeIosError::Interrupted { .. } => ErrorKind::ExternalTool,
            MakeIosError::PromptCancelled => ErrorKind::Cancelled,
        }
    }

    /// Process exit code the CLI uses for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            MakeIosError::Interrupted { .. } => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, MakeIosError>;
