use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "make-ios",
    about = "Create a new iOS app with Tuist",
    version,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub new: NewArgs,
}

/// Generate a new project (the default when no subcommand is given).
#[derive(Args, Debug, Default)]
pub struct NewArgs {
    /// Name of your iOS project (default: derived from the directory name)
    pub project_name: Option<String>,

    /// Directory to create the project in (default: ./<project-name>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Bundle identifier, e.g. com.example.myapp
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Minimum iOS deployment target, e.g. 16.0
    #[arg(long)]
    pub ios_version: Option<String>,

    /// Organization name written into the Tuist project
    #[arg(long)]
    pub organization: Option<String>,

    /// UI framework template to use
    #[arg(long, value_name = "swiftui|uikit")]
    pub ui: Option<String>,

    /// Use default values without prompting
    #[arg(short = 'y', long)]
    pub defaults: bool,

    /// Template store directory (contains make-ios.toml)
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Path to the tuist executable
    #[arg(long)]
    pub tuist: Option<PathBuf>,

    /// Write the files but do not run tuist
    #[arg(long)]
    pub skip_generate: bool,

    /// Open the generated workspace in Xcode
    #[arg(long)]
    pub open: bool,

    /// Show the files that would be generated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, also print file contents
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the template sets in the template store
    List {
        /// Template store directory (contains make-ios.toml)
        #[arg(long)]
        templates: Option<PathBuf>,
    },

    /// Validate a template store
    Check {
        /// Template store directory (contains make-ios.toml)
        #[arg(long)]
        templates: Option<PathBuf>,
    },

    /// Check that every file required for a release is present
    Ready {
        /// Repository root to check (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// File listing required paths, one per line (default: built-in list)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_project_name() {
        let cli = Cli::try_parse_from(["make-ios", "MyApp", "--ui", "uikit", "-y"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.new.project_name.as_deref(), Some("MyApp"));
        assert_eq!(cli.new.ui.as_deref(), Some("uikit"));
        assert!(cli.new.defaults);
    }

    #[test]
    fn parses_without_arguments() {
        let cli = Cli::try_parse_from(["make-ios"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.new.project_name.is_none());
    }

    #[test]
    fn parses_ready_subcommand() {
        let cli = Cli::try_parse_from(["make-ios", "ready", "/repo"]).unwrap();
        match cli.command {
            Some(Commands::Ready { path, manifest }) => {
                assert_eq!(path, PathBuf::from("/repo"));
                assert!(manifest.is_none());
            }
            _ => panic!("expected ready subcommand"),
        }
    }

    #[test]
    fn verifies_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
