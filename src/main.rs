mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::List { templates }) => commands::list::run(templates),
        Some(Commands::Check { templates }) => commands::check::run(templates),
        Some(Commands::Ready { path, manifest }) => commands::ready::run(path, manifest),
        None => commands::new::run(cli.new),
    }
}
