use std::path::PathBuf;

use console::style;
use miette::Result;

use make_ios::check::check_store;
use make_ios::config::{load_user_config, locate_store};

pub fn run(templates: Option<PathBuf>) -> Result<()> {
    let user = load_user_config()?;
    let store_root = locate_store(templates.as_deref(), user.as_ref())?;

    println!(
        "{} {}",
        style("Checking template store at").bold(),
        style(store_root.display()).cyan()
    );

    let result = check_store(&store_root)?;

    println!("  Name: {}", result.store_name);
    for set in &result.sets {
        println!(
            "  Set {}: {} files ({} binary), tokens: {}",
            style(&set.name).bold(),
            set.file_count,
            set.binary_count,
            if set.tokens.is_empty() {
                "none".to_string()
            } else {
                set.tokens.join(", ")
            }
        );
    }

    if !result.warnings.is_empty() {
        println!("\n{}", style("Warnings:").yellow().bold());
        for w in &result.warnings {
            println!("  {} {}", style("⚠").yellow(), w);
        }
    }

    if !result.errors.is_empty() {
        println!("\n{}", style("Errors:").red().bold());
        for e in &result.errors {
            println!("  {} {}", style("✗").red(), e);
        }
        println!(
            "\n{} Template store has {} error(s)",
            style("✗").red().bold(),
            result.errors.len()
        );
        std::process::exit(1);
    } else {
        println!("\n{} Template store is valid!", style("✓").green().bold());
    }

    Ok(())
}
