use std::path::PathBuf;

use console::style;
use miette::Result;

use make_ios::ready::{check_manifest, load_manifest, RELEASE_MANIFEST};

pub fn run(path: PathBuf, manifest: Option<PathBuf>) -> Result<()> {
    println!(
        "{} {}",
        style("Checking release readiness of").bold(),
        style(path.display()).cyan()
    );

    let required: Vec<PathBuf> = match manifest {
        Some(file) => load_manifest(&file)?,
        None => RELEASE_MANIFEST.iter().map(PathBuf::from).collect(),
    };

    let report = check_manifest(&path, &required);

    for rel in &required {
        if report.missing.contains(rel) {
            eprintln!("  {} Missing required file: {}", style("✗").red(), rel.display());
        } else {
            println!("  {} {}", style("✓").green(), rel.display());
        }
    }

    if report.is_ready() {
        println!("\n{} Ready for release!", style("✓").green().bold());
    } else {
        eprintln!(
            "\n{} {} required file(s) missing. Please check and try again.",
            style("✗").red().bold(),
            report.missing.len()
        );
        std::process::exit(1);
    }

    Ok(())
}
