use std::path::PathBuf;

use console::style;
use miette::Result;

use make_ios::config::{load_store_config, load_user_config, locate_store};
use make_ios::template::load_template_set;

pub fn run(templates: Option<PathBuf>) -> Result<()> {
    let user = load_user_config()?;
    let store_root = locate_store(templates.as_deref(), user.as_ref())?;
    let config = load_store_config(&store_root)?;

    println!(
        "{} {}",
        style("Template sets in").bold(),
        style(store_root.display()).cyan()
    );

    for name in config.sets.keys() {
        let set = load_template_set(&store_root, &config, name)?;
        let is_default = config
            .store
            .default_set
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(name));
        println!(
            "  {}{} ({} files)",
            style(&set.name).green().bold(),
            if is_default { " [default]" } else { "" },
            set.len()
        );
        if let Some(description) = &set.description {
            println!("    {}", style(description).dim());
        }
    }

    Ok(())
}
