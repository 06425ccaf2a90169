use std::io::IsTerminal;

use console::style;
use miette::Result;

use make_ios::config::load_user_config;
use make_ios::error::MakeIosError;
use make_ios::generator::{ProjectGenerator, TuistGenerator, DEFAULT_TUIST};
use make_ios::params::ParameterInput;
use make_ios::GenerateOptions;

use crate::cli::NewArgs;

pub fn run(args: NewArgs) -> Result<()> {
    println!("{} iOS App Generator\n", style("==>").cyan().bold());

    let user = load_user_config()?.unwrap_or_default();
    let interactive =
        !args.defaults && std::io::stdin().is_terminal() && console::user_attended();

    let cwd = std::env::current_dir().map_err(|e| MakeIosError::Io {
        context: "getting current directory".into(),
        source: e,
    })?;

    let options = GenerateOptions {
        input: ParameterInput {
            project_name: args.project_name,
            output: args.output,
            bundle_id: args.bundle_id,
            ios_version: args.ios_version,
            organization: args.organization,
            ui: args.ui,
        },
        interactive,
        templates: args.templates,
        cwd,
    };

    let plan = make_ios::plan_generation(options, &user)?;

    if args.dry_run {
        print_dry_run(&plan, args.verbose);
        return Ok(());
    }

    let tuist = args
        .tuist
        .or(user.tuist)
        .unwrap_or_else(|| DEFAULT_TUIST.into());
    let generator = TuistGenerator::new(tuist).with_open(args.open);
    let generator: Option<&dyn ProjectGenerator> = if args.skip_generate {
        None
    } else {
        Some(&generator)
    };

    match make_ios::execute_generation(&plan, generator) {
        Ok(_) => {}
        Err(e @ MakeIosError::Interrupted { .. }) => {
            eprintln!("\n{} {e}", style("✗").red().bold());
            std::process::exit(e.exit_code());
        }
        Err(e) => return Err(e.into()),
    }

    println!("\nNext steps:");
    println!("  cd {}", plan.target.display());
    if args.skip_generate {
        println!("  tuist generate");
    } else if !args.open {
        println!("  open {}.xcworkspace", plan.params.project_name);
    }

    Ok(())
}

fn print_dry_run(plan: &make_ios::FullGenerationPlan, verbose: bool) {
    println!(
        "{} Dry run: {} files that would be generated in {}",
        style("==>").cyan().bold(),
        plan.assembly.set_name,
        style(plan.target.display()).cyan()
    );

    for file in &plan.assembly.files {
        let action = if file.is_copy { "copy  " } else { "create" };
        println!(
            "  {} {}",
            style(action).green(),
            file.relative_path.display()
        );

        if verbose {
            println!("  {}", style("──────").dim());
            if file.is_copy {
                println!(
                    "  {}",
                    style(format!("[binary file, {} bytes]", file.content.len())).dim()
                );
            } else {
                let content = String::from_utf8_lossy(&file.content);
                for line in content.lines() {
                    println!("  {}", line);
                }
            }
            println!("  {}", style("──────").dim());
            println!();
        }
    }

    println!(
        "\nSummary: {} rendered, {} copied",
        plan.assembly.rendered_count(),
        plan.assembly.copied_count()
    );
    println!(
        "\n{} Dry run, no files written.",
        style("\u{2139}").blue().bold()
    );
}
