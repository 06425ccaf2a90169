pub mod assemble;
pub mod check;
pub mod config;
pub mod error;
pub mod generator;
pub mod params;
pub mod placeholder;
pub mod ready;
pub mod template;

use std::path::{Path, PathBuf};

use console::style;

use crate::assemble::{execute_assembly, plan_assembly, AssembledProject, AssemblyPlan};
use crate::config::{load_store_config, locate_store, UserConfig};
use crate::error::Result;
use crate::generator::{run_generator, ProjectGenerator};
use crate::params::{resolve_parameters, ParameterInput, ParameterSet, ResolveOptions};
use crate::placeholder::PlaceholderBindings;
use crate::template::load_template_set;

pub struct GenerateOptions {
    pub input: ParameterInput,
    /// Prompt for values not given on the command line.
    pub interactive: bool,
    pub templates: Option<PathBuf>,
    /// Base for relative paths and for the derived project name.
    pub cwd: PathBuf,
}

/// Everything needed to write a project that has been planned but not yet written.
#[derive(Debug)]
pub struct FullGenerationPlan {
    pub params: ParameterSet,
    pub target: PathBuf,
    pub store_root: PathBuf,
    pub assembly: AssemblyPlan,
}

/// Plan a project generation: resolve parameters, load the template set, substitute in memory.
///
/// Nothing is written to disk. An explicit `--output` is checked before any
/// prompt, and the resolved target is checked again once the project name is
/// known, so a dry run reports the same conflict a real run would.
pub fn plan_generation(options: GenerateOptions, user: &UserConfig) -> Result<FullGenerationPlan> {
    let store_root = locate_store(options.templates.as_deref(), Some(user))?;
    let store = load_store_config(&store_root)?;

    if let Some(output) = &options.input.output {
        assemble::check_target(&options.cwd.join(output))?;
    }

    let resolve_options = ResolveOptions {
        interactive: options.interactive,
        cwd: options.cwd,
    };
    let resolved = resolve_parameters(options.input, &resolve_options, user)?;
    assemble::check_target(&resolved.target)?;

    let set = load_template_set(&store_root, &store, resolved.params.paradigm.set_name())?;
    let bindings = PlaceholderBindings::from_parameters(&resolved.params);
    let assembly = plan_assembly(&set, &bindings)?;

    Ok(FullGenerationPlan {
        params: resolved.params,
        target: resolved.target,
        store_root,
        assembly,
    })
}

/// Write a planned project, then run the project generator on it.
///
/// Passing `None` for `generator` stops after the files are written.
pub fn execute_generation(
    plan: &FullGenerationPlan,
    generator: Option<&dyn ProjectGenerator>,
) -> Result<AssembledProject> {
    let result = execute_assembly(&plan.assembly, &plan.target)?;

    println!(
        "{} {} project {} assembled at {}",
        style("✓").green().bold(),
        plan.params.paradigm,
        style(&plan.params.project_name).bold(),
        style(plan.target.display()).cyan()
    );
    println!(
        "  {} files rendered, {} files copied",
        result.files_rendered.len(),
        result.files_copied.len()
    );

    if let Some(generator) = generator {
        run_generator(generator, &plan.target)?;
        println!(
            "\n{} Xcode project generated with {}",
            style("✓").green().bold(),
            generator.name()
        );
    }

    Ok(result)
}

/// Assemble a project from an explicit parameter set, without prompting.
pub fn generate_project(
    store_root: &Path,
    params: &ParameterSet,
    target: &Path,
    generator: Option<&dyn ProjectGenerator>,
) -> Result<AssembledProject> {
    let store = load_store_config(store_root)?;
    let set = load_template_set(store_root, &store, params.paradigm.set_name())?;
    let bindings = PlaceholderBindings::from_parameters(params);
    let result = assemble::assemble(&set, &bindings, target)?;

    if let Some(generator) = generator {
        run_generator(generator, target)?;
    }

    Ok(result)
}
