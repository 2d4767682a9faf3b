//! Stevedore CLI entrypoint.
//!
//! This binary resolves a recipe's artefact rules against a source checkout
//! and copies the matching headers and libraries into a package tree. Results
//! go to stdout; progress and errors go to stderr.

use clap::Parser;
use std::io::Write;
use stevedore::cli::{Cli, Command, InfoArgs, PackageArgs, PlanArgs, ResolveArgs};
use stevedore::error::{PlacementError, Result};
use stevedore::output::{
    DryRunInfo, format_plan_human, format_plan_json, format_recipe_human, format_recipe_json,
    success_message, write_stderr_line,
};
use stevedore::plan::{PlacementPlan, resolve_plan};
use stevedore::recipe::Recipe;
use stevedore::stager::{ApplyOptions, apply_plan};
use stevedore::target::BuildTarget;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    init_logging(&cli, &mut stderr);
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Routes `log` records through `tracing-subscriber`; `RUST_LOG` overrides
/// the level implied by `-v`/`-q`.
fn init_logging(cli: &Cli, stderr: &mut dyn Write) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli.verbosity, cli.quiet)));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
    if let Err(err) = installed {
        write_stderr_line(stderr, format!("warning: logging disabled: {err}"));
    }
}

fn default_log_level(verbosity: u8, quiet: bool) -> &'static str {
    match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Plan(args) => run_plan(args, stdout),
        Command::Package(args) => run_package(args, cli.quiet, stdout, stderr),
        Command::Info(args) => run_info(args, stdout),
    }
}

/// Validates the target, loads the recipe, and resolves the plan.
///
/// The target is checked before anything is read from disk.
fn resolve(args: &ResolveArgs) -> Result<(Recipe, PlacementPlan)> {
    let target = BuildTarget::try_from(args.target.as_str())?;
    let recipe = Recipe::load_or_builtin(args.recipe.as_deref())?;
    let plan = resolve_plan(&args.source_root, &recipe.rules, &target)?;
    Ok((recipe, plan))
}

fn run_plan(args: &PlanArgs, stdout: &mut dyn Write) -> Result<()> {
    let (_, plan) = resolve(&args.resolve)?;
    let output = if args.json {
        format_plan_json(&plan)
    } else {
        format_plan_human(&plan)
    };
    write_stdout(stdout, output)
}

fn run_package(
    args: &PackageArgs,
    quiet: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let (recipe, plan) = resolve(&args.resolve)?;

    if args.dry_run {
        let info = DryRunInfo {
            recipe: &recipe,
            source_root: &args.resolve.source_root,
            package_root: &args.package_root,
            overwrite: args.overwrite_policy(),
            plan: &plan,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    if !quiet {
        write_stderr_line(
            stderr,
            format!(
                "Packaging {} {} for {} into {}...",
                recipe.metadata.name,
                recipe.metadata.version,
                plan.target(),
                args.package_root
            ),
        );
    }

    let options = ApplyOptions {
        overwrite: args.overwrite_policy(),
    };
    let report = apply_plan(&plan, &args.package_root, options).map_err(|failure| {
        if !failure.completed.is_empty() {
            write_stderr_line(
                stderr,
                format!("Copied before the failure ({}):", failure.completed.len()),
            );
            for placement in &failure.completed {
                write_stderr_line(stderr, format!("  {}", placement.destination));
            }
        }
        PlacementError::from(failure)
    })?;

    write_stdout(stdout, success_message(&report, &args.package_root))
}

fn run_info(args: &InfoArgs, stdout: &mut dyn Write) -> Result<()> {
    let recipe = Recipe::load_or_builtin(args.recipe.as_deref())?;
    let output = if args.json {
        format_recipe_json(&recipe)
    } else {
        format_recipe_human(&recipe)
    };
    write_stdout(stdout, output)
}

fn write_stdout(stdout: &mut dyn Write, output: String) -> Result<()> {
    writeln!(stdout, "{output}").map_err(|e| PlacementError::WriteFailed { source: e })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            err.exit_code()
        }
    }
}
