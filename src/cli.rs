//! CLI argument definitions for `stevedore`.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::stager::OverwritePolicy;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Environment variable consulted when `--target` is not given.
pub const TARGET_ENV: &str = "STEVEDORE_TARGET";

/// Relocate prebuilt third-party headers and libraries into a package tree.
#[derive(Parser, Debug)]
#[command(name = "stevedore")]
#[command(version, about)]
#[command(long_about = concat!(
    "Relocate prebuilt third-party headers and libraries into a package tree.\n\n",
    "A recipe lists artefact rules: a file-name pattern, a source directory ",
    "relative to the source checkout, and a destination directory relative to ",
    "the package root. Either directory may embed {target}, which is replaced ",
    "with the build target for the run.\n\n",
    "Without --recipe the built-in spdlog recipe is used.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Show what would be copied:\n",
    "    $ stevedore plan --source-root src/spdlog --target win-x64\n\n",
    "  Package for the target chosen by the build orchestrator:\n",
    "    $ STEVEDORE_TARGET=win-x64 stevedore package -s src/spdlog -p dist\n\n",
    "  Describe a custom recipe:\n",
    "    $ stevedore info --recipe recipes/fmt.toml\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve and print the placement plan without copying anything.
    Plan(PlanArgs),

    /// Resolve the plan and copy every file into the package root.
    Package(PackageArgs),

    /// Print recipe metadata and rules.
    Info(InfoArgs),
}

/// Inputs shared by commands that resolve a plan.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Root of the source checkout.
    #[arg(short, long, value_name = "DIR")]
    pub source_root: Utf8PathBuf,

    /// Build target identifier substituted for {target}.
    #[arg(short, long, value_name = "TARGET", env = TARGET_ENV)]
    pub target: String,

    /// Recipe file to use instead of the built-in spdlog recipe.
    #[arg(short, long, value_name = "FILE")]
    pub recipe: Option<Utf8PathBuf>,
}

/// Arguments for the plan command.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Where to look and what to look for.
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the package command.
#[derive(Args, Debug, Clone)]
pub struct PackageArgs {
    /// Where to look and what to look for.
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Destination package root.
    #[arg(short, long, value_name = "DIR")]
    pub package_root: Utf8PathBuf,

    /// Leave destination files whose contents already match untouched.
    #[arg(long)]
    pub skip_identical: bool,

    /// Show the plan and configuration, then exit without copying.
    #[arg(long)]
    pub dry_run: bool,
}

impl PackageArgs {
    /// The overwrite policy selected by the flags.
    #[must_use]
    pub fn overwrite_policy(&self) -> OverwritePolicy {
        if self.skip_identical {
            OverwritePolicy::SkipIdentical
        } else {
            OverwritePolicy::Always
        }
    }
}

/// Arguments for the info command.
#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Recipe file to describe instead of the built-in spdlog recipe.
    #[arg(short, long, value_name = "FILE")]
    pub recipe: Option<Utf8PathBuf>,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
