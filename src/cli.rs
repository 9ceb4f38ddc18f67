// src/cli.rs

use crate::{
    core::registry::Registry,
    system::executor::{self, OutputMode},
};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

const LOGGING_HELP: &str = "\
The report and the --verbose lines are written through the `log` facade, at the \
level and target set in perfmeter.toml (default: debug, target `perfmeter`). \
If RUST_LOG is set it replaces the default filter, so it must enable that target \
at that level (e.g. RUST_LOG=perfmeter=debug) or the report is not shown.";

/// perfmeter: time shell commands under named measurements and report the averages.
///
/// Each STEP is either `NAME=COMMAND` or just `COMMAND`, in which case the
/// program name becomes the measurement name. Every step runs `--repeat`
/// times, in order, and the statistics report is printed at the end.
///
/// Examples:
///   - `perfmeter -r 3 "load=sleep 0.01" "save=sleep 0.005"`
///   - `perfmeter --verbose "cargo check"`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, after_help = LOGGING_HELP)]
pub struct Cli {
    /// Commands to measure, as `NAME=COMMAND` or `COMMAND`.
    #[arg(required = true, value_name = "STEP")]
    pub steps: Vec<String>,

    /// How many times each step is run.
    #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// Log every run as it completes (overrides the config file and PERFMETER_VERBOSE).
    #[arg(long, short)]
    pub verbose: bool,

    /// Configuration file. Defaults to `perfmeter.toml` in the working directory, if present.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Keep running the remaining steps after a command fails.
    #[arg(long)]
    pub keep_going: bool,

    /// Discard the commands' own output.
    #[arg(long, short)]
    pub quiet: bool,
}

/// A single command to measure, with the name its samples are filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Measurement name the runs are recorded under.
    pub name: String,
    /// Command line handed to the executor.
    pub command: String,
}

impl Step {
    /// Parses `NAME=COMMAND`, or derives the name from the program token.
    ///
    /// The split only happens when the text before the first `=` is a plain
    /// name (no whitespace or quotes). A plain name with nothing after the
    /// `=` is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some((name, command)) = raw.split_once('=') {
            let is_plain_name = !name.is_empty()
                && !name.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"');
            if is_plain_name {
                if command.trim().is_empty() {
                    return None;
                }
                return Some(Self {
                    name: name.to_string(),
                    command: command.trim().to_string(),
                });
            }
        }

        let program = shlex::split(raw)?.into_iter().next()?;
        Some(Self {
            name: program,
            command: raw.to_string(),
        })
    }
}

/// Runs every step `repeat` times, in order, timing each successful run
/// under the step's name. Failed runs are not recorded.
///
/// Without `keep_going` the first failure is returned immediately. With it,
/// failures are reported as warnings and counted, and the count is returned
/// as an error once every run has been attempted.
pub fn run_steps(
    registry: &Registry,
    steps: &[Step],
    repeat: u32,
    output: OutputMode,
    keep_going: bool,
) -> Result<()> {
    let mut failures = 0usize;

    for step in steps {
        for run in 1..=repeat {
            log::trace!("Running '{}' ({}/{}): {}", step.name, run, repeat, step.command);
            let result = registry
                .try_time(&step.name, || executor::execute_command(&step.command, output))
                .with_context(|| format!("Step '{}' failed on run {}", step.name, run));

            if let Err(e) = result {
                if !keep_going {
                    return Err(e);
                }
                eprintln!("{}: {:#}", "Warning".yellow().bold(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} run(s) failed.", failures));
    }
    Ok(())
}

/// Runs the steps and then writes the statistics report, even when a step
/// failed, so the samples gathered before the failure are not lost.
pub fn run_and_report(
    registry: &Registry,
    steps: &[Step],
    repeat: u32,
    output: OutputMode,
    keep_going: bool,
) -> Result<()> {
    let outcome = run_steps(registry, steps, repeat, output, keep_going);
    registry.print_stats();
    outcome
}
