// src/bin/perfmeter.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use perfmeter::{
    ProfilerConfig, Registry,
    cli::{Cli, Step, run_and_report},
    constants::CONFIG_FILENAME,
    system::executor::OutputMode,
};
use std::path::Path;

/// The main entry point of the `perfmeter` application.
/// It parses arguments, runs every step and prints the report.
fn main() {
    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Resolves configuration, runs the steps and prints the report.
fn run_cli(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    init_logging(&config);
    log::debug!("Effective profiler config: {:?}", config);
    let registry = Registry::from_config(&config);

    let steps = cli
        .steps
        .iter()
        .map(|raw| Step::parse(raw).ok_or_else(|| anyhow!("Invalid step '{}'.", raw.cyan())))
        .collect::<Result<Vec<_>>>()?;

    let output = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Inherit
    };

    run_and_report(&registry, &steps, cli.repeat, output, cli.keep_going)
}

fn load_config(cli: &Cli) -> Result<ProfilerConfig> {
    let mut config = match &cli.config {
        Some(path) => ProfilerConfig::load(path)?,
        None if Path::new(CONFIG_FILENAME).is_file() => {
            ProfilerConfig::load(Path::new(CONFIG_FILENAME))?
        }
        None => ProfilerConfig::default(),
    };
    config.apply_env()?;
    if cli.verbose {
        config.verbose = true;
    }
    Ok(config)
}

/// Installs `env_logger`. The report is written through `log`, so unless
/// `RUST_LOG` says otherwise the configured target is enabled at the
/// configured level and everything else at `warn`.
fn init_logging(config: &ProfilerConfig) {
    let level = log::Level::from(config.log_level).as_str().to_ascii_lowercase();
    let default_filter = format!("warn,{}={}", config.log_target, level);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let report_level = log::Level::from(config.log_level);
    if !log::log_enabled!(target: config.log_target.as_str(), report_level) {
        eprintln!(
            "{}: RUST_LOG hides '{}' at level {}; the report will not be shown.",
            "Warning".yellow().bold(),
            config.log_target,
            report_level
        );
    }
}
