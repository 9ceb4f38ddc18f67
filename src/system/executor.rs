// src/system/executor.rs

use std::io::ErrorKind;
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' exited with a non-zero status ({status}).")]
    NonZeroExitStatus { command: String, status: ExitStatus },
}

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Stream straight to the user's terminal.
    #[default]
    Inherit,
    /// Discard stdout and stderr so only the timing report is visible.
    Quiet,
}

impl OutputMode {
    fn stdio(self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::Quiet => Stdio::null(),
        }
    }
}

/// Splits a command line into program and arguments, shell style.
pub fn split_command(command_line: &str) -> Result<Vec<String>, ExecutionError> {
    let trimmed = command_line.trim();
    if trimmed.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    let parts =
        shlex::split(trimmed).ok_or_else(|| ExecutionError::CommandParse(trimmed.to_string()))?;
    if parts.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    Ok(parts)
}

/// Runs a command line to completion in the current directory.
///
/// Blocks until the child exits. A non-zero exit is an error.
pub fn execute_command(command_line: &str, output: OutputMode) -> Result<(), ExecutionError> {
    let parts = split_command(command_line)?;
    let Some((program, args)) = parts.split_first() else {
        return Err(ExecutionError::EmptyCommand);
    };
    let display_line = command_line.trim().to_string();

    let mut command = StdCommand::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(output.stdio())
        .stderr(output.stdio());

    // Fallback logic for Windows built-in commands like `echo`.
    // We try to spawn directly first. If it fails with `NotFound`, we try with `cmd /C`.
    let status = match command.status() {
        Ok(status) => status,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(&display_line)
                .stdin(Stdio::null())
                .stdout(output.stdio())
                .stderr(output.stdio())
                .status()
                .map_err(|e| ExecutionError::CommandFailed(display_line.clone(), e))?
        }
        Err(e) => return Err(ExecutionError::CommandFailed(display_line, e)),
    };

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            command: display_line,
            status,
        });
    }
    Ok(())
}
