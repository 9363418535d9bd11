// src/system/executor.rs

//! Child process spawning with an explicit, complete environment.

use crate::constants::SYSTEM_SHELL;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

/// A fully composed child-process environment. Children get exactly this
/// environment and nothing inherited on the side.
pub type EnvMap = BTreeMap<String, String>;

/// Failures of spawning or running a child process.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The argv was empty.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The program is not in the child's `PATH`.
    #[error("Command '{0}' not found in PATH.")]
    CommandNotFound(String),
    /// Spawning or waiting failed at the OS level.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// The child ran and exited unsuccessfully.
    #[error("Command '{command}' exited with {}.", describe_exit(.code))]
    NonZeroExitStatus {
        /// Program that was run.
        command: String,
        /// Exit code, or `None` when killed by a signal.
        code: Option<i32>,
    },
    /// Captured stdout was not UTF-8.
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        /// Program that was run.
        command: String,
        /// Decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl ExecutionError {
    /// The exit code of a child that ran and failed, if there is one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExitStatus { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by a signal)".to_string(),
    }
}

fn check_status(command: &str, status: ExitStatus) -> Result<(), ExecutionError> {
    if status.success() {
        Ok(())
    } else {
        Err(ExecutionError::NonZeroExitStatus {
            command: command.to_string(),
            code: status.code(),
        })
    }
}

/// Looks up `program` the way a shell does: names containing a `/` are used
/// as-is, anything else is searched in each directory of `path_var`.
pub fn look_path(program: &str, path_var: Option<&str>) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    if program.contains('/') {
        let candidate = PathBuf::from(program);
        return is_executable(&candidate).then_some(candidate);
    }
    let path_var = path_var?;
    env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Runs `argv` with inherited stdio and exactly `env_vars` as environment.
/// Blocks until the child exits.
pub fn execute_command(argv: &[String], env_vars: &EnvMap) -> Result<(), ExecutionError> {
    let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;
    let binary = look_path(program, env_vars.get("PATH").map(String::as_str))
        .ok_or_else(|| ExecutionError::CommandNotFound(program.clone()))?;

    log::debug!("Executing '{}' ({})", program, binary.display());
    let status = StdCommand::new(&binary)
        .args(args)
        .env_clear()
        .envs(env_vars)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ExecutionError::CommandFailed(program.clone(), e))?;

    check_status(program, status)
}

/// Runs a script through `sh -c` with inherited stdio.
pub fn run_shell_script(script: &str, env_vars: &EnvMap) -> Result<(), ExecutionError> {
    let trimmed = script.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    log::debug!("Running shell script: {}", trimmed);
    let status = StdCommand::new(SYSTEM_SHELL)
        .arg("-c")
        .arg(trimmed)
        .env_clear()
        .envs(env_vars)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ExecutionError::CommandFailed(trimmed.to_string(), e))?;

    check_status(trimmed, status)
}

/// Runs a script through `sh -c` and captures its standard output.
/// Stderr is passed through to the user's terminal.
pub fn execute_and_capture_output(
    script: &str,
    env_vars: &EnvMap,
) -> Result<String, ExecutionError> {
    let trimmed = script.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let output = StdCommand::new(SYSTEM_SHELL)
        .arg("-c")
        .arg(trimmed)
        .env_clear()
        .envs(env_vars)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| ExecutionError::CommandFailed(trimmed.to_string(), e))?;

    check_status(trimmed, output.status)?;

    String::from_utf8(output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
        command: trimmed.to_string(),
        source: e,
    })
}
