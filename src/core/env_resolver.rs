//! # Env Resolver
//!
//! Turns the raw env list of a profile into final values. Entries are
//! resolved in list order, so a value may refer to any sibling defined above
//! it. Each value goes through exactly one of:
//!
//! - **Command substitution** (`$(...)`): the fragment runs through `sh -c`
//!   with the base environment plus the siblings resolved so far, and its
//!   stdout (trailing newlines trimmed) becomes the value.
//! - **Interpolation**: `$VAR` / `${VAR}` references are expanded against the
//!   resolved siblings first, then the base environment. Unknown variables
//!   expand to an empty string, as in a shell.
//!
//! A leading `~` or `$HOME` is replaced with the home directory before
//! either step. A failed substitution keeps the original value and is
//! reported; resolution carries on with the remaining entries.

use crate::{
    core::paths,
    models::Env,
    system::executor::{self, EnvMap},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{env, fmt, path::PathBuf};

lazy_static! {
    static ref COMMAND_SUBSTITUTION: Regex =
        Regex::new(r"(?s)^\$\((.*)\)").expect("command substitution pattern is valid");
}

/// A single env entry that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableError {
    /// Variable name.
    pub name: String,
    /// Why its value could not be resolved.
    pub reason: String,
}

impl fmt::Display for VariableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error parsing value of {}: {}", self.name, self.reason)
    }
}

/// All the per-variable failures of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvResolveError {
    /// One entry per failed variable, in list order.
    pub errors: Vec<VariableError>,
}

impl EnvResolveError {
    /// Names of the variables that failed, in list order.
    pub fn names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.name.as_str()).collect()
    }
}

impl fmt::Display for EnvResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

impl std::error::Error for EnvResolveError {}

/// Resolves profile env values against a home directory and a base
/// environment. It holds no state between calls.
#[derive(Debug, Clone)]
pub struct EnvResolver {
    home: Option<PathBuf>,
    base_env: EnvMap,
}

impl EnvResolver {
    /// `home` expands `~`; `base_env` feeds interpolation and substitutions.
    pub fn new(home: Option<PathBuf>, base_env: EnvMap) -> Self {
        Self { home, base_env }
    }

    /// A resolver over the current user's home and the process environment.
    pub fn from_process() -> Self {
        Self::new(paths::home_dir().ok(), env::vars().collect())
    }

    /// The base environment substitutions and interpolation read from.
    pub fn base_env(&self) -> &EnvMap {
        &self.base_env
    }

    /// Resolves every value of `envs` in place.
    ///
    /// On failure the offending entries keep their original value and the
    /// returned error lists all of them.
    pub fn resolve(&self, envs: &mut [Env]) -> Result<(), EnvResolveError> {
        let mut errors = Vec::new();

        for index in 0..envs.len() {
            let (resolved, pending) = envs.split_at_mut(index);
            let Some((current, _)) = pending.split_first_mut() else {
                break;
            };

            match self.resolve_value(&current.value, resolved) {
                Ok(value) => current.value = value,
                Err(reason) => {
                    log::debug!("Could not resolve '{}': {}", current.name, reason);
                    errors.push(VariableError {
                        name: current.name.clone(),
                        reason,
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EnvResolveError { errors })
        }
    }

    fn resolve_value(&self, raw: &str, resolved: &[Env]) -> Result<String, String> {
        let value = match &self.home {
            Some(home) => paths::expand_home(raw, home),
            None => raw.to_string(),
        };

        if let Some(captures) = COMMAND_SUBSTITUTION.captures(&value) {
            let script = captures.get(1).map_or("", |m| m.as_str());
            let remainder = captures
                .get(0)
                .and_then(|m| value.get(m.end()..))
                .unwrap_or_default();
            let output = self.substitute_command(script, resolved)?;
            if output.is_empty() && !raw.is_empty() {
                return Err("command produced no output".to_string());
            }
            return Ok(format!("{}{}", output, remainder));
        }

        let expanded = shellexpand::env_with_context_no_errors(&value, |name: &str| {
            Some(
                lookup(resolved, name)
                    .or_else(|| self.base_env.get(name).map(String::as_str))
                    .unwrap_or_default()
                    .to_string(),
            )
        });
        Ok(expanded.into_owned())
    }

    fn substitute_command(&self, script: &str, resolved: &[Env]) -> Result<String, String> {
        let mut env_vars = self.base_env.clone();
        env_vars.extend(resolved.iter().map(|e| (e.name.clone(), e.value.clone())));

        let output = executor::execute_and_capture_output(script, &env_vars)
            .map_err(|e| format!("error executing script: {}", e))?;
        Ok(output.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// The latest definition of `name` among already-resolved siblings.
fn lookup<'a>(resolved: &'a [Env], name: &str) -> Option<&'a str> {
    resolved
        .iter()
        .rev()
        .find(|e| e.name == name)
        .map(|e| e.value.as_str())
}
