// src/cli/handlers/commons.rs

//! Shared functions used by multiple handlers.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::collections::BTreeMap;

use crate::{
    core::profile_tree::ProfileError,
    models::Env,
    state::ProfileStore,
    system::shell::LaunchError,
};

/// What every handler gets besides its own arguments.
#[derive(Debug, Clone, Default)]
pub struct HandlerContext {
    /// Explicit profile store location (`--config` / `ENVP_CONFIG`).
    pub config_path: Option<String>,
}

impl HandlerContext {
    /// A context using the store at `config_path`, or the default one.
    pub fn new(config_path: Option<String>) -> Self {
        Self { config_path }
    }

    /// Opens the profile store, creating it on first use.
    pub fn open_store(&self) -> Result<ProfileStore> {
        let store = match self.config_path.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(path) => ProfileStore::open(path),
            None => ProfileStore::open_default(),
        };
        store.context(t!("error.store_open"))
    }
}

/// Prints a command's usage example.
pub fn print_example(example: &str) {
    println!("{}", t!("common.example_header"));
    println!("{}", example);
}

/// Converts a profile lookup error, reprinting `example` first when the
/// error comes from how the profile was selected.
pub fn with_example(err: ProfileError, example: &str) -> anyhow::Error {
    if err.is_selection_error() {
        print_example(example);
    }
    err.into()
}

/// Same as [`with_example`] for launch errors.
pub fn launch_error(err: LaunchError, example: &str) -> anyhow::Error {
    if let LaunchError::Profile(profile_err) = &err {
        if profile_err.is_selection_error() {
            print_example(example);
        }
    }
    err.into()
}

/// Parses `NAME=VALUE` flags into envs sorted by name.
///
/// The value may itself contain `=`. Items without `=` or with an empty name
/// are skipped with a warning. A name given twice keeps its last value.
pub fn parse_env_flags(flags: &[String]) -> Vec<Env> {
    merge_env_flags(&[], flags)
}

/// Overlays `NAME=VALUE` flags on `current`, the flags winning. The result
/// is sorted by name.
pub fn merge_env_flags(current: &[Env], flags: &[String]) -> Vec<Env> {
    let mut merged: BTreeMap<String, String> = current
        .iter()
        .map(|e| (e.name.clone(), e.value.clone()))
        .collect();

    for flag in flags {
        match flag.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                merged.insert(name.trim().to_string(), value.to_string());
            }
            _ => {
                eprintln!("{}", format!(t!("common.warning.malformed_env"), item = flag).yellow());
            }
        }
    }

    merged.into_iter().map(|(name, value)| Env::new(name, value)).collect()
}

/// Asks a y/N question. Defaults to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_env_flags_sorts_and_skips_malformed() {
        let envs = parse_env_flags(&flags(&[
            "NO_PROXY=127.0.0.1,localhost",
            "broken",
            "=nameless",
            "DOCKER_HOST=ssh://myuser@some-server",
            "EQUATION=a=b",
        ]));
        assert_eq!(
            envs,
            vec![
                Env::new("DOCKER_HOST", "ssh://myuser@some-server"),
                Env::new("EQUATION", "a=b"),
                Env::new("NO_PROXY", "127.0.0.1,localhost"),
            ]
        );
    }

    #[test]
    fn test_merge_env_flags_flag_wins() {
        let current = vec![Env::new("Z_VAR", "z"), Env::new("A_VAR", "old")];
        let merged = merge_env_flags(&current, &flags(&["A_VAR=new", "M_VAR=m"]));
        assert_eq!(
            merged,
            vec![Env::new("A_VAR", "new"), Env::new("M_VAR", "m"), Env::new("Z_VAR", "z")]
        );
    }

    #[test]
    fn test_with_example_keeps_the_error() {
        let err = with_example(ProfileError::ProfileNotExisting("x".into()), "envp show x");
        assert_eq!(
            err.downcast_ref::<ProfileError>(),
            Some(&ProfileError::ProfileNotExisting("x".into()))
        );
    }
}
