// src/system/shell.rs

//! Session preparation and launching.
//!
//! A [`SessionLauncher`] turns a profile selection into a [`PreparedSession`]
//! (resolved environment, init scripts, `ENVP_PROFILE` chain), then either
//! runs one command or an interactive shell framed by start and end banners.

use crate::{
    constants::{FALLBACK_SHELL, PROFILE_CHAIN_SEPARATOR, PROFILE_ENV_VAR},
    core::{env_resolver::EnvResolver, profile_tree::ProfileError},
    models::Env,
    state::{ProfileStore, StoreError},
    system::executor::{self, EnvMap, ExecutionError},
};
use colored::Colorize;
use std::io::{self, Write};
use thiserror::Error;

/// Why a session could not be launched, or how its command failed.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The profile could not be selected.
    #[error(transparent)]
    Profile(#[from] ProfileError),
    /// An init script failed; the target was not started.
    #[error("init-script error: {0}")]
    InitScript(#[source] ExecutionError),
    /// The target could not run or exited non-zero.
    #[error(transparent)]
    Exec(#[from] ExecutionError),
    /// The profile store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LaunchError {
    /// The exit code of the main command, when it ran and failed.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exec(e) => e.exit_code(),
            _ => None,
        }
    }
}

/// What a session hands the terminal to once the profile is prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Run this argv, looked up in the composed `PATH`.
    Command(Vec<String>),
    /// Start the user's interactive shell.
    Shell,
}

/// A profile that is ready to run: its name and the final child environment.
#[derive(Debug, Clone)]
pub struct PreparedSession {
    /// Fully qualified profile name.
    pub name: String,
    /// Exact environment of the child.
    pub env: EnvMap,
    /// Init scripts to run before the target, in order.
    pub init_scripts: Vec<String>,
}

/// Runs commands and shells under a profile.
///
/// The launch goes through these stages in order, stopping at the first
/// failure:
/// 1. Look up the profile (explicit name, or the store's default).
/// 2. Resolve its env values. Resolution errors are reported as a warning
///    and the launch carries on with the values that did resolve.
/// 3. Compose the environment: base env, then the profile's env, then
///    `ENVP_PROFILE` extended with this profile's name.
/// 4. Run the init scripts through `sh -c`, unless skipped.
/// 5. Run the target with inherited stdio.
#[derive(Debug, Clone)]
pub struct SessionLauncher {
    resolver: EnvResolver,
    skip_init: bool,
}

impl SessionLauncher {
    /// A launcher resolving values with `resolver`. Init scripts run by default.
    pub fn new(resolver: EnvResolver) -> Self {
        Self {
            resolver,
            skip_init: false,
        }
    }

    /// A launcher over the process environment and the current user's home.
    pub fn from_process() -> Self {
        Self::new(EnvResolver::from_process())
    }

    /// Skips the init scripts of the profile. Env resolution still runs.
    pub fn skip_init(mut self, skip: bool) -> Self {
        self.skip_init = skip;
        self
    }

    /// Reads the profile from `store` and runs `target` under it.
    ///
    /// The store's lock is released before any child process starts.
    pub fn launch(
        &self,
        store: &ProfileStore,
        name: Option<&str>,
        target: &LaunchTarget,
    ) -> Result<(), LaunchError> {
        let session = {
            let config = store.read()?;
            let resolved = config.current_profile(name)?;
            self.prepare(
                resolved.name,
                &resolved.profile.env,
                resolved.profile.init_scripts(),
            )
        };
        self.run(&session, target)
    }

    /// Resolves `envs` and composes the child environment for profile `name`.
    pub fn prepare(&self, name: &str, envs: &[Env], init_scripts: Vec<&str>) -> PreparedSession {
        let mut envs = envs.to_vec();
        if let Err(e) = self.resolver.resolve(&mut envs) {
            eprintln!("{}", e.to_string().yellow());
        }

        let base_env = self.resolver.base_env();
        let chain = session_chain(base_env.get(PROFILE_ENV_VAR).map(String::as_str), name);

        let mut env = base_env.clone();
        env.extend(envs.into_iter().map(|e| (e.name, e.value)));
        env.insert(PROFILE_ENV_VAR.to_string(), chain);

        PreparedSession {
            name: name.to_string(),
            env,
            init_scripts: init_scripts.into_iter().map(str::to_string).collect(),
        }
    }

    /// Runs the init scripts of `session`, then `target`.
    pub fn run(&self, session: &PreparedSession, target: &LaunchTarget) -> Result<(), LaunchError> {
        if let LaunchTarget::Command(argv) = target {
            let program = argv.first().ok_or(ExecutionError::EmptyCommand)?;
            let path_var = session.env.get("PATH").map(String::as_str);
            if executor::look_path(program, path_var).is_none() {
                return Err(ExecutionError::CommandNotFound(program.clone()).into());
            }
        }

        if self.skip_init {
            log::debug!("Skipping init scripts of '{}'", session.name);
        } else {
            for script in &session.init_scripts {
                executor::run_shell_script(script, &session.env).map_err(LaunchError::InitScript)?;
            }
        }

        match target {
            LaunchTarget::Command(argv) => Ok(executor::execute_command(argv, &session.env)?),
            LaunchTarget::Shell => start_shell(session),
        }
    }
}

/// The value of `ENVP_PROFILE` for a session of `name` started from an
/// environment where it was `inherited`.
pub fn session_chain(inherited: Option<&str>, name: &str) -> String {
    match inherited.map(str::trim).filter(|chain| !chain.is_empty()) {
        Some(chain) => format!("{}{}{}", chain, PROFILE_CHAIN_SEPARATOR, name),
        None => name.to_string(),
    }
}

/// The interactive shell of a session: `$SHELL` from its environment, or
/// `/bin/sh` when it is unset or blank.
pub fn interactive_shell(env: &EnvMap) -> String {
    env.get("SHELL")
        .map(|shell| shell.trim())
        .filter(|shell| !shell.is_empty())
        .map_or_else(|| FALLBACK_SHELL.to_string(), str::to_string)
}

fn start_shell(session: &PreparedSession) -> Result<(), LaunchError> {
    run_shell_session(session, &mut io::stdout())
}

/// Runs `$SHELL -c $SHELL` between the start and end banners, written to
/// `out`. The end banner is written whatever the shell's outcome.
fn run_shell_session<W: Write>(session: &PreparedSession, out: &mut W) -> Result<(), LaunchError> {
    let shell = interactive_shell(&session.env);

    let mut out = scopeguard::guard(out, |out| {
        let _ = writeln!(out, "{} {}", t!("session.banner.end").green(), session.name.red());
    });
    let _ = writeln!(out, "{} {}", t!("session.banner.start").green(), session.name.red());
    let _ = writeln!(out, "{}", t!("session.banner.hint"));
    let _ = out.flush();

    log::debug!("Starting interactive shell '{}'", shell);
    let argv = vec![shell.clone(), "-c".to_string(), shell];
    Ok(executor::execute_command(&argv, &session.env)?)
}
