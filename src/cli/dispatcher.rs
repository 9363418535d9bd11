//! Command registry and routing of the parsed command line.

use anyhow::{Result, anyhow};
use clap::CommandFactory;

use crate::cli::{
    Cli,
    handlers::{self, commons::{self, HandlerContext}},
};

// --- Command Definition and Registry ---

/// Defines a system command, its aliases, and its handler.
pub struct CommandDefinition {
    /// Primary name, as typed on the command line.
    pub name: &'static str,
    /// Alternative names.
    pub aliases: &'static [&'static str],
    /// One-line description shown in the help.
    pub about: &'static str,
    handler: fn(Vec<String>, &HandlerContext) -> Result<()>,
}

impl std::fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// The single source of truth for all system commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "add",
        aliases: &[],
        about: t!("add.about"),
        handler: handlers::add::handle,
    },
    CommandDefinition {
        name: "completion",
        aliases: &[],
        about: t!("completion.about"),
        handler: handlers::completion::handle,
    },
    CommandDefinition {
        name: "delete",
        aliases: &["del"],
        about: t!("delete.about"),
        handler: handlers::delete::handle,
    },
    CommandDefinition {
        name: "edit",
        aliases: &[],
        about: t!("edit.about"),
        handler: handlers::edit::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        about: t!("list.about"),
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        about: t!("run.about"),
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &[],
        about: t!("show.about"),
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "start",
        aliases: &[],
        about: t!("start.about"),
        handler: handlers::start::handle,
    },
    CommandDefinition {
        name: "use",
        aliases: &[],
        about: t!("use.about"),
        handler: handlers::use_profile::handle,
    },
    CommandDefinition {
        name: "version",
        aliases: &[],
        about: t!("version.about"),
        handler: handlers::version::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// All registered commands, in registry order.
pub fn commands() -> &'static [CommandDefinition] {
    COMMAND_REGISTRY
}

/// Routes a parsed command line to its handler.
///
/// `args` is everything clap collected before the first `--`, `command`
/// everything after it:
/// 1. `envp <command> [args...] [-- cmd...]` runs a registered command.
/// 2. `envp [profile] -- cmd...` runs `cmd` under the profile (or the default).
/// 3. `envp` alone prints the help.
/// 4. Anything else is an error: a command to run must follow `--`.
pub fn dispatch(args: Vec<String>, command: Option<Vec<String>>, ctx: &HandlerContext) -> Result<()> {
    log::debug!("Dispatching args: {:?}, command: {:?}", args, command);

    let registered = args.first().and_then(|first| find_command(first));
    let (command_def, mut handler_args) = match registered {
        // Rule 1: a registered command.
        Some(def) => (Some(def), args.into_iter().skip(1).collect::<Vec<_>>()),
        // Rule 2: `[profile] -- cmd...` is a shortcut for `run`.
        None if command.is_some() => (find_command("run"), args),
        // Rule 3: nothing at all.
        None if args.is_empty() => {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
        // Rule 4: a profile name without a command.
        None => {
            commons::print_example(t!("run.example"));
            return Err(anyhow!(t!("cli.error.command_after_dash")));
        }
    };

    if let Some(command) = command {
        handler_args.push("--".to_string());
        handler_args.extend(command);
    }

    let command_def = command_def.ok_or_else(|| anyhow!(t!("cli.error.unknown_command")))?;
    log::debug!("Running '{}' with {:?}", command_def.name, handler_args);
    (command_def.handler)(handler_args, ctx)
}
