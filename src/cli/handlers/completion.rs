//! `envp completion`: prints a shell completion script.

use anyhow::Result;
use clap::{Arg, Command, Parser};
use clap_complete::Shell;
use std::io;

use crate::cli::{dispatcher, handlers::commons::HandlerContext};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = t!("completion.about"))]
struct CompletionArgs {
    /// Shell to generate the completion script for.
    #[arg(value_enum)]
    shell: Shell,
}

/// Writes the completion script for the requested shell to stdout.
pub fn handle(args: Vec<String>, _ctx: &HandlerContext) -> Result<()> {
    let completion_args = CompletionArgs::try_parse_from(&args)?;
    let mut command = completion_command();
    clap_complete::generate(completion_args.shell, &mut command, "envp", &mut io::stdout());
    Ok(())
}

/// A clap command mirroring the registry, used only to drive completion.
fn completion_command() -> Command {
    let root = Command::new("envp").arg(
        Arg::new("config")
            .long("config")
            .value_name("PATH")
            .global(true),
    );
    dispatcher::commands().iter().fold(root, |root, def| {
        root.subcommand(
            Command::new(def.name)
                .about(def.about)
                .visible_aliases(def.aliases.iter().copied()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_script_lists_commands() {
        let mut command = completion_command();
        let mut buffer = Vec::new();
        clap_complete::generate(Shell::Bash, &mut command, "envp", &mut buffer);
        let script = String::from_utf8(buffer).unwrap();
        assert!(script.contains("envp"));
        assert!(script.contains("start"));
        assert!(script.contains("delete"));
    }
}
