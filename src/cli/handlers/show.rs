//! `envp show`: prints a profile's variables.

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::cli::handlers::commons::{self, HandlerContext};

const EXAMPLE: &str = t!("show.example");

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("show.about"))]
struct ShowArgs {
    /// Profile to show. Defaults to the default profile.
    name: Option<String>,

    /// Prints `export` statements that can be passed to `eval`.
    #[arg(short, long)]
    export: bool,
}

/// Handles `envp show [profile] [--export]`.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;

    let store = ctx.open_store()?;
    let config = store.read()?;
    let resolved = config
        .current_profile(show_args.name.as_deref())
        .map_err(|e| commons::with_example(e, EXAMPLE))?;

    if show_args.export {
        println!("{}", t!("show.export_header"));
        for env in &resolved.profile.env {
            let value = shlex::try_quote(&env.value)
                .map_err(|_| anyhow!(t!("show.error.unquotable"), name = env.name))?;
            println!("export {}={}", env.name, value);
        }
        return Ok(());
    }

    for env in &resolved.profile.env {
        println!("{}", env);
    }
    Ok(())
}
