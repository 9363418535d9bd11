//! `envp list`: prints the profile tree.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons::HandlerContext;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("list.about"))]
struct ListArgs {}

/// Prints every profile name, marking the default one.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    ListArgs::try_parse_from(&args)?;

    let store = ctx.open_store()?;
    let config = store.read()?;

    let names = config.profiles.list_names();
    if names.is_empty() {
        println!("{}", t!("list.empty"));
        return Ok(());
    }

    for name in names {
        if name == config.default {
            println!("{} {}", "*".green().bold(), name.green());
        } else {
            println!("  {}", name);
        }
    }
    Ok(())
}
