//! `envp delete`: removes a profile, asking first unless `--yes`.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons::{self, HandlerContext};

const EXAMPLE: &str = t!("delete.example");

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("delete.about"))]
struct DeleteArgs {
    /// Profile to delete. Defaults to the default profile.
    name: Option<String>,

    /// Deletes without asking for confirmation.
    #[arg(short = 'y', long = "yes")]
    yes: bool,
}

/// Handles `envp delete <name> [--yes]`.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let delete_args = DeleteArgs::try_parse_from(&args)?;

    let store = ctx.open_store()?;
    let mut config = store.read()?;

    let (name, is_default, has_children) = {
        let resolved = config
            .current_profile(delete_args.name.as_deref())
            .map_err(|e| commons::with_example(e, EXAMPLE))?;
        (
            resolved.name.to_string(),
            resolved.is_default,
            !resolved.profile.children.is_empty(),
        )
    };

    if is_default {
        println!("{}", format!(t!("delete.warning.default"), name = name).yellow());
    }
    if has_children {
        println!("{}", format!(t!("delete.warning.children"), name = name).yellow());
    }

    if !delete_args.yes {
        let prompt = format!(t!("delete.prompt.confirm"), name = name.red());
        if !commons::confirm(&prompt)? {
            println!("{}", t!("common.info.operation_cancelled"));
            return Ok(());
        }
    }

    let default_cleared = config.delete_profile(&name)?;
    let expected = format!(t!("delete.verify"), name = name);
    config.commit_verified(&expected, |saved| saved.profiles.find(&name).is_err())?;

    println!(
        "{} {}",
        t!("common.success").green().bold(),
        format_args!(t!("delete.success"), name = name.cyan())
    );
    if default_cleared {
        println!("{}", t!("delete.info.default_cleared").yellow());
    }
    Ok(())
}
