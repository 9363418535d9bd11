//! `envp edit`: changes a profile's description and variables.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::handlers::commons::{self, HandlerContext},
    models::Env,
};

const EXAMPLE: &str = t!("edit.example");

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("edit.about"))]
struct EditArgs {
    /// Name of the profile to edit.
    name: String,

    /// New description. Left unchanged when omitted.
    #[arg(short, long)]
    desc: Option<String>,

    /// Environment variable to add or update, as `NAME=VALUE`. Repeatable.
    #[arg(short, long = "env", value_name = "NAME=VALUE")]
    env: Vec<String>,
}

/// Handles `envp edit <name> [--desc ..] [-e NAME=VALUE]...`.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let edit_args = EditArgs::try_parse_from(&args)?;
    let name = edit_args.name.trim().to_string();

    let store = ctx.open_store()?;
    let mut config = store.read()?;

    let profile = config
        .profiles
        .find_mut(&name)
        .map_err(|e| commons::with_example(e, EXAMPLE))?;

    if let Some(desc) = edit_args.desc.filter(|d| !d.is_empty()) {
        profile.desc = desc;
    }
    if !edit_args.env.is_empty() {
        profile.env = commons::merge_env_flags(&profile.env, &edit_args.env);
    }
    let expected_env: Vec<Env> = profile.env.clone();

    let expected = format!(t!("edit.verify"), name = name);
    config.commit_verified(&expected, |saved| {
        saved
            .profiles
            .find(&name)
            .is_ok_and(|p| p.env == expected_env)
    })?;

    println!(
        "{} {}",
        t!("common.success").green().bold(),
        format_args!(t!("edit.success"), name = name.cyan())
    );
    Ok(())
}
