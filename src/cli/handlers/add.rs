//! `envp add`: creates a profile from `NAME=VALUE` flags.

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

use crate::{
    cli::handlers::commons::{self, HandlerContext},
    core::profile_tree::ProfileError,
    models::Profile,
};

const EXAMPLE: &str = t!("add.example");

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("add.about"))]
struct AddArgs {
    /// Name of the new profile. Use dots for nested profiles (`lab.cluster1`).
    name: String,

    /// Description of the profile.
    #[arg(short, long, default_value = "")]
    desc: String,

    /// Environment variable of the profile, as `NAME=VALUE`. Repeatable.
    #[arg(short, long = "env", value_name = "NAME=VALUE")]
    env: Vec<String>,
}

/// Handles `envp add <name> [--desc ..] [-e NAME=VALUE]...`.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let add_args = AddArgs::try_parse_from(&args)?;
    let name = add_args.name.trim().to_string();

    let store = ctx.open_store()?;
    let mut config = store.read()?;

    match config.profiles.find(&name) {
        Ok(_) => return Err(anyhow!(t!("add.error.exists"), name = name)),
        Err(ProfileError::ProfileNotExisting(_) | ProfileError::ParentNotExisting(_)) => {}
        Err(e) => return Err(commons::with_example(e, EXAMPLE)),
    }

    let envs = commons::parse_env_flags(&add_args.env);
    config
        .set_profile(&name, Profile::new(add_args.desc, envs))
        .map_err(|e| commons::with_example(e, EXAMPLE))?;

    let became_default = config.default.is_empty();
    if became_default {
        config.default = name.clone();
    }

    let expected = format!(t!("add.verify"), name = name);
    config.commit_verified(&expected, |saved| saved.profiles.find(&name).is_ok())?;

    println!(
        "{} {}",
        t!("common.success").green().bold(),
        format_args!(t!("add.success"), name = name.cyan())
    );
    if became_default {
        println!("{}", format!(t!("add.info.default_set"), name = name).dimmed());
    }
    Ok(())
}
