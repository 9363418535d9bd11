//! `envp start`: opens an interactive shell under a profile.

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::handlers::commons::{self, HandlerContext},
    system::shell::{LaunchTarget, SessionLauncher},
};

const EXAMPLE: &str = t!("start.example");

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("start.about"))]
struct StartArgs {
    /// Profile of the session. Defaults to the default profile.
    name: Option<String>,

    /// Does not run the profile's init-script.
    #[arg(long)]
    skip_init: bool,
}

/// Handles `envp start [profile] [--skip-init]`.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let start_args = StartArgs::try_parse_from(&args)?;
    let store = ctx.open_store()?;

    SessionLauncher::from_process()
        .skip_init(start_args.skip_init)
        .launch(&store, start_args.name.as_deref(), &LaunchTarget::Shell)
        .map_err(|e| commons::launch_error(e, EXAMPLE))
}
