//! `envp run`: runs one command under a profile.

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::handlers::commons::{self, HandlerContext},
    system::shell::{LaunchTarget, SessionLauncher},
};

const EXAMPLE: &str = t!("run.example");

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("run.about"))]
struct RunArgs {
    /// Profile to run the command with. Defaults to the default profile.
    profile: Option<String>,

    /// Does not run the profile's init-script.
    #[arg(long)]
    skip_init: bool,

    /// The command to run, after `--`.
    #[arg(last = true, required = true, value_name = "COMMAND")]
    command: Vec<String>,
}

/// Handles `envp run [profile] -- cmd [args...]`.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let store = ctx.open_store()?;

    SessionLauncher::from_process()
        .skip_init(run_args.skip_init)
        .launch(
            &store,
            run_args.profile.as_deref(),
            &LaunchTarget::Command(run_args.command),
        )
        .map_err(|e| commons::launch_error(e, EXAMPLE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_args_split_profile_and_command() {
        let parsed = RunArgs::try_parse_from(argv(&["lab.cluster1", "--", "kubectl", "get", "-A"])).unwrap();
        assert_eq!(parsed.profile.as_deref(), Some("lab.cluster1"));
        assert_eq!(parsed.command, argv(&["kubectl", "get", "-A"]));
        assert!(!parsed.skip_init);

        let parsed = RunArgs::try_parse_from(argv(&["--skip-init", "--", "env"])).unwrap();
        assert_eq!(parsed.profile, None);
        assert!(parsed.skip_init);
    }

    #[test]
    fn test_run_args_require_a_command() {
        assert!(RunArgs::try_parse_from(argv(&["lab.cluster1"])).is_err());
    }
}
