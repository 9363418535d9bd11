// src/bin/envp.rs

//! The `envp` command line entry point.

use anyhow::Result;
use clap::Parser;
use colored::*;
use envp::{
    cli::{Cli, dispatcher, handlers::commons::HandlerContext, split_command_line},
    system::shell::LaunchError,
};
use std::env;

/// The main entry point of the `envp` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli() {
        // A command that ran and failed already reported its own error;
        // hand its exit code back to the caller unchanged.
        if let Some(code) = e.downcast_ref::<LaunchError>().and_then(LaunchError::exit_code) {
            log::debug!("Child command exited with code {}", code);
            std::process::exit(code);
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let (head, command) = split_command_line(env::args().collect());
    let cli = Cli::parse_from(head);
    log::debug!("CLI args parsed: {:?}", cli);

    let ctx = HandlerContext::new(cli.config);
    dispatcher::dispatch(cli.args, command, &ctx)
}
