//! `envp version`: prints the version.

use anyhow::Result;
use clap::Parser;

use crate::cli::handlers::commons::HandlerContext;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = t!("version.about"))]
struct VersionArgs {}

/// Prints the crate version.
pub fn handle(args: Vec<String>, _ctx: &HandlerContext) -> Result<()> {
    VersionArgs::try_parse_from(&args)?;
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    Ok(())
}
