//! # envp
//!
//! Named, nested environment-variable profiles persisted in a single YAML
//! file, and a launcher that runs a command or an interactive shell under a
//! fully resolved profile environment.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod state;
pub mod system;
