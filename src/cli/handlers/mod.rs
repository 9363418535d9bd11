// src/cli/handlers/mod.rs

//! One module per CLI command; see the registry in `cli::dispatcher`.

pub mod add;
pub mod commons;
pub mod completion;
pub mod delete;
pub mod edit;
pub mod list;
pub mod run;
pub mod show;
pub mod start;
pub mod use_profile;
pub mod version;
