// src/core/mod.rs

//! Profile tree operations, environment resolution and path handling.

pub mod env_resolver;
pub mod paths;
pub mod profile_tree;
