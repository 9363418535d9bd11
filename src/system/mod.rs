//! # System Interaction Layer
//!
//! The boundary between profile logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns child processes with a fully composed environment,
//!   either as a direct command, through `sh -c`, or capturing stdout for
//!   command substitution.
//! - **`shell`**: Launches a profile session (`envp start`, `envp -- cmd`):
//!   resolves the profile's env, runs its init scripts and hands the terminal
//!   to the command or the user's shell.

pub mod executor;
pub mod shell;
