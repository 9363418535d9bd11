// src/constants.rs

//! Names and defaults shared across the crate.

/// The name of the directory holding the profile store (inside `~/.config`).
pub const CONFIG_DIR_NAME: &str = "envp";

/// The name of the default profile store file.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Environment variable that overrides the profile store location.
pub const CONFIG_ENV_VAR: &str = "ENVP_CONFIG";

/// Environment variable carrying the chain of profiles of nested sessions.
pub const PROFILE_ENV_VAR: &str = "ENVP_PROFILE";

/// Separator between profile names in the session chain.
pub const PROFILE_CHAIN_SEPARATOR: &str = " > ";

/// Delimiter of nested profile paths (`group.subgroup.profile`).
pub const PROFILE_PATH_DELIMITER: char = '.';

/// Keys of a profile node that cannot be used as child profile names.
pub const RESERVED_PROFILE_KEYS: &[&str] = &["desc", "env", "init-script"];

/// Shell used for command substitution and init-scripts.
pub const SYSTEM_SHELL: &str = "sh";

/// Interactive shell used when `$SHELL` is not set.
pub const FALLBACK_SHELL: &str = "/bin/sh";
