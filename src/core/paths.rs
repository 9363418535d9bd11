// src/core/paths.rs

//! Locating the profile file and expanding `~` / `$HOME` in user paths.

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILENAME};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefixes that stand for the user's home directory.
const HOME_PREFIXES: &[&str] = &["~", "$HOME", "${HOME}"];

/// Failures of locating or creating the profile file.
#[derive(Error, Debug)]
pub enum PathError {
    /// `dirs` found no home directory.
    #[error("Could not find the home directory of the current user.")]
    HomeDirNotFound,
    /// The path has no file name component.
    #[error("Config file path '{0}' does not name a file.")]
    InvalidFilePath(String),
    /// The parent directory could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// Directory that was being created.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns the home directory of the current user.
pub fn home_dir() -> Result<PathBuf, PathError> {
    dirs::home_dir().ok_or(PathError::HomeDirNotFound)
}

/// Replaces a leading `~`, `$HOME` or `${HOME}` with `home`.
///
/// The prefix only counts when it is the whole value or is followed by a
/// path separator, so `~user` and `$HOMEBREW` are left alone.
pub fn expand_home(value: &str, home: &Path) -> String {
    for prefix in HOME_PREFIXES {
        if let Some(rest) = value.strip_prefix(prefix) {
            if rest.is_empty() || rest.starts_with('/') {
                return format!("{}{}", home.display(), rest);
            }
        }
    }
    value.to_string()
}

/// Returns the default location of the profile store (`~/.config/envp/config.yaml`).
pub fn default_config_file() -> Result<PathBuf, PathError> {
    Ok(home_dir()?
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILENAME))
}

/// Expands the home directory in `path` and makes sure its parent directory
/// exists, creating it if needed. Returns the expanded file path.
pub fn ensure_config_file_path(path: &str) -> Result<PathBuf, PathError> {
    ensure_config_file_path_in(path, home_dir().ok().as_deref())
}

/// Same as [`ensure_config_file_path`] with an explicit home directory.
/// Without one, home prefixes are kept as written.
pub fn ensure_config_file_path_in(path: &str, home: Option<&Path>) -> Result<PathBuf, PathError> {
    let path = path.trim();
    let expanded = PathBuf::from(match home {
        Some(home) => expand_home(path, home),
        None => path.to_string(),
    });
    let file_name = expanded
        .file_name()
        .ok_or_else(|| PathError::InvalidFilePath(path.to_string()))?
        .to_owned();

    let dir = match expanded.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !dir.exists() {
        log::debug!("Creating config directory: {}", dir.display());
        fs::create_dir_all(&dir).map_err(|e| PathError::ConfigDirCreation {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    Ok(dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_prefixes() {
        let home = Path::new("/home/u");
        assert_eq!(expand_home("~/.config", home), "/home/u/.config");
        assert_eq!(expand_home("$HOME/.kube/config", home), "/home/u/.kube/config");
        assert_eq!(expand_home("${HOME}/bin", home), "/home/u/bin");
        assert_eq!(expand_home("~", home), "/home/u");
    }

    #[test]
    fn test_expand_home_leaves_other_values_alone() {
        let home = Path::new("/home/u");
        assert_eq!(expand_home("/tmp/somepath", home), "/tmp/somepath");
        assert_eq!(expand_home("~other/dir", home), "~other/dir");
        assert_eq!(expand_home("$HOMEBREW_PREFIX", home), "$HOMEBREW_PREFIX");
        assert_eq!(expand_home("a/~/b", home), "a/~/b");
    }

    #[test]
    fn test_ensure_config_file_path_creates_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("nested").join("envp").join("config.yaml");

        let result = ensure_config_file_path(target.to_str().unwrap()).unwrap();

        assert_eq!(result, target);
        assert!(target.parent().unwrap().is_dir());
        assert!(!target.exists());
    }

    #[test]
    fn test_ensure_config_file_path_expands_home_before_creating() {
        let home = tempfile::tempdir().unwrap();

        for path in ["~/x/config.yaml", "$HOME/x/config.yaml"] {
            let result = ensure_config_file_path_in(path, Some(home.path())).unwrap();
            assert_eq!(result, home.path().join("x").join("config.yaml"));
        }
        assert!(home.path().join("x").is_dir());
        assert!(!Path::new("~").exists());
    }

    #[test]
    fn test_ensure_config_file_path_rejects_directory_like_paths() {
        assert!(matches!(
            ensure_config_file_path("/"),
            Err(PathError::InvalidFilePath(_))
        ));
    }
}
