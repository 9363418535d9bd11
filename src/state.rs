// src/state.rs

//! The profile store: one backing file, one lock.
//!
//! `ProfileStore::read` takes the store's lock and hands back a
//! [`ConfigGuard`] that keeps it until dropped, so a whole
//! read-modify-save sequence runs without interleaving with another one in
//! the same process. Nothing guards against a second process writing the
//! same file; the last save wins.

use crate::{
    core::paths::{self, PathError},
    models::Config,
};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Failures of reading or writing the profile file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be opened, read or written.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The file location could not be resolved.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// The file is not a valid profile document.
    #[error("Malformed config file '{path}': {source}")]
    MalformedConfig {
        /// Backing file.
        path: String,
        /// Parser error.
        #[source]
        source: serde_yaml::Error,
    },
    /// The config could not be turned into YAML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
    /// A detached config was saved before any read.
    #[error("Nothing to persist: the config has not been read from '{0}' yet.")]
    NothingToPersist(String),
    /// The file read back after a save does not hold the change.
    #[error("Config file '{path}' was saved but does not contain the change: {expected}")]
    Verification {
        /// Backing file.
        path: String,
        /// Description of the change that was expected.
        expected: String,
    },
}

type StoreResult<T> = Result<T, StoreError>;

/// Book-keeping shared by every access to the store, guarded by its lock.
#[derive(Debug, Default)]
struct StoreState {
    /// Set once a read succeeded; saving before that is refused.
    loaded: bool,
}

/// Single source of truth for one profile file.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl ProfileStore {
    /// Opens the store at `path`, expanding the home directory, creating the
    /// parent directory and an empty config file if they are missing.
    pub fn open(path: &str) -> StoreResult<Self> {
        let path = paths::ensure_config_file_path(path)?;
        let store = Self {
            path,
            state: Mutex::new(StoreState::default()),
        };
        store.init_file()?;
        Ok(store)
    }

    /// Opens the store at its default location (`~/.config/envp/config.yaml`).
    pub fn open_default() -> StoreResult<Self> {
        let path = paths::default_config_file()?;
        Self::open(&path.to_string_lossy())
    }

    /// The expanded path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file into a fresh `Config`.
    ///
    /// The returned guard holds the store's lock until it is dropped; any
    /// other `read` or `save` on this store waits for it.
    pub fn read(&self) -> StoreResult<ConfigGuard<'_>> {
        let mut guard = self.lock();
        let config = self.load()?;
        guard.loaded = true;
        Ok(ConfigGuard {
            store: self,
            guard,
            config,
            dirty: false,
        })
    }

    /// Persists a config detached from its guard (see [`ConfigGuard::into_config`]).
    ///
    /// Fails with `NothingToPersist` if the store was never read.
    pub fn save(&self, config: &Config) -> StoreResult<()> {
        let guard = self.lock();
        if !guard.loaded {
            return Err(StoreError::NothingToPersist(self.path.display().to_string()));
        }
        self.write(config)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // The state is a plain flag; a panic elsewhere cannot leave it inconsistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the file with owner-only permissions, and writes an empty
    /// config into it if it has no content.
    fn init_file(&self) -> StoreResult<()> {
        let _guard = self.lock();

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        if file.metadata()?.len() == 0 {
            log::debug!("Initializing empty config file: {}", self.path.display());
            let body = serde_yaml::to_string(&Config::default()).map_err(StoreError::Serialize)?;
            file.write_all(body.as_bytes())?;
        }
        Ok(())
    }

    fn load(&self) -> StoreResult<Config> {
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&content).map_err(|e| StoreError::MalformedConfig {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    fn write(&self, config: &Config) -> StoreResult<()> {
        let body = serde_yaml::to_string(config).map_err(StoreError::Serialize)?;

        let mut options = OpenOptions::new();
        options.write(true).truncate(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(body.as_bytes())?;
        file.flush()?;

        log::debug!("Saved config file: {}", self.path.display());
        Ok(())
    }
}

/// A config read from a [`ProfileStore`], holding the store's lock.
///
/// Reads go through `Deref`; mutations (`set_profile`, `delete_profile`,
/// `set_default`, direct field edits) go through `DerefMut`, which marks the
/// config as changed.
pub struct ConfigGuard<'a> {
    store: &'a ProfileStore,
    guard: MutexGuard<'a, StoreState>,
    config: Config,
    dirty: bool,
}

impl std::fmt::Debug for ConfigGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigGuard")
            .field("path", &self.store.path)
            .field("config", &self.config)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Deref for ConfigGuard<'_> {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

impl DerefMut for ConfigGuard<'_> {
    fn deref_mut(&mut self) -> &mut Config {
        self.dirty = true;
        &mut self.config
    }
}

impl ConfigGuard<'_> {
    /// Whether mutable access to the config was requested since the last save.
    pub fn needs_saving(&self) -> bool {
        self.dirty
    }

    /// Serializes the full config and overwrites the backing file.
    pub fn save(&mut self) -> StoreResult<()> {
        self.store.write(&self.config)?;
        self.guard.loaded = true;
        self.dirty = false;
        Ok(())
    }

    /// Saves, then reads the file back while still holding the lock.
    ///
    /// The returned config is what is actually on disk, so callers can check
    /// that their change landed.
    pub fn commit(mut self) -> StoreResult<Config> {
        self.save()?;
        self.store.load()
    }

    /// Commits and checks the re-read config with `check`, failing with
    /// `Verification` (described by `expected`) when it does not hold.
    pub fn commit_verified<F>(self, expected: &str, check: F) -> StoreResult<Config>
    where
        F: FnOnce(&Config) -> bool,
    {
        let path = self.store.path.display().to_string();
        let config = self.commit()?;
        if check(&config) {
            Ok(config)
        } else {
            Err(StoreError::Verification {
                path,
                expected: expected.to_string(),
            })
        }
    }

    /// Releases the lock and returns the config for later use with
    /// [`ProfileStore::save`].
    pub fn into_config(self) -> Config {
        self.config
    }
}
