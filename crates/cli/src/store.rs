//! YAML-backed credential profile store.
//!
//! The store is a single file mapping profile names to credentials:
//!
//! ```yaml
//! default:
//!   shopname: my-shop
//!   apikey: 0123456789abcdef
//!   password: shppa_0123456789abcdef
//! ```
//!
//! Every read loads the whole file and every mutation rewrites it. There is
//! no locking: concurrent writers race and the last write wins.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use shopnado_core::Profile;
use thiserror::Error;
use tracing::debug;

use crate::config;

/// Profile name to credentials, sorted by name.
pub type ProfileMap = BTreeMap<String, Profile>;

/// Errors that can occur while reading or writing the profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An operation that targets one profile was given an empty name.
    #[error("profile name is required")]
    MissingName,

    /// The store file does not exist.
    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The named profile is not in the store.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// `~` could not be expanded.
    #[error("unable to determine the home directory")]
    NoHomeDir,

    /// Reading, writing or removing the store file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store file is not a map of profiles.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The profiles could not be serialized.
    #[error("failed to serialize profiles: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The editor could not be started.
    #[error("failed to launch editor {editor}: {source}")]
    EditorLaunch {
        editor: String,
        #[source]
        source: io::Error,
    },

    /// The editor exited unsuccessfully.
    #[error("editor {editor} exited with {status}")]
    EditorFailed { editor: String, status: ExitStatus },
}

/// Handle to a profile store file.
///
/// Opening a store only resolves its path; nothing is read until an
/// operation needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Open the store at `path`, expanding a leading `~/`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoHomeDir` if `~` cannot be expanded.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        Ok(Self {
            path: config::expand_home(path)?,
        })
    }

    /// Open the store at an already resolved path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolved path of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Ensure the store file exists, creating it and its parent directory if
    /// needed. An existing file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory or file cannot be created.
    pub fn touch(&self) -> Result<(), StoreError> {
        if self.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), "Created profile store");
        Ok(())
    }

    /// Load every profile in the store.
    ///
    /// An empty file (or one containing only `null`) is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::FileNotFound` if the file is missing,
    /// `StoreError::Io` if it cannot be read and `StoreError::Parse` if it is
    /// not a map of profiles.
    pub fn load(&self) -> Result<ProfileMap, StoreError> {
        if !self.exists() {
            return Err(StoreError::FileNotFound(self.path.clone()));
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if contents.trim().is_empty() {
            return Ok(ProfileMap::new());
        }

        let profiles: Option<ProfileMap> =
            serde_yaml::from_str(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(profiles.unwrap_or_default())
    }

    /// Overwrite the store file with `profiles`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` or `StoreError::Io` on failure.
    pub fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        let contents = serde_yaml::to_string(profiles)?;
        fs::write(&self.path, contents).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), count = profiles.len(), "Saved profile store");
        Ok(())
    }

    /// Add or replace the profile `name`.
    ///
    /// The store file is always created if missing. The profile itself is
    /// only written when all three credential fields are set; an incomplete
    /// profile leaves the store unchanged so that a user can create the file
    /// first and fill it in with `profile edit`.
    ///
    /// Returns whether the profile was written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingName` if `name` is empty, or any error from
    /// [`touch`](Self::touch), [`load`](Self::load) or [`save`](Self::save).
    pub fn create(&self, name: &str, profile: Profile) -> Result<bool, StoreError> {
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }

        self.touch()?;
        let mut profiles = self.load()?;

        if !profile.is_complete() {
            debug!(name, "Incomplete profile, store left unchanged");
            return Ok(false);
        }

        profiles.insert(name.to_owned(), profile);
        self.save(&profiles)?;
        Ok(true)
    }

    /// Look up the profile `name`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingName` if `name` is empty,
    /// `StoreError::ProfileNotFound` if it is not in the store, or any error
    /// from [`load`](Self::load).
    pub fn read(&self, name: &str) -> Result<Profile, StoreError> {
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }

        self.load()?
            .remove(name)
            .ok_or_else(|| StoreError::ProfileNotFound(name.to_owned()))
    }

    /// Every profile in the store, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns any error from [`load`](Self::load).
    pub fn list(&self) -> Result<Vec<(String, Profile)>, StoreError> {
        Ok(self.load()?.into_iter().collect())
    }

    /// Remove the profile `name`, leaving the others untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingName` if `name` is empty,
    /// `StoreError::ProfileNotFound` if it is not in the store, or any error
    /// from [`load`](Self::load) or [`save`](Self::save).
    pub fn delete(&self, name: &str) -> Result<Profile, StoreError> {
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }

        let mut profiles = self.load()?;
        let removed = profiles
            .remove(name)
            .ok_or_else(|| StoreError::ProfileNotFound(name.to_owned()))?;
        self.save(&profiles)?;
        Ok(removed)
    }

    /// Remove the store file and every profile in it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::FileNotFound` if there is no store file, or
    /// `StoreError::Io` if it cannot be removed.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        fs::remove_file(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::FileNotFound(self.path.clone())
            } else {
                self.io_error(e)
            }
        })
    }

    /// Open the store file in `editor`, which inherits this process's
    /// terminal. The edited contents are not validated here; a broken file
    /// is reported by the next [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EditorLaunch` if the editor cannot be started and
    /// `StoreError::EditorFailed` if it exits unsuccessfully.
    pub fn edit(&self, editor: &str) -> Result<(), StoreError> {
        debug!(editor, path = %self.path.display(), "Launching editor");

        let status = Command::new(editor)
            .arg(&self.path)
            .status()
            .map_err(|source| StoreError::EditorLaunch {
                editor: editor.to_owned(),
                source,
            })?;

        if !status.success() {
            return Err(StoreError::EditorFailed {
                editor: editor.to_owned(),
                status,
            });
        }

        Ok(())
    }
}
