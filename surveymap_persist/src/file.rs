// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`SettingsStore`] backed by a RON file.

use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{MemoryStore, SettingsStore};

/// Errors raised by file-backed stores.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the settings file failed.
    #[error("failed to access settings file {path:?}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings file exists but is not a valid RON map of integers.
    #[error("settings file {path:?} is not a valid RON map of integers")]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },
    /// Encoding the settings as RON failed.
    #[error("failed to encode settings as RON")]
    Encode(#[from] ron::Error),
}

/// Store kept in memory and written to a RON file on [`flush`](Self::flush).
///
/// `set` never touches the file system, so it is safe to call from a frame
/// callback. Dropping a store with unflushed changes attempts one last flush
/// and logs a warning if it fails.
#[derive(Debug)]
pub struct RonFileStore {
    path: PathBuf,
    values: MemoryStore,
    dirty: bool,
}

impl RonFileStore {
    /// Opens the store at `path`, loading its contents if the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if the file exists but cannot be read, and
    /// [`PersistError::Parse`] if it is not a RON map of integers.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => parse(&path, &text)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => MemoryStore::new(),
            Err(source) => return Err(PersistError::Io { path, source }),
        };
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// The file this store flushes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if there are changes not yet written.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Renders the current contents as pretty RON, keys sorted.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Encode`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String, PersistError> {
        let text =
            ron::ser::to_string_pretty(&self.values.to_sorted(), ron::ser::PrettyConfig::default())?;
        Ok(text)
    }

    /// Writes pending changes to disk. Does nothing when clean.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Encode`] or [`PersistError::Io`]; the store
    /// stays dirty so a later flush can retry.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        if !self.dirty {
            return Ok(());
        }
        let text = self.to_ron_string()?;
        std::fs::write(&self.path, text).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }
}

impl SettingsStore for RonFileStore {
    fn get(&self, key: &str) -> Option<i32> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: i32) {
        if self.values.get(key) != Some(value) {
            self.values.set(key, value);
            self.dirty = true;
        }
    }
}

impl Drop for RonFileStore {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            log::warn!("Could not save settings to {:?}: {}", self.path, err);
        }
    }
}

fn parse(path: &Path, text: &str) -> Result<MemoryStore, PersistError> {
    let map: BTreeMap<String, i32> = ron::from_str(text).map_err(|source| PersistError::Parse {
        path: path.to_owned(),
        source,
    })?;
    Ok(map.into_iter().collect())
}
