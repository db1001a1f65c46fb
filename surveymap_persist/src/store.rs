// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`SettingsStore`].

use alloc::borrow::ToOwned;
#[cfg(feature = "std")]
use alloc::collections::BTreeMap;
use alloc::string::String;

use hashbrown::HashMap;

use crate::SettingsStore;

/// In-memory store.
///
/// Cloning the store and handing the clone to a fresh adapter is how tests
/// simulate a reload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, i32>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[cfg(feature = "std")]
    pub(crate) fn to_sorted(&self) -> BTreeMap<String, i32> {
        self.values.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i32) {
        if let Some(slot) = self.values.get_mut(key) {
            *slot = value;
        } else {
            self.values.insert(key.to_owned(), value);
        }
    }
}

impl FromIterator<(String, i32)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, i32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
