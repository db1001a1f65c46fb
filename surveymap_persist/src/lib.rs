// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surveymap Persist: integer settings that survive reloads.
//!
//! The minimap remembers three small integers per on-board display: the map
//! mode, the zoom level, and the color scheme. This crate separates:
//!
//! - [`SettingsStore`]: a plain string-keyed integer store. The host usually
//!   owns one store per vessel part and shares it between every display on
//!   that part. [`MemoryStore`] and [`RonFileStore`] are provided.
//! - [`ViewSettings`]: the adapter one display uses. It namespaces keys with a
//!   prefix unique to the display instance and exposes typed [`Setting`]s with
//!   caller-supplied defaults instead of ambient nullability.
//!
//! ## Example
//!
//! ```rust
//! use surveymap_persist::{MemoryStore, Setting, ViewSettings};
//!
//! let mut settings = ViewSettings::for_instance(MemoryStore::new(), "surveymap", 7);
//! assert_eq!(settings.get(Setting::Zoom), None);
//! assert_eq!(settings.get_or(Setting::Zoom, 1), 1);
//!
//! settings.set(Setting::Zoom, 12);
//! assert_eq!(settings.key(Setting::Zoom), "surveymap7zoom");
//!
//! // A reload hands the same store to a fresh adapter.
//! let reloaded = ViewSettings::for_instance(settings.into_store(), "surveymap", 7);
//! assert_eq!(reloaded.get(Setting::Zoom), Some(12));
//! ```
//!
//! This crate is `no_std`. [`RonFileStore`] and [`PersistError`] need the
//! `std` feature, which is enabled by default.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

#[cfg(feature = "std")]
mod file;
mod store;

#[cfg(feature = "std")]
pub use file::{PersistError, RonFileStore};
pub use store::MemoryStore;

/// A string-keyed store of integer values.
///
/// Access is synchronous and must return promptly; implementations backed by
/// slow media should buffer and flush explicitly.
pub trait SettingsStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<i32>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: i32);
}

impl<S: SettingsStore + ?Sized> SettingsStore for &mut S {
    fn get(&self, key: &str) -> Option<i32> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: i32) {
        (**self).set(key, value);
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn get(&self, key: &str) -> Option<i32> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: i32) {
        (**self).set(key, value);
    }
}

/// The settings a minimap display persists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Setting {
    /// Map mode index.
    Mode,
    /// Zoom level.
    Zoom,
    /// Color scheme index.
    Color,
}

impl Setting {
    /// All settings, in load order.
    pub const ALL: [Self; 3] = [Self::Mode, Self::Zoom, Self::Color];

    /// Key suffix appended to the instance prefix.
    #[inline]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::Zoom => "zoom",
            Self::Color => "color",
        }
    }

    /// Value used when nothing has been persisted yet.
    #[inline]
    pub const fn default_value(self) -> i32 {
        match self {
            Self::Mode | Self::Color => 0,
            Self::Zoom => 1,
        }
    }
}

/// Raw persisted values, before any range checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PersistedSettings {
    /// Map mode index.
    pub mode: i32,
    /// Zoom level.
    pub zoom: i32,
    /// Color scheme index.
    pub color: i32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            mode: Setting::Mode.default_value(),
            zoom: Setting::Zoom.default_value(),
            color: Setting::Color.default_value(),
        }
    }
}

/// Per-instance view onto a [`SettingsStore`].
#[derive(Clone, Debug)]
pub struct ViewSettings<S> {
    store: S,
    prefix: String,
}

impl<S: SettingsStore> ViewSettings<S> {
    /// Wraps `store`, namespacing every key with `prefix`.
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Wraps `store` with the prefix `"{base}{instance}"`.
    ///
    /// `instance` identifies the physical display, so two displays on the
    /// same part keep separate settings.
    pub fn for_instance(store: S, base: &str, instance: u32) -> Self {
        Self::new(store, format!("{base}{instance}"))
    }

    /// The key prefix for this instance.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The full store key for `setting`.
    pub fn key(&self, setting: Setting) -> String {
        format!("{}{}", self.prefix, setting.suffix())
    }

    /// Returns the persisted value of `setting`, if any.
    pub fn get(&self, setting: Setting) -> Option<i32> {
        self.store.get(&self.key(setting))
    }

    /// Returns the persisted value of `setting`, or `default` if absent.
    pub fn get_or(&self, setting: Setting, default: i32) -> i32 {
        self.get(setting).unwrap_or(default)
    }

    /// Persists `value` for `setting`.
    pub fn set(&mut self, setting: Setting, value: i32) {
        let key = self.key(setting);
        self.store.set(&key, value);
    }

    /// Loads all settings, substituting [`Setting::default_value`] for
    /// anything absent.
    pub fn load(&self) -> PersistedSettings {
        PersistedSettings {
            mode: self.get_or(Setting::Mode, Setting::Mode.default_value()),
            zoom: self.get_or(Setting::Zoom, Setting::Zoom.default_value()),
            color: self.get_or(Setting::Color, Setting::Color.default_value()),
        }
    }

    /// Shared access to the underlying store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exclusive access to the underlying store.
    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the adapter, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }
}
