// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimap configuration, loadable from RON.

use std::path::{Path, PathBuf};

use kurbo::Vec2;
use peniko::Color;
use serde::{Deserialize, Serialize};
use surveymap_overlay::{MarkerPalette, OverlayConfig};
use surveymap_viewport::ViewportConfig;
use thiserror::Error;

use crate::ButtonMap;

/// Errors raised while loading a [`MinimapConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read minimap config {path:?}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The text is not a valid minimap configuration.
    #[error("invalid minimap config")]
    Parse(#[from] ron::error::SpannedError),
    /// Encoding the configuration as RON failed.
    #[error("failed to encode minimap config")]
    Encode(#[from] ron::Error),
}

/// Overlay colors as straight-alpha RGBA8.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Own vessel icon.
    pub self_vessel: [u8; 4],
    /// Target icon.
    pub target: [u8; 4],
    /// Known, unvisited anomaly icon.
    pub unvisited_anomaly: [u8; 4],
    /// Visited anomaly icon.
    pub visited_anomaly: [u8; 4],
    /// Icon drop shadow.
    pub shadow: [u8; 4],
    /// Distance scale bar.
    pub scale_bar: [u8; 4],
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            self_vessel: [255, 255, 255, 255],
            target: [255, 235, 4, 255],
            unvisited_anomaly: [255, 0, 0, 255],
            visited_anomaly: [0, 255, 0, 255],
            shadow: [0, 0, 0, 255],
            scale_bar: [255, 255, 255, 255],
        }
    }
}

impl ColorConfig {
    /// The colors as an overlay palette.
    pub fn palette(&self) -> MarkerPalette {
        let color = |[r, g, b, a]: [u8; 4]| Color::from_rgba8(r, g, b, a);
        MarkerPalette {
            self_vessel: color(self.self_vessel),
            target: color(self.target),
            unvisited_anomaly: color(self.unvisited_anomaly),
            visited_anomaly: color(self.visited_anomaly),
            shadow: color(self.shadow),
            scale_bar: color(self.scale_bar),
        }
    }
}

/// Author-supplied settings of one minimap display.
///
/// Every field is optional in RON; missing fields take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Button bindings.
    pub buttons: ButtonMap,
    /// Highest zoom level.
    pub max_zoom: i32,
    /// Added to the zoom level before use.
    pub zoom_modifier: f64,
    /// Dead-zone fraction; see [`ViewportConfig::redraw_edge`].
    pub redraw_edge: f64,
    /// Side of an icon square in pixels.
    pub icon_pixel_size: f64,
    /// Shadow offset in pixels as `(x, y)`.
    pub icon_shadow_shift: (f64, f64),
    /// Overlay colors.
    pub colors: ColorConfig,
    /// Ticks skipped between deviation checks.
    pub refresh_rate: u32,
    /// Distance the scale bar represents, in kilometers.
    pub scale_reference_km: f64,
    /// Prefix of the persisted setting keys, followed by the instance id.
    pub instance_prefix: String,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        let viewport = ViewportConfig::default();
        let overlay = OverlayConfig::default();
        Self {
            buttons: ButtonMap::default(),
            max_zoom: viewport.max_zoom,
            zoom_modifier: viewport.zoom_modifier,
            redraw_edge: viewport.redraw_edge,
            icon_pixel_size: overlay.icon_size,
            icon_shadow_shift: (overlay.shadow_offset.x, overlay.shadow_offset.y),
            colors: ColorConfig::default(),
            refresh_rate: 0,
            scale_reference_km: overlay.scale_reference_km,
            instance_prefix: "surveymap".to_owned(),
        }
    }
}

impl MinimapConfig {
    /// Parses a configuration from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid RON for this
    /// structure.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Loads a configuration from a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Loads a configuration, falling back to the defaults when the file is
    /// missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(err) => {
                log::warn!("Invalid minimap config at {:?}: {}, using defaults", path, err);
                Self::default()
            }
        }
    }

    /// Renders the configuration as pretty RON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Encode`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// The viewport part of the configuration.
    pub fn viewport(&self) -> ViewportConfig {
        ViewportConfig {
            max_zoom: self.max_zoom,
            zoom_modifier: self.zoom_modifier,
            redraw_edge: self.redraw_edge,
        }
    }

    /// The overlay part of the configuration.
    pub fn overlay(&self) -> OverlayConfig {
        OverlayConfig {
            icon_size: self.icon_pixel_size,
            shadow_offset: Vec2::new(self.icon_shadow_shift.0, self.icon_shadow_shift.1),
            palette: self.colors.palette(),
            scale_reference_km: self.scale_reference_km,
        }
    }
}
