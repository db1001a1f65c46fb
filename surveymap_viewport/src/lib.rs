// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surveymap Viewport: zoom, pan, and display mode for one minimap display.
//!
//! [`ViewportController`] owns the user-facing view parameters (zoom level,
//! map mode, color scheme) and the center the background was last built
//! around. It decides *when* the background has to be rebuilt:
//!
//! - After any setting change ([`change_zoom`], [`change_mode`],
//!   [`toggle_color_scheme`]) or a body change ([`on_body_changed`]), it
//!   raises a redraw request the driver collects with
//!   [`take_redraw_request`].
//! - While flying, [`should_redraw`] implements a dead zone: the vessel may
//!   drift up to [`deviation`] degrees from the last center before a rebuild
//!   is worth its cost.
//!
//! It does **not** build rasters or draw; the render loop carries the
//! decision over to the projection engine.
//!
//! Settings are read once, when the controller becomes ready, and written
//! back through [`surveymap_persist::ViewSettings`] on every change.
//!
//! ## Example
//!
//! ```rust
//! use surveymap_persist::{MemoryStore, ViewSettings};
//! use surveymap_viewport::{ViewportConfig, ViewportController};
//!
//! let settings = ViewSettings::for_instance(MemoryStore::new(), "surveymap", 0);
//! let mut view = ViewportController::new(ViewportConfig::default(), settings);
//!
//! // Nothing happens until the canvas size is known.
//! view.change_zoom(true);
//! assert!(!view.is_ready());
//!
//! assert!(view.initialize(256, 128));
//! assert!(view.take_redraw_request());
//!
//! view.recenter(0.0, 0.0);
//! // deviation = 0.8 * 180 / 1
//! assert!((view.deviation() - 144.0).abs() < 1e-9);
//! assert!(!view.should_redraw(100.0, 0.0));
//! assert!(view.should_redraw(150.0, 0.0));
//! ```
//!
//! [`change_zoom`]: ViewportController::change_zoom
//! [`change_mode`]: ViewportController::change_mode
//! [`toggle_color_scheme`]: ViewportController::toggle_color_scheme
//! [`on_body_changed`]: ViewportController::on_body_changed
//! [`take_redraw_request`]: ViewportController::take_redraw_request
//! [`should_redraw`]: ViewportController::should_redraw
//! [`deviation`]: ViewportController::deviation
//!
//! This crate is `no_std`.

#![no_std]

mod controller;

pub use controller::{Phase, ViewportController};

use surveymap_projection::{ColorScheme, MapMode};

/// Static, author-supplied viewport tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Highest zoom level; values below `1` are treated as `1`.
    pub max_zoom: i32,
    /// Added to the zoom level before it is used as a magnification.
    pub zoom_modifier: f64,
    /// Fraction of the half-height, in degrees at zoom 1, the vessel may
    /// drift before a redraw.
    pub redraw_edge: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_zoom: 40,
            zoom_modifier: 0.0,
            redraw_edge: 0.8,
        }
    }
}

impl ViewportConfig {
    /// Zoom range `[1, max_zoom]`.
    #[inline]
    pub fn zoom_range(&self) -> (i32, i32) {
        (1, self.max_zoom.max(1))
    }
}

/// The view parameters of a ready controller.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewState {
    /// Surveyed quantity shown.
    pub mode: MapMode,
    /// Zoom level in `[1, max_zoom]`.
    pub zoom: i32,
    /// Background palette.
    pub scheme: ColorScheme,
    /// Longitude the background was last built around.
    pub center_lon: f64,
    /// Latitude the background was last built around.
    pub center_lat: f64,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
}
