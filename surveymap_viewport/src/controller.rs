// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`
use surveymap_persist::{Setting, SettingsStore, ViewSettings};
use surveymap_projection::{ColorScheme, MapMode};

use crate::{ViewState, ViewportConfig};

/// Lower bound for the magnification derived from zoom level and modifier.
const MIN_EFFECTIVE_ZOOM: f64 = 1e-3;

/// Lifecycle of a [`ViewportController`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Phase {
    /// Canvas size unknown; settings not loaded. All operations are no-ops.
    Uninitialized,
    /// Settings loaded and canvas size known.
    Ready(ViewState),
}

/// View parameters and redraw policy for one minimap display.
///
/// See the [crate documentation](crate) for an overview.
#[derive(Debug)]
pub struct ViewportController<S> {
    config: ViewportConfig,
    settings: ViewSettings<S>,
    phase: Phase,
    redraw_requested: bool,
}

impl<S: SettingsStore> ViewportController<S> {
    /// Creates an uninitialized controller.
    pub fn new(config: ViewportConfig, settings: ViewSettings<S>) -> Self {
        Self {
            config,
            settings,
            phase: Phase::Uninitialized,
            redraw_requested: false,
        }
    }

    /// Static configuration.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// The settings adapter.
    #[must_use]
    pub fn settings(&self) -> &ViewSettings<S> {
        &self.settings
    }

    /// Exclusive access to the settings adapter, for example to flush its store.
    pub fn settings_mut(&mut self) -> &mut ViewSettings<S> {
        &mut self.settings
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` once [`initialize`](Self::initialize) has succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    /// The view parameters, once ready.
    #[must_use]
    pub fn state(&self) -> Option<&ViewState> {
        match &self.phase {
            Phase::Ready(state) => Some(state),
            Phase::Uninitialized => None,
        }
    }

    /// Moves to [`Phase::Ready`] once the canvas size is known.
    ///
    /// Loads the persisted settings, bringing out-of-range values back into
    /// range, and requests the first redraw. Returns `false` and stays
    /// uninitialized if either dimension is zero. Calling it again when ready
    /// only updates the canvas size, requesting a redraw if it changed.
    pub fn initialize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if let Phase::Ready(state) = &mut self.phase {
            if (state.canvas_width, state.canvas_height) != (width, height) {
                state.canvas_width = width;
                state.canvas_height = height;
                self.redraw_requested = true;
            }
            return true;
        }

        let loaded = self.settings.load();
        let (min_zoom, max_zoom) = self.config.zoom_range();
        let zoom = loaded.zoom.clamp(min_zoom, max_zoom);
        if zoom != loaded.zoom {
            log::warn!(
                "Persisted zoom {} under {:?} is outside [{}, {}]; using {}",
                loaded.zoom,
                self.settings.prefix(),
                min_zoom,
                max_zoom,
                zoom
            );
        }
        let state = ViewState {
            mode: MapMode::from_index(loaded.mode),
            zoom,
            scheme: ColorScheme::from_index(loaded.color),
            center_lon: 0.0,
            center_lat: 0.0,
            canvas_width: width,
            canvas_height: height,
        };
        log::info!(
            "Minimap {:?} ready at {}x{}: mode {:?}, zoom {}, {:?}",
            self.settings.prefix(),
            width,
            height,
            state.mode,
            state.zoom,
            state.scheme
        );
        self.phase = Phase::Ready(state);
        self.redraw_requested = true;
        true
    }

    /// Zooms in (`increase`) or out by one level, clamped to `[1, max_zoom]`.
    ///
    /// At the boundary this is a no-op: nothing is persisted and no redraw is
    /// requested.
    pub fn change_zoom(&mut self, increase: bool) {
        let (min_zoom, max_zoom) = self.config.zoom_range();
        let Phase::Ready(state) = &mut self.phase else {
            return;
        };
        let step = if increase { 1 } else { -1 };
        let zoom = state.zoom.saturating_add(step).clamp(min_zoom, max_zoom);
        if zoom == state.zoom {
            return;
        }
        state.zoom = zoom;
        log::debug!("Zoom level {}", zoom);
        self.settings.set(Setting::Zoom, zoom);
        self.redraw_requested = true;
    }

    /// Cycles the map mode forward or backward, wrapping at both ends.
    pub fn change_mode(&mut self, forward: bool) {
        let Phase::Ready(state) = &mut self.phase else {
            return;
        };
        state.mode = state.mode.cycled(forward);
        log::debug!("Map mode {:?}", state.mode);
        self.settings.set(Setting::Mode, state.mode.index());
        self.redraw_requested = true;
    }

    /// Switches between the color and greyscale palettes.
    pub fn toggle_color_scheme(&mut self) {
        let Phase::Ready(state) = &mut self.phase else {
            return;
        };
        state.scheme = state.scheme.toggled();
        log::debug!("Color scheme {:?}", state.scheme);
        self.settings.set(Setting::Color, state.scheme.index());
        self.redraw_requested = true;
    }

    /// Requests a redraw because the mapped body changed.
    pub fn on_body_changed(&mut self) {
        if self.is_ready() {
            self.redraw_requested = true;
        }
    }

    /// Returns `true` if a redraw has been requested and not yet taken.
    #[must_use]
    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        core::mem::take(&mut self.redraw_requested)
    }

    /// Records `(lon, lat)` as the center of the freshly built background.
    pub fn recenter(&mut self, lon: f64, lat: f64) {
        if let Phase::Ready(state) = &mut self.phase {
            state.center_lon = lon;
            state.center_lat = lat;
        }
    }

    /// Zoom level plus the configured modifier, kept strictly positive.
    ///
    /// Used both as the survey magnification and for the dead zone.
    #[must_use]
    pub fn effective_zoom(&self) -> f64 {
        let zoom = self.state().map_or(1, |s| s.zoom);
        let effective = f64::from(zoom) + self.config.zoom_modifier;
        if effective.is_finite() {
            effective.max(MIN_EFFECTIVE_ZOOM)
        } else {
            MIN_EFFECTIVE_ZOOM
        }
    }

    /// Dead-zone half-width in degrees: `redraw_edge * 180 / effective_zoom`.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.config.redraw_edge * 180.0 / self.effective_zoom()
    }

    /// Returns `true` if the vessel at `(lon, lat)` has left the dead zone
    /// around the last center.
    ///
    /// A displacement exactly equal to [`deviation`](Self::deviation) stays
    /// inside. Always `false` before the controller is ready.
    #[must_use]
    pub fn should_redraw(&self, lon: f64, lat: f64) -> bool {
        let Some(state) = self.state() else {
            return false;
        };
        let deviation = self.deviation();
        (lat - state.center_lat).abs() > deviation || (lon - state.center_lon).abs() > deviation
    }
}
