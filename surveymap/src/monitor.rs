// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use surveymap_imaging::{DrawOp, ImageId, ImagingBackend, Raster, RectF};
use surveymap_overlay::{IconOverlayRenderer, OverlayFrame};
use surveymap_persist::{SettingsStore, ViewSettings};
use surveymap_projection::{Body, ProjectionEngine, SurveyProvider, VesselMarker};
use surveymap_viewport::ViewportController;

use crate::{ButtonAction, MinimapConfig, RefreshCountdown};

/// The host's per-frame snapshot of the flight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlightState {
    /// Body the vessel is on or orbiting.
    pub body: Body,
    /// The vessel the display is mounted on.
    pub vessel: VesselMarker,
    /// The currently targeted vessel, if any.
    pub target: Option<VesselMarker>,
    /// Whether the display is being looked at from the cockpit.
    pub active: bool,
}

/// What a call to [`MinimapMonitor::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not viewed from the cockpit, or not initialized yet.
    Skipped,
    /// Held back by the refresh countdown.
    Throttled,
    /// Checked; nothing to rebuild.
    Idle,
    /// The background was reconfigured and a rebuild started.
    Redrawn,
}

#[derive(Copy, Clone, Debug)]
struct Uploaded {
    image: ImageId,
    generation: u64,
}

#[derive(Debug)]
struct SurfaceResources {
    overlay: IconOverlayRenderer,
    background: Option<Uploaded>,
}

#[derive(Debug)]
enum MonitorPhase {
    Uninitialized,
    Ready(SurfaceResources),
}

/// One minimap display: the per-frame and per-tick driver.
///
/// The host calls [`render`](Self::render) with the display surface every
/// frame, [`tick`](Self::tick) from its update loop, and
/// [`on_button`](Self::on_button) for decoded button presses. The same
/// surface must be passed to every `render` call, since uploaded images
/// live there.
#[derive(Debug)]
pub struct MinimapMonitor<P, S> {
    config: MinimapConfig,
    engine: ProjectionEngine<P>,
    viewport: ViewportController<S>,
    countdown: RefreshCountdown,
    atlas: Raster,
    scale_bar: Option<Raster>,
    target: Option<VesselMarker>,
    phase: MonitorPhase,
}

impl<P: SurveyProvider, S: SettingsStore> MinimapMonitor<P, S> {
    /// Creates a display drawing `provider`'s survey and icons from `atlas`.
    ///
    /// Settings are kept in `store` under
    /// `"{config.instance_prefix}{instance}"`.
    pub fn new(config: MinimapConfig, provider: P, store: S, instance: u32, atlas: Raster) -> Self {
        let settings = ViewSettings::for_instance(store, &config.instance_prefix, instance);
        Self {
            engine: ProjectionEngine::new(provider),
            viewport: ViewportController::new(config.viewport(), settings),
            countdown: RefreshCountdown::new(config.refresh_rate),
            atlas,
            scale_bar: None,
            target: None,
            phase: MonitorPhase::Uninitialized,
            config,
        }
    }

    /// Draws the scale bar from `image`, tinted, instead of a filled rectangle.
    #[must_use]
    pub fn with_scale_bar_image(mut self, image: Raster) -> Self {
        self.scale_bar = Some(image);
        self
    }

    /// Static configuration.
    pub fn config(&self) -> &MinimapConfig {
        &self.config
    }

    /// The projection engine.
    pub fn engine(&self) -> &ProjectionEngine<P> {
        &self.engine
    }

    /// The viewport controller.
    pub fn viewport(&self) -> &ViewportController<S> {
        &self.viewport
    }

    /// Exclusive access to the viewport controller, for example to flush
    /// its settings store.
    pub fn viewport_mut(&mut self) -> &mut ViewportController<S> {
        &mut self.viewport
    }

    /// Returns `true` once the first [`render`](Self::render) has set things up.
    pub fn is_ready(&self) -> bool {
        matches!(self.phase, MonitorPhase::Ready(_))
    }

    /// Renders one frame into `surface`.
    ///
    /// Returns `false` while there is nothing to show: when the surface has
    /// no size, and on the first call, which loads the settings, uploads the
    /// icons and starts the first background build.
    pub fn render<B: ImagingBackend>(&mut self, surface: &mut B, flight: &FlightState) -> bool {
        let (width, height) = surface.target_size();
        if width == 0 || height == 0 {
            return false;
        }
        if !self.is_ready() {
            self.initialize(surface, width, height, flight);
            return false;
        }
        self.viewport.initialize(width, height);
        if self.viewport.take_redraw_request() {
            self.redraw(flight);
        }
        self.present(surface, flight, width, height);
        true
    }

    /// Handles a decoded button press. Unmapped buttons, and any button
    /// before the first render, are ignored.
    ///
    /// A resulting rebuild happens on the next `render` or `tick`.
    pub fn on_button(&mut self, button: i32) {
        if !self.is_ready() {
            return;
        }
        let Some(action) = self.config.buttons.action(button) else {
            return;
        };
        match action {
            ButtonAction::ZoomOut => self.viewport.change_zoom(false),
            ButtonAction::ZoomIn => self.viewport.change_zoom(true),
            ButtonAction::CycleMode => self.viewport.change_mode(true),
            ButtonAction::ToggleColor => self.viewport.toggle_color_scheme(),
        }
    }

    /// Periodic update, independent of the frame rate.
    ///
    /// When the refresh countdown lets it through, advances the background
    /// build by one step, picks up the current target, and rebuilds if the
    /// vessel left the dead zone, changed body, or a setting changed.
    pub fn tick(&mut self, flight: &FlightState) -> TickOutcome {
        if !flight.active || !self.is_ready() {
            return TickOutcome::Skipped;
        }
        if !self.countdown.tick() {
            return TickOutcome::Throttled;
        }
        self.engine.advance_build();
        self.target = flight.target;
        if self.engine.body().map(|b| b.id) != Some(flight.body.id) {
            self.viewport.on_body_changed();
        }
        let drifted = self
            .viewport
            .should_redraw(flight.vessel.longitude, flight.vessel.latitude);
        let requested = self.viewport.take_redraw_request();
        if drifted || requested {
            self.redraw(flight);
            TickOutcome::Redrawn
        } else {
            TickOutcome::Idle
        }
    }

    fn initialize<B: ImagingBackend>(
        &mut self,
        surface: &mut B,
        width: u32,
        height: u32,
        flight: &FlightState,
    ) {
        if !self.viewport.initialize(width, height) {
            return;
        }
        let atlas = surface.create_image(self.atlas.desc(), self.atlas.as_rgba8());
        let mut overlay = IconOverlayRenderer::new(self.config.overlay(), atlas, self.atlas.desc());
        if let Some(bar) = &self.scale_bar {
            overlay = overlay.with_scale_bar_image(surface.create_image(bar.desc(), bar.as_rgba8()));
        }
        self.phase = MonitorPhase::Ready(SurfaceResources {
            overlay,
            background: None,
        });
        self.target = flight.target;
        self.viewport.take_redraw_request();
        self.redraw(flight);
    }

    fn redraw(&mut self, flight: &FlightState) {
        let Some(state) = self.viewport.state().copied() else {
            return;
        };
        let body = flight.body;
        let (lon, lat) = (flight.vessel.longitude, flight.vessel.latitude);
        let zoom = self.viewport.effective_zoom();

        self.engine.set_body(body);
        self.engine.set_size(state.canvas_width, state.canvas_height);
        self.engine.set_scale(zoom);
        self.viewport.recenter(lon, lat);
        self.engine.center_around(lon, lat);
        self.engine.reset_mode(state.mode, state.scheme);

        if let MonitorPhase::Ready(resources) = &mut self.phase {
            resources.overlay.set_anomalies(self.engine.anomalies());
            measure_scale(&mut resources.overlay, &self.engine, &self.viewport);
        }
        log::debug!(
            "Redraw of body {:?} around ({:.3}, {:.3}): zoom {}, {:?}, {:?}, deviation {:.3}",
            body.id,
            lon,
            lat,
            zoom,
            state.mode,
            state.scheme,
            self.viewport.deviation()
        );
    }

    fn present<B: ImagingBackend>(
        &mut self,
        surface: &mut B,
        flight: &FlightState,
        width: u32,
        height: u32,
    ) {
        let MonitorPhase::Ready(resources) = &mut self.phase else {
            return;
        };
        let generation = self.engine.generation();
        let replaced = resources
            .background
            .is_none_or(|uploaded| uploaded.generation != generation);
        // Until a build completes, the partial raster changes every step.
        if replaced || generation == 0 {
            if replaced {
                measure_scale(&mut resources.overlay, &self.engine, &self.viewport);
            }
            if let Some(old) = resources.background.take() {
                surface.destroy_image(old.image);
            }
            let raster = self.engine.background();
            if !raster.is_empty() {
                let image = surface.create_image(raster.desc(), raster.as_rgba8());
                resources.background = Some(Uploaded { image, generation });
            }
        }
        if let Some(uploaded) = resources.background {
            surface.draw(DrawOp::BlitImage {
                image: uploaded.image,
                dst: RectF::from_kurbo(Rect::new(0.0, 0.0, f64::from(width), f64::from(height))),
            });
        }

        let body = self.engine.body().map_or(flight.body.id, |b| b.id);
        let frame = OverlayFrame {
            body,
            vessel: &flight.vessel,
            target: self.target.as_ref(),
        };
        resources.overlay.draw(surface, &self.engine, &frame);
    }
}

/// Measures the scale bar around the view center on the presented raster.
fn measure_scale<P: SurveyProvider, S: SettingsStore>(
    overlay: &mut IconOverlayRenderer,
    engine: &ProjectionEngine<P>,
    viewport: &ViewportController<S>,
) {
    let (Some(body), Some(state)) = (engine.body(), viewport.state()) else {
        return;
    };
    overlay.measure_scale(engine, body.radius_km, state.center_lon, state.center_lat);
}
