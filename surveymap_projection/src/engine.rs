// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::Point;
use surveymap_imaging::Raster;

use crate::{
    AnomalyMarker, Body, ColorScheme, MapMode, RasterGeometry, ScreenProjection, SurveyProvider,
};

/// Progress of the background raster build.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BuildState {
    /// Nothing has been configured yet.
    #[default]
    Idle,
    /// A build is in progress after `steps` calls to
    /// [`ProjectionEngine::advance_build`].
    Building {
        /// Steps taken since the last restart.
        steps: u32,
    },
    /// The raster reflects the current parameters.
    Complete {
        /// Steps the build took.
        steps: u32,
    },
}

/// A completed raster and the layout it was built with.
#[derive(Clone, Debug)]
struct Snapshot {
    raster: Raster,
    geometry: RasterGeometry,
}

/// Drives a [`SurveyProvider`] and maps surface coordinates to the canvas.
///
/// Every configuration call forwards to the provider and restarts the build
/// at [`BuildState::Building`] with zero steps. The last completed raster is
/// kept so a caller can keep presenting it while a new build runs; see
/// [`background`](Self::background) and [`generation`](Self::generation).
///
/// Screen placement through [`ScreenProjection`] follows the presented
/// raster, not the build in progress, so markers stay on the features they
/// belong to until the new raster replaces the old one.
#[derive(Clone, Debug)]
pub struct ProjectionEngine<P> {
    provider: P,
    body: Option<Body>,
    width: u32,
    height: u32,
    state: BuildState,
    completed: Option<Snapshot>,
    generation: u64,
}

impl<P: SurveyProvider> ProjectionEngine<P> {
    /// Wraps `provider`. Nothing is built until the engine is configured.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            body: None,
            width: 0,
            height: 0,
            state: BuildState::Idle,
            completed: None,
            generation: 0,
        }
    }

    /// The wrapped provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The current body, if one has been set.
    #[must_use]
    pub fn body(&self) -> Option<Body> {
        self.body
    }

    /// Canvas size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Selects the body to map.
    pub fn set_body(&mut self, body: Body) {
        self.body = Some(body);
        self.provider.set_body(&body);
        self.restart();
    }

    /// Sets the canvas (and raster) size in pixels.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.provider.set_size(width, height);
        self.restart();
    }

    /// Sets the magnification relative to the whole-world fit.
    pub fn set_scale(&mut self, zoom: f64) {
        self.provider.set_scale(zoom);
        self.restart();
    }

    /// Centers the map on `(lon, lat)` in degrees.
    pub fn center_around(&mut self, lon: f64, lat: f64) {
        self.provider.center_around(lon, lat);
        self.restart();
    }

    /// Switches the surveyed quantity and palette.
    pub fn reset_mode(&mut self, mode: MapMode, scheme: ColorScheme) {
        self.provider.reset_mode(mode, scheme);
        self.restart();
    }

    /// Current build progress.
    #[must_use]
    pub fn build_state(&self) -> BuildState {
        self.state
    }

    /// Returns `true` unless a build is in progress.
    #[must_use]
    pub fn is_build_complete(&self) -> bool {
        !matches!(self.state, BuildState::Building { .. })
    }

    /// Performs one bounded unit of build work and returns the new state.
    ///
    /// Does nothing unless a build is in progress.
    pub fn advance_build(&mut self) -> BuildState {
        let BuildState::Building { mut steps } = self.state else {
            return self.state;
        };
        if !self.provider.is_build_complete() {
            self.provider.advance_build();
            steps = steps.saturating_add(1);
        }
        self.state = if self.provider.is_build_complete() {
            self.completed = Some(Snapshot {
                raster: self.provider.raster().clone(),
                geometry: self.provider.geometry(),
            });
            self.generation = self.generation.wrapping_add(1);
            log::trace!(
                "Background build {} complete after {} steps",
                self.generation,
                steps
            );
            BuildState::Complete { steps }
        } else {
            BuildState::Building { steps }
        };
        self.state
    }

    /// Provider's projected longitude for `(lon, lat)`.
    #[must_use]
    pub fn project_longitude(&self, lon: f64, lat: f64) -> f64 {
        self.provider.project_longitude(lon, lat)
    }

    /// Provider's projected latitude for `(lon, lat)`.
    #[must_use]
    pub fn project_latitude(&self, lon: f64, lat: f64) -> f64 {
        self.provider.project_latitude(lon, lat)
    }

    /// Provider's raster layout for the build in progress.
    #[must_use]
    pub fn geometry(&self) -> RasterGeometry {
        self.provider.geometry()
    }

    /// Layout of the raster returned by [`background`](Self::background).
    #[must_use]
    pub fn presented_geometry(&self) -> RasterGeometry {
        self.completed
            .as_ref()
            .map_or_else(|| self.provider.geometry(), |snapshot| snapshot.geometry)
    }

    /// The raster to present: the last completed one, or the in-progress
    /// raster before anything has completed.
    #[must_use]
    pub fn background(&self) -> &Raster {
        self.completed
            .as_ref()
            .map_or_else(|| self.provider.raster(), |snapshot| &snapshot.raster)
    }

    /// Number of builds completed so far.
    ///
    /// Changes exactly when [`background`](Self::background) switches to a
    /// newly completed raster.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Anomalies on the current body; empty if no body is set.
    #[must_use]
    pub fn anomalies(&self) -> Vec<AnomalyMarker> {
        self.body
            .map(|body| self.provider.anomalies(body.id))
            .unwrap_or_default()
    }

    fn restart(&mut self) {
        self.state = BuildState::Building { steps: 0 };
    }
}

impl<P: SurveyProvider> ScreenProjection for ProjectionEngine<P> {
    fn to_screen(&self, lon: f64, lat: f64) -> Point {
        let geometry = self.presented_geometry();
        Point::new(
            geometry.pixel_x(self.project_longitude(lon, lat), f64::from(self.width)),
            geometry.pixel_y(self.project_latitude(lon, lat), f64::from(self.height)),
        )
    }

    fn horizontal_period(&self) -> f64 {
        self.presented_geometry()
            .horizontal_period(f64::from(self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BodyId, EquirectSurvey};

    type Sampler = fn(BodyId, MapMode, ColorScheme, f64, f64) -> [u8; 4];

    fn flat(_: BodyId, _: MapMode, _: ColorScheme, _: f64, _: f64) -> [u8; 4] {
        [10, 20, 30, 255]
    }

    fn configured(width: u32, height: u32) -> ProjectionEngine<EquirectSurvey<Sampler>> {
        let mut engine =
            ProjectionEngine::new(EquirectSurvey::new(flat as Sampler).with_rows_per_step(2));
        engine.set_body(Body {
            id: BodyId(1),
            radius_km: 600.0,
        });
        engine.set_size(width, height);
        engine.set_scale(1.0);
        engine.center_around(0.0, 0.0);
        engine.reset_mode(MapMode::Altimetry, ColorScheme::Color);
        engine
    }

    fn finish(engine: &mut ProjectionEngine<EquirectSurvey<Sampler>>) {
        while !engine.is_build_complete() {
            engine.advance_build();
        }
    }

    fn assert_restarted(engine: &ProjectionEngine<EquirectSurvey<Sampler>>) {
        assert_eq!(engine.build_state(), BuildState::Building { steps: 0 });
        assert!(!engine.is_build_complete());
    }

    #[test]
    fn new_engine_is_idle() {
        let engine = ProjectionEngine::new(EquirectSurvey::new(flat));
        assert_eq!(engine.build_state(), BuildState::Idle);
        assert!(engine.is_build_complete());
        assert_eq!(engine.generation(), 0);
        assert!(engine.anomalies().is_empty());
    }

    #[test]
    fn build_completes_in_bounded_steps() {
        let mut engine = configured(8, 4);
        assert_eq!(engine.build_state(), BuildState::Building { steps: 0 });
        assert_eq!(engine.advance_build(), BuildState::Building { steps: 1 });
        assert_eq!(engine.advance_build(), BuildState::Complete { steps: 2 });
        assert!(engine.is_build_complete());
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.background().pixel(7, 3), Some([10, 20, 30, 255]));

        // Further calls are no-ops.
        assert_eq!(engine.advance_build(), BuildState::Complete { steps: 2 });
        assert_eq!(engine.generation(), 1);
    }

    #[test]
    fn every_setter_restarts_the_build() {
        let mut engine = configured(4, 2);
        finish(&mut engine);

        engine.set_body(Body {
            id: BodyId(2),
            radius_km: 1.0,
        });
        assert_restarted(&engine);
        finish(&mut engine);

        engine.set_size(4, 2);
        assert_restarted(&engine);
        finish(&mut engine);

        engine.set_scale(2.0);
        assert_restarted(&engine);
        finish(&mut engine);

        engine.center_around(10.0, 5.0);
        assert_restarted(&engine);
        finish(&mut engine);

        engine.reset_mode(MapMode::Slope, ColorScheme::Grey);
        assert_restarted(&engine);
        finish(&mut engine);

        assert_eq!(engine.generation(), 6);
    }

    #[test]
    fn background_keeps_last_completed_raster_during_rebuild() {
        let mut engine = configured(4, 4);
        // Before completion the partial raster is presented.
        engine.advance_build();
        assert_eq!(engine.background().pixel(0, 0), Some([10, 20, 30, 255]));
        assert_eq!(engine.background().pixel(0, 3), Some([0, 0, 0, 0]));
        engine.advance_build();
        assert!(engine.is_build_complete());

        engine.reset_mode(MapMode::Biome, ColorScheme::Grey);
        // The provider cleared its raster, but the completed copy is kept.
        assert_eq!(engine.provider().raster().pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(engine.background().pixel(0, 3), Some([10, 20, 30, 255]));
        assert_eq!(engine.generation(), 1);
    }

    #[test]
    fn centered_point_projects_to_canvas_middle() {
        let engine = configured(360, 180);
        let p = engine.to_screen(0.0, 0.0);
        assert!((p.x - 180.0).abs() < 1e-9, "{p:?}");
        assert!((p.y - 90.0).abs() < 1e-9, "{p:?}");
        assert!((engine.horizontal_period() - 360.0).abs() < 1e-9);
    }
}
