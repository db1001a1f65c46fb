// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use hashbrown::HashMap;
use surveymap_imaging::Raster;

use crate::{
    AnomalyMarker, Body, BodyId, ColorScheme, MapMode, RasterGeometry, SurveyProvider, wrap,
};

/// Source of per-pixel surface colors for [`EquirectSurvey`].
///
/// Coordinates are in degrees, longitude in `[-180, 180)` and latitude in
/// `[-90, 90)`.
pub trait SurfaceSampler {
    /// RGBA8 color of the surface at `(lon, lat)` on `body`.
    fn sample(
        &self,
        body: BodyId,
        mode: MapMode,
        scheme: ColorScheme,
        lon: f64,
        lat: f64,
    ) -> [u8; 4];
}

impl<F> SurfaceSampler for F
where
    F: Fn(BodyId, MapMode, ColorScheme, f64, f64) -> [u8; 4],
{
    fn sample(
        &self,
        body: BodyId,
        mode: MapMode,
        scheme: ColorScheme,
        lon: f64,
        lat: f64,
    ) -> [u8; 4] {
        self(body, mode, scheme, lon, lat)
    }
}

/// A rectangular (plate carrée) survey provider.
///
/// Longitude and latitude map linearly to pixels, so the projection
/// primitives are the identity. The raster is filled top row first,
/// `rows_per_step` rows per [`advance_build`](SurveyProvider::advance_build).
#[derive(Clone, Debug)]
pub struct EquirectSurvey<S> {
    sampler: S,
    body: Option<BodyId>,
    mode: MapMode,
    scheme: ColorScheme,
    base_scale: f64,
    factor: f64,
    center: (f64, f64),
    geometry: RasterGeometry,
    raster: Raster,
    next_row: u32,
    rows_per_step: u32,
    anomalies: HashMap<BodyId, Vec<AnomalyMarker>>,
}

impl<S: SurfaceSampler> EquirectSurvey<S> {
    /// Default number of raster rows filled per build step.
    pub const DEFAULT_ROWS_PER_STEP: u32 = 4;

    /// Creates a survey drawing from `sampler`, with an empty raster.
    pub fn new(sampler: S) -> Self {
        Self {
            sampler,
            body: None,
            mode: MapMode::default(),
            scheme: ColorScheme::default(),
            base_scale: 1.0,
            factor: 1.0,
            center: (0.0, 0.0),
            geometry: RasterGeometry::default(),
            raster: Raster::new(0, 0),
            next_row: 0,
            rows_per_step: Self::DEFAULT_ROWS_PER_STEP,
            anomalies: HashMap::new(),
        }
    }

    /// Sets the number of rows filled per build step (at least one).
    #[must_use]
    pub fn with_rows_per_step(mut self, rows: u32) -> Self {
        self.rows_per_step = rows.max(1);
        self
    }

    /// Registers `anomalies` for `body`, replacing any previous list.
    #[must_use]
    pub fn with_anomalies(
        mut self,
        body: BodyId,
        anomalies: impl IntoIterator<Item = AnomalyMarker>,
    ) -> Self {
        self.anomalies
            .insert(body, anomalies.into_iter().collect());
        self
    }

    /// Adds one anomaly on `body`.
    pub fn add_anomaly(&mut self, body: BodyId, anomaly: AnomalyMarker) {
        self.anomalies.entry(body).or_default().push(anomaly);
    }

    /// Current map mode and color scheme.
    pub fn mode(&self) -> (MapMode, ColorScheme) {
        (self.mode, self.scheme)
    }

    /// Number of rows already filled in the current build.
    pub fn rows_done(&self) -> u32 {
        self.next_row
    }

    fn restart(&mut self) {
        self.next_row = 0;
    }

    fn recenter(&mut self) {
        let (lon, lat) = self.center;
        let g = &mut self.geometry;
        g.lon_offset = 180.0 + lon - g.lon_span() / 2.0;
        g.lat_offset = 90.0 + lat - g.lat_span() / 2.0;
    }

    fn rescale(&mut self) {
        self.geometry.scale = self.base_scale * self.factor;
        self.recenter();
    }

    /// Surface coordinates of the center of raster pixel `(x, y)`.
    fn pixel_center(&self, x: u32, y: u32) -> (f64, f64) {
        let g = &self.geometry;
        let lon = (f64::from(x) + 0.5) / g.scale + g.lon_offset - 180.0;
        let lat = (f64::from(g.height) - f64::from(y) - 0.5) / g.scale + g.lat_offset - 90.0;
        (
            wrap(lon + 180.0, 360.0) - 180.0,
            wrap(lat + 90.0, 180.0) - 90.0,
        )
    }
}

impl<S: SurfaceSampler> SurveyProvider for EquirectSurvey<S> {
    fn set_body(&mut self, body: &Body) {
        self.body = Some(body.id);
        self.restart();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if (width, height) != (self.raster.width(), self.raster.height()) {
            self.raster = Raster::new(width, height);
        }
        self.geometry.width = width;
        self.geometry.height = height;
        self.base_scale = if width > 0 {
            f64::from(width) / 360.0
        } else {
            1.0
        };
        self.rescale();
        self.restart();
    }

    fn set_scale(&mut self, factor: f64) {
        self.factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            1.0
        };
        self.rescale();
        self.restart();
    }

    fn center_around(&mut self, lon: f64, lat: f64) {
        self.center = (lon, lat);
        self.recenter();
        self.restart();
    }

    fn reset_mode(&mut self, mode: MapMode, scheme: ColorScheme) {
        self.mode = mode;
        self.scheme = scheme;
        self.raster.fill([0, 0, 0, 0]);
        self.restart();
    }

    fn is_build_complete(&self) -> bool {
        self.next_row >= self.raster.height()
    }

    fn advance_build(&mut self) {
        let end = self
            .next_row
            .saturating_add(self.rows_per_step)
            .min(self.raster.height());
        let Some(body) = self.body else {
            self.next_row = end;
            return;
        };
        for y in self.next_row..end {
            for x in 0..self.raster.width() {
                let (lon, lat) = self.pixel_center(x, y);
                let rgba = self.sampler.sample(body, self.mode, self.scheme, lon, lat);
                self.raster.set_pixel(x, y, rgba);
            }
        }
        self.next_row = end;
    }

    fn project_longitude(&self, lon: f64, _lat: f64) -> f64 {
        lon
    }

    fn project_latitude(&self, _lon: f64, lat: f64) -> f64 {
        lat
    }

    fn geometry(&self) -> RasterGeometry {
        self.geometry
    }

    fn raster(&self) -> &Raster {
        &self.raster
    }

    fn anomalies(&self, body: BodyId) -> Vec<AnomalyMarker> {
        self.anomalies.get(&body).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn hemispheres(_: BodyId, _: MapMode, _: ColorScheme, lon: f64, lat: f64) -> [u8; 4] {
        let r = if lon >= 0.0 { 255 } else { 0 };
        let g = if lat >= 0.0 { 255 } else { 0 };
        [r, g, 0, 255]
    }

    type Sampler = fn(BodyId, MapMode, ColorScheme, f64, f64) -> [u8; 4];

    fn whole_world(width: u32, height: u32) -> EquirectSurvey<Sampler> {
        let mut survey = EquirectSurvey::new(hemispheres as Sampler);
        survey.set_body(&Body {
            id: BodyId(4),
            radius_km: 200.0,
        });
        survey.set_size(width, height);
        survey.set_scale(1.0);
        survey.center_around(0.0, 0.0);
        survey
    }

    #[test]
    fn size_sets_whole_world_scale() {
        let survey = whole_world(720, 360);
        let g = survey.geometry();
        assert!((g.scale - 2.0).abs() < 1e-12);
        assert!((g.lon_span() - 360.0).abs() < 1e-9);
        assert!((g.lat_span() - 180.0).abs() < 1e-9);
        assert!(g.lon_offset.abs() < 1e-9);
        assert!(g.lat_offset.abs() < 1e-9);
    }

    #[test]
    fn zoom_narrows_the_span_around_the_center() {
        let mut survey = whole_world(360, 180);
        survey.set_scale(4.0);
        survey.center_around(30.0, -10.0);
        let g = survey.geometry();
        assert!((g.lon_span() - 90.0).abs() < 1e-9);
        assert!((g.lat_span() - 45.0).abs() < 1e-9);
        // The left edge sits half a span west of the center.
        assert!((g.lon_offset - (180.0 + 30.0 - 45.0)).abs() < 1e-9);
        assert!((g.lat_offset - (90.0 - 10.0 - 22.5)).abs() < 1e-9);
    }

    #[test]
    fn center_survives_size_and_scale_changes() {
        let mut survey = whole_world(360, 180);
        survey.center_around(100.0, 20.0);
        survey.set_size(720, 360);
        survey.set_scale(2.0);
        let g = survey.geometry();
        assert!((g.lon_offset - (180.0 + 100.0 - 90.0)).abs() < 1e-9);
        assert!((g.lat_offset - (90.0 + 20.0 - 45.0)).abs() < 1e-9);
    }

    #[test]
    fn build_fills_rows_top_first() {
        let mut survey = whole_world(8, 4).with_rows_per_step(3);
        assert!(!survey.is_build_complete());
        survey.advance_build();
        assert_eq!(survey.rows_done(), 3);
        assert_eq!(survey.raster().pixel(0, 3), Some([0, 0, 0, 0]));
        survey.advance_build();
        assert_eq!(survey.rows_done(), 4);
        assert!(survey.is_build_complete());

        // North-east is top-right, south-west is bottom-left.
        assert_eq!(survey.raster().pixel(7, 0), Some([255, 255, 0, 255]));
        assert_eq!(survey.raster().pixel(0, 3), Some([0, 0, 0, 255]));
    }

    #[test]
    fn reset_mode_clears_and_restarts() {
        let mut survey = whole_world(4, 2);
        while !survey.is_build_complete() {
            survey.advance_build();
        }
        survey.reset_mode(MapMode::Slope, ColorScheme::Grey);
        assert_eq!(survey.mode(), (MapMode::Slope, ColorScheme::Grey));
        assert!(!survey.is_build_complete());
        assert_eq!(survey.raster().pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn samples_wrap_across_the_seam() {
        let seen = core::cell::RefCell::new(Vec::new());
        let sampler = |_: BodyId, _: MapMode, _: ColorScheme, lon: f64, lat: f64| -> [u8; 4] {
            seen.borrow_mut().push((lon, lat));
            [0, 0, 0, 255]
        };
        let mut survey = EquirectSurvey::new(sampler);
        survey.set_body(&Body {
            id: BodyId(1),
            radius_km: 1.0,
        });
        survey.set_size(36, 18);
        survey.set_scale(2.0);
        survey.center_around(179.0, 89.0);
        while !survey.is_build_complete() {
            survey.advance_build();
        }
        let seen = seen.borrow();
        assert_eq!(seen.len(), 36 * 18);
        for &(lon, lat) in seen.iter() {
            assert!((-180.0..180.0).contains(&lon), "lon {lon}");
            assert!((-90.0..90.0).contains(&lat), "lat {lat}");
        }
    }

    #[test]
    fn anomalies_are_per_body() {
        let marker = AnomalyMarker {
            longitude: 1.0,
            latitude: 2.0,
            known: true,
            detailed: false,
        };
        let mut survey = whole_world(4, 2).with_anomalies(BodyId(4), [marker]);
        survey.add_anomaly(BodyId(5), marker);
        survey.add_anomaly(BodyId(5), marker);
        assert_eq!(survey.anomalies(BodyId(4)), vec![marker]);
        assert_eq!(survey.anomalies(BodyId(5)).len(), 2);
        assert!(survey.anomalies(BodyId(6)).is_empty());
    }

    #[test]
    fn degenerate_parameters_are_ignored() {
        let mut survey = whole_world(360, 180);
        survey.set_scale(0.0);
        assert!((survey.geometry().scale - 1.0).abs() < 1e-12);
        survey.set_scale(f64::NAN);
        assert!((survey.geometry().scale - 1.0).abs() < 1e-12);

        survey.set_size(0, 0);
        assert!(survey.is_build_complete());
        survey.advance_build();
        assert!(survey.geometry().lon_offset.is_finite());
    }
}
