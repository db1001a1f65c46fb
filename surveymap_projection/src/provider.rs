// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;

use surveymap_imaging::Raster;

use crate::{AnomalyMarker, Body, BodyId, ColorScheme, MapMode, RasterGeometry};

/// Produces the background raster and the provider-specific projection.
///
/// Every setter invalidates the raster build; the engine then calls
/// [`advance_build`](Self::advance_build) until
/// [`is_build_complete`](Self::is_build_complete) reports `true`. Setters are
/// cheap and never build synchronously.
pub trait SurveyProvider {
    /// Selects the body to map.
    fn set_body(&mut self, body: &Body);

    /// Sets the raster size in pixels.
    fn set_size(&mut self, width: u32, height: u32);

    /// Sets the magnification relative to the whole-world fit.
    fn set_scale(&mut self, factor: f64);

    /// Centers the raster on `(lon, lat)` in degrees.
    fn center_around(&mut self, lon: f64, lat: f64);

    /// Switches the surveyed quantity and palette, clearing the raster.
    fn reset_mode(&mut self, mode: MapMode, scheme: ColorScheme);

    /// Returns `true` once the raster reflects the current parameters.
    fn is_build_complete(&self) -> bool;

    /// Performs one bounded unit of raster work.
    fn advance_build(&mut self);

    /// Maps a longitude into the provider's projected longitude.
    fn project_longitude(&self, lon: f64, lat: f64) -> f64;

    /// Maps a latitude into the provider's projected latitude.
    fn project_latitude(&self, lon: f64, lat: f64) -> f64;

    /// Current raster layout.
    fn geometry(&self) -> RasterGeometry;

    /// The raster in its current, possibly partial, state.
    fn raster(&self) -> &Raster;

    /// Anomalies on `body`, in no particular order.
    fn anomalies(&self, body: BodyId) -> Vec<AnomalyMarker>;
}

impl<P: SurveyProvider + ?Sized> SurveyProvider for Box<P> {
    fn set_body(&mut self, body: &Body) {
        (**self).set_body(body);
    }

    fn set_size(&mut self, width: u32, height: u32) {
        (**self).set_size(width, height);
    }

    fn set_scale(&mut self, factor: f64) {
        (**self).set_scale(factor);
    }

    fn center_around(&mut self, lon: f64, lat: f64) {
        (**self).center_around(lon, lat);
    }

    fn reset_mode(&mut self, mode: MapMode, scheme: ColorScheme) {
        (**self).reset_mode(mode, scheme);
    }

    fn is_build_complete(&self) -> bool {
        (**self).is_build_complete()
    }

    fn advance_build(&mut self) {
        (**self).advance_build();
    }

    fn project_longitude(&self, lon: f64, lat: f64) -> f64 {
        (**self).project_longitude(lon, lat)
    }

    fn project_latitude(&self, lon: f64, lat: f64) -> f64 {
        (**self).project_latitude(lon, lat)
    }

    fn geometry(&self) -> RasterGeometry {
        (**self).geometry()
    }

    fn raster(&self) -> &Raster {
        (**self).raster()
    }

    fn anomalies(&self, body: BodyId) -> Vec<AnomalyMarker> {
        (**self).anomalies(body)
    }
}
