// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surveymap Projection: surface coordinates to display pixels.
//!
//! This crate owns the geometric half of the minimap:
//! - The data model shared with survey providers: [`Body`], [`MapMode`],
//!   [`ColorScheme`], [`AnomalyMarker`], [`VesselMarker`].
//! - [`wrap`] and the longitude/latitude → pixel transform
//!   ([`RasterGeometry`], [`ScreenProjection`]).
//! - [`SurveyProvider`], the seam to whatever produces the surface raster.
//! - [`ProjectionEngine`], which drives a provider through parameter changes
//!   and an incremental, restartable raster build ([`BuildState`]).
//! - [`EquirectSurvey`], a rectangular-projection provider that fills its
//!   raster a few rows per step from a [`SurfaceSampler`].
//!
//! It does **not** decide *when* to rebuild; that is the viewport
//! controller's job.
//!
//! ## Minimal example
//!
//! ```rust
//! use surveymap_projection::{
//!     Body, BodyId, ColorScheme, EquirectSurvey, MapMode, ProjectionEngine, ScreenProjection,
//! };
//!
//! let sampler = |_: BodyId, _: MapMode, _: ColorScheme, _lon: f64, lat: f64| -> [u8; 4] {
//!     if lat > 0.0 { [200, 200, 200, 255] } else { [40, 40, 40, 255] }
//! };
//! let mut engine = ProjectionEngine::new(EquirectSurvey::new(sampler));
//!
//! engine.set_body(Body { id: BodyId(1), radius_km: 600.0 });
//! engine.set_size(360, 180);
//! engine.set_scale(1.0);
//! engine.center_around(0.0, 0.0);
//! engine.reset_mode(MapMode::Altimetry, ColorScheme::Color);
//!
//! while !engine.is_build_complete() {
//!     engine.advance_build();
//! }
//!
//! // The center of the view lands in the middle of the canvas.
//! let p = engine.to_screen(0.0, 0.0);
//! assert!((p.x - 180.0).abs() < 1e-9);
//! assert!((p.y - 90.0).abs() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod engine;
mod equirect;
mod geometry;
mod provider;

pub use engine::{BuildState, ProjectionEngine};
pub use equirect::{EquirectSurvey, SurfaceSampler};
pub use geometry::{RasterGeometry, ScreenProjection, wrap};
pub use provider::SurveyProvider;

/// Identifier of a celestial body, stable for the process lifetime.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// The body the map is drawn for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
    /// Body identifier.
    pub id: BodyId,
    /// Mean radius in kilometers; used for the distance scale.
    pub radius_km: f64,
}

/// Which surveyed quantity the background raster shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MapMode {
    /// Terrain height.
    #[default]
    Altimetry,
    /// Terrain slope.
    Slope,
    /// Biome boundaries.
    Biome,
}

impl MapMode {
    /// All modes in cycling order.
    pub const ALL: [Self; 3] = [Self::Altimetry, Self::Slope, Self::Biome];

    /// Index in `0..3`, as persisted.
    #[inline]
    pub const fn index(self) -> i32 {
        match self {
            Self::Altimetry => 0,
            Self::Slope => 1,
            Self::Biome => 2,
        }
    }

    /// Mode for `index`, wrapping any integer into `0..3`.
    #[inline]
    pub const fn from_index(index: i32) -> Self {
        match index.rem_euclid(3) {
            0 => Self::Altimetry,
            1 => Self::Slope,
            _ => Self::Biome,
        }
    }

    /// The next mode forward or backward, wrapping at both ends.
    #[inline]
    pub const fn cycled(self, forward: bool) -> Self {
        Self::from_index(self.index() + if forward { 1 } else { -1 })
    }
}

/// Palette the background raster is drawn in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    /// Full color.
    #[default]
    Color,
    /// Greyscale.
    Grey,
}

impl ColorScheme {
    /// Index `0` or `1`, as persisted.
    #[inline]
    pub const fn index(self) -> i32 {
        match self {
            Self::Color => 0,
            Self::Grey => 1,
        }
    }

    /// Scheme for a persisted value; anything non-zero is greyscale.
    #[inline]
    pub const fn from_index(index: i32) -> Self {
        if index == 0 { Self::Color } else { Self::Grey }
    }

    /// The other scheme.
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Color => Self::Grey,
            Self::Grey => Self::Color,
        }
    }
}

/// A fixed point of interest on a body's surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnomalyMarker {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Whether the anomaly has been detected at all.
    pub known: bool,
    /// Whether the anomaly has been visited and identified.
    pub detailed: bool,
}

/// Category of a vessel, selecting its icon.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VesselKind {
    /// Surface base.
    Base,
    /// Debris.
    Debris,
    /// Crew member on extra-vehicular activity.
    Eva,
    /// Planted flag.
    Flag,
    /// Lander.
    Lander,
    /// Uncrewed probe.
    Probe,
    /// Rover.
    Rover,
    /// Crewed ship.
    Ship,
    /// Orbital station.
    Station,
    /// Unclassified vessel.
    Unknown,
    /// Aircraft.
    Plane,
    /// Communications relay.
    Relay,
    /// Asteroid or comet.
    SpaceObject,
    /// Host category with no dedicated icon.
    Other(u32),
}

/// A vessel position on a body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VesselMarker {
    /// Body the vessel is on or orbiting.
    pub body: BodyId,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Vessel category.
    pub kind: VesselKind,
}
