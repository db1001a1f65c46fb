// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surveymap Overlay: markers and a distance scale over the minimap.
//!
//! - [`atlas_cell`] resolves an [`IconKey`] to a cell of the fixed 5×4 icon
//!   atlas. The table is a constant; kinds without an entry fall back to
//!   [`AtlasCell::DEFAULT`], so lookup never fails.
//! - [`IconOverlayRenderer`] draws every icon twice, a shadow copy offset by
//!   [`OverlayConfig::shadow_offset`] and then the icon in its color, in the
//!   order anomalies, target, own vessel, so the own vessel is never hidden.
//! - [`pixels_per_km`] and [`scale_bar_rect`] size the distance scale bar
//!   from a one-degree measurement on the current projection.
//!
//! Drawing goes through [`surveymap_imaging::ImagingBackend`], so any backend
//! (the CPU raster, or a recording one in tests) can be the target.
//!
//! ## Example
//!
//! ```rust
//! use surveymap_imaging::{ImageDesc, RasterBackend, ResourceBackend};
//! use surveymap_overlay::{IconOverlayRenderer, OverlayConfig, OverlayFrame};
//! use kurbo::Point;
//! use surveymap_projection::{BodyId, ScreenProjection, VesselKind, VesselMarker};
//!
//! struct Flat;
//! impl ScreenProjection for Flat {
//!     fn to_screen(&self, lon: f64, lat: f64) -> Point {
//!         Point::new(lon + 180.0, 90.0 - lat)
//!     }
//!     fn horizontal_period(&self) -> f64 {
//!         360.0
//!     }
//! }
//!
//! let mut backend = RasterBackend::new(360, 180);
//! let desc = ImageDesc { width: 10, height: 8 };
//! let atlas = backend.create_image(desc, &[255; 10 * 8 * 4]);
//! let renderer = IconOverlayRenderer::new(OverlayConfig::default(), atlas, desc);
//!
//! let vessel = VesselMarker {
//!     body: BodyId(1),
//!     longitude: 0.0,
//!     latitude: 0.0,
//!     kind: VesselKind::Ship,
//! };
//! let frame = OverlayFrame {
//!     body: BodyId(1),
//!     vessel: &vessel,
//!     target: None,
//! };
//! renderer.draw(&mut backend, &Flat, &frame);
//!
//! // The own vessel is drawn white over its shadow.
//! assert_eq!(backend.target().pixel(180, 90), Some([255, 255, 255, 255]));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod atlas;
mod renderer;
mod scale;

pub use atlas::{ATLAS_COLUMNS, ATLAS_ROWS, AtlasCell, CELL_SIZE, IconKey, atlas_cell};
pub use renderer::{IconOverlayRenderer, MarkerPalette, OverlayConfig, OverlayFrame};
pub use scale::{km_per_degree, pixels_per_degree, pixels_per_km, scale_bar_rect};
