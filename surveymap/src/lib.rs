// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surveymap: a cockpit minimap of a surveyed planetary surface.
//!
//! [`MinimapMonitor`] ties the pieces together for one display:
//! - a [`ProjectionEngine`](surveymap_projection::ProjectionEngine) building
//!   the background raster a step at a time,
//! - a [`ViewportController`](surveymap_viewport::ViewportController) holding
//!   zoom, mode and color scheme, persisted per display instance,
//! - an [`IconOverlayRenderer`](surveymap_overlay::IconOverlayRenderer)
//!   drawing anomalies, vessels and the scale bar on top.
//!
//! The host drives it from three entry points: [`MinimapMonitor::render`]
//! every frame, [`MinimapMonitor::tick`] from its update loop, and
//! [`MinimapMonitor::on_button`] for key presses mapped through
//! [`ButtonMap`]. Static settings come from [`MinimapConfig`], which can be
//! loaded from RON.
//!
//! ## Example
//!
//! ```rust
//! use surveymap::{FlightState, MinimapConfig, MinimapMonitor, TickOutcome};
//! use surveymap_imaging::{Raster, RasterBackend};
//! use surveymap_persist::MemoryStore;
//! use surveymap_projection::{
//!     Body, BodyId, ColorScheme, EquirectSurvey, MapMode, VesselKind, VesselMarker,
//! };
//!
//! let sampler = |_: BodyId, _: MapMode, _: ColorScheme, _: f64, _: f64| -> [u8; 4] {
//!     [30, 90, 30, 255]
//! };
//! let mut monitor = MinimapMonitor::new(
//!     MinimapConfig::default(),
//!     EquirectSurvey::new(sampler),
//!     MemoryStore::new(),
//!     1,
//!     Raster::filled(50, 40, [255, 255, 255, 255]),
//! );
//!
//! let body = Body { id: BodyId(1), radius_km: 600.0 };
//! let flight = FlightState {
//!     body,
//!     vessel: VesselMarker {
//!         body: body.id,
//!         longitude: 10.0,
//!         latitude: -5.0,
//!         kind: VesselKind::Ship,
//!     },
//!     target: None,
//!     active: true,
//! };
//!
//! let mut screen = RasterBackend::new(64, 32);
//! // The first frame only sets things up.
//! assert!(!monitor.render(&mut screen, &flight));
//!
//! while !monitor.engine().is_build_complete() {
//!     assert_ne!(monitor.tick(&flight), TickOutcome::Skipped);
//! }
//! assert!(monitor.render(&mut screen, &flight));
//! assert_eq!(screen.target().pixel(0, 0), Some([30, 90, 30, 255]));
//!
//! // Zoom in; the rebuild starts with the next frame.
//! monitor.on_button(1);
//! monitor.render(&mut screen, &flight);
//! assert_eq!(monitor.viewport().state().unwrap().zoom, 2);
//! ```

mod buttons;
mod config;
mod countdown;
mod monitor;

pub use buttons::{ButtonAction, ButtonMap};
pub use config::{ColorConfig, ConfigError, MinimapConfig};
pub use countdown::RefreshCountdown;
pub use monitor::{FlightState, MinimapMonitor, TickOutcome};
