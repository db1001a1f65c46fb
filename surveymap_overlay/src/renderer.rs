// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use surveymap_imaging::{DrawOp, ImageDesc, ImageId, ImagingBackend, ImagingBackendExt, RectF};
use surveymap_projection::{AnomalyMarker, BodyId, ScreenProjection, VesselMarker};

use crate::{IconKey, atlas_cell, pixels_per_km, scale_bar_rect};

/// Colors of the overlay elements.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarkerPalette {
    /// The vessel the display is mounted on.
    pub self_vessel: Color,
    /// The tracked target.
    pub target: Color,
    /// Known anomalies not yet visited.
    pub unvisited_anomaly: Color,
    /// Visited anomalies.
    pub visited_anomaly: Color,
    /// Drop shadow under every icon.
    pub shadow: Color,
    /// Distance scale bar.
    pub scale_bar: Color,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self {
            self_vessel: Color::WHITE,
            target: Color::from_rgba8(255, 235, 4, 255),
            unvisited_anomaly: Color::from_rgba8(255, 0, 0, 255),
            visited_anomaly: Color::from_rgba8(0, 255, 0, 255),
            shadow: Color::BLACK,
            scale_bar: Color::WHITE,
        }
    }
}

/// Static overlay layout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Side of an icon square in pixels.
    pub icon_size: f64,
    /// Offset of the drop shadow from its icon, in pixels.
    pub shadow_offset: Vec2,
    /// Marker colors.
    pub palette: MarkerPalette,
    /// Distance the scale bar represents, in kilometers.
    pub scale_reference_km: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            icon_size: 8.0,
            shadow_offset: Vec2::new(1.0, 1.0),
            palette: MarkerPalette::default(),
            scale_reference_km: 20.0,
        }
    }
}

/// Per-frame vessel positions.
#[derive(Copy, Clone, Debug)]
pub struct OverlayFrame<'a> {
    /// Body the map currently shows.
    pub body: BodyId,
    /// The vessel the display is mounted on.
    pub vessel: &'a VesselMarker,
    /// The tracked target, if any. Skipped unless it is on `body`.
    pub target: Option<&'a VesselMarker>,
}

/// Draws markers and the scale bar over the background.
///
/// Anomalies and the distance scale change only on a redraw and are cached
/// here between redraws; vessel positions are passed in every frame.
#[derive(Clone, Debug)]
pub struct IconOverlayRenderer {
    config: OverlayConfig,
    atlas: ImageId,
    atlas_desc: ImageDesc,
    scale_bar_image: Option<ImageId>,
    anomalies: Vec<AnomalyMarker>,
    pixels_per_km: f64,
}

impl IconOverlayRenderer {
    /// Creates a renderer sampling icons from the uploaded `atlas`.
    pub fn new(config: OverlayConfig, atlas: ImageId, atlas_desc: ImageDesc) -> Self {
        Self {
            config,
            atlas,
            atlas_desc,
            scale_bar_image: None,
            anomalies: Vec::new(),
            pixels_per_km: 0.0,
        }
    }

    /// Draws the scale bar from `image`, tinted, instead of a filled rectangle.
    #[must_use]
    pub fn with_scale_bar_image(mut self, image: ImageId) -> Self {
        self.scale_bar_image = Some(image);
        self
    }

    /// Static layout.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The uploaded atlas image.
    pub fn atlas(&self) -> ImageId {
        self.atlas
    }

    /// Replaces the cached anomaly list.
    pub fn set_anomalies(&mut self, anomalies: Vec<AnomalyMarker>) {
        self.anomalies = anomalies;
    }

    /// Cached anomalies.
    pub fn anomalies(&self) -> &[AnomalyMarker] {
        &self.anomalies
    }

    /// Current distance scale.
    pub fn pixels_per_km(&self) -> f64 {
        self.pixels_per_km
    }

    /// Re-measures the distance scale at `(lon, lat)` on a body of
    /// `radius_km`.
    pub fn measure_scale(
        &mut self,
        projection: &impl ScreenProjection,
        radius_km: f64,
        lon: f64,
        lat: f64,
    ) {
        self.pixels_per_km = pixels_per_km(projection, radius_km, lon, lat);
    }

    /// Destination square of an icon centered on `center`.
    pub fn icon_rect(&self, center: Point) -> Rect {
        let side = self.config.icon_size;
        Rect::from_center_size(center, Size::new(side, side))
    }

    /// Draws known anomalies, the target, the vessel, and the scale bar, in
    /// that order.
    pub fn draw<B: ImagingBackend>(
        &self,
        backend: &mut B,
        projection: &impl ScreenProjection,
        frame: &OverlayFrame<'_>,
    ) {
        let palette = self.config.palette;
        for anomaly in self.anomalies.iter().filter(|a| a.known) {
            let color = if anomaly.detailed {
                palette.visited_anomaly
            } else {
                palette.unvisited_anomaly
            };
            let at = projection.to_screen(anomaly.longitude, anomaly.latitude);
            self.draw_icon(
                backend,
                IconKey::Anomaly {
                    detailed: anomaly.detailed,
                },
                at,
                color,
            );
        }

        if let Some(target) = frame.target.filter(|t| t.body == frame.body) {
            let at = projection.to_screen(target.longitude, target.latitude);
            self.draw_icon(backend, IconKey::Vessel(target.kind), at, palette.target);
        }

        let vessel = frame.vessel;
        let at = projection.to_screen(vessel.longitude, vessel.latitude);
        self.draw_icon(backend, IconKey::Vessel(vessel.kind), at, palette.self_vessel);

        self.draw_scale_bar(backend);
    }

    fn draw_icon<B: ImagingBackend>(
        &self,
        backend: &mut B,
        key: IconKey,
        at: Point,
        color: Color,
    ) {
        let src = atlas_cell(key).source_rect(self.atlas_desc);
        let dst = self.icon_rect(at);
        let shadow = dst + self.config.shadow_offset;
        for (rect, paint) in [(shadow, self.config.palette.shadow), (dst, color)] {
            backend.with_paint(paint, |b| {
                b.draw(DrawOp::DrawImageRect {
                    image: self.atlas,
                    src: Some(src),
                    dst: RectF::from_kurbo(rect),
                });
            });
        }
    }

    fn draw_scale_bar<B: ImagingBackend>(&self, backend: &mut B) {
        let (width, height) = backend.target_size();
        let Some(bar) = scale_bar_rect(
            f64::from(width),
            f64::from(height),
            self.config.scale_reference_km,
            self.pixels_per_km,
        ) else {
            return;
        };
        let dst = RectF::from_kurbo(bar);
        let op = match self.scale_bar_image {
            Some(image) => DrawOp::DrawImageRect {
                image,
                src: None,
                dst,
            },
            None => DrawOp::FillRect(dst),
        };
        backend.with_paint(self.config.palette.scale_bar, |b| b.draw(op));
    }
}
