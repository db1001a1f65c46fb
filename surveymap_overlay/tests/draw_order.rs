// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw sequences emitted by `IconOverlayRenderer`, recorded with `RefBackend`.

use kurbo::{Point, Vec2};
use peniko::Color;
use surveymap_imaging::{DrawOp, ImageDesc, RasterBackend, RectF, ResourceBackend};
use surveymap_imaging_ref::RefBackend;
use surveymap_overlay::{AtlasCell, IconOverlayRenderer, MarkerPalette, OverlayConfig, OverlayFrame};
use surveymap_projection::{AnomalyMarker, BodyId, ScreenProjection, VesselKind, VesselMarker};

/// One pixel per degree, origin at (-180, 90).
struct Flat;

impl ScreenProjection for Flat {
    fn to_screen(&self, lon: f64, lat: f64) -> Point {
        Point::new(lon + 180.0, 90.0 - lat)
    }

    fn horizontal_period(&self) -> f64 {
        360.0
    }
}

const ATLAS: ImageDesc = ImageDesc {
    width: 100,
    height: 100,
};

fn renderer(backend: &mut RefBackend) -> IconOverlayRenderer {
    let atlas = backend.create_image(ATLAS, &[]);
    IconOverlayRenderer::new(OverlayConfig::default(), atlas, ATLAS)
}

fn vessel(body: u32, lon: f64, lat: f64, kind: VesselKind) -> VesselMarker {
    VesselMarker {
        body: BodyId(body),
        longitude: lon,
        latitude: lat,
        kind,
    }
}

fn anomaly(lon: f64, lat: f64, known: bool, detailed: bool) -> AnomalyMarker {
    AnomalyMarker {
        longitude: lon,
        latitude: lat,
        known,
        detailed,
    }
}

/// Paint and destination of every icon draw, in order.
fn icon_draws(backend: &RefBackend) -> Vec<(Color, RectF, Option<RectF>)> {
    backend
        .draws()
        .into_iter()
        .filter_map(|(op, paint)| match op {
            DrawOp::DrawImageRect { src, dst, .. } => Some((paint?, dst, src)),
            _ => None,
        })
        .collect()
}

#[test]
fn anomalies_then_target_then_self_each_over_a_shadow() {
    let mut backend = RefBackend::with_size(360, 180);
    let mut overlay = renderer(&mut backend);
    overlay.set_anomalies(vec![
        anomaly(10.0, 0.0, true, true),
        anomaly(20.0, 0.0, true, false),
        anomaly(30.0, 0.0, false, false),
    ]);
    let me = vessel(1, 0.0, 0.0, VesselKind::Ship);
    let target = vessel(1, -10.0, 5.0, VesselKind::Station);
    overlay.draw(
        &mut backend,
        &Flat,
        &OverlayFrame {
            body: BodyId(1),
            vessel: &me,
            target: Some(&target),
        },
    );

    let palette = MarkerPalette::default();
    let draws = icon_draws(&backend);
    let colors: Vec<Color> = draws.iter().map(|d| d.0).collect();
    assert_eq!(
        colors,
        vec![
            palette.shadow,
            palette.visited_anomaly,
            palette.shadow,
            palette.unvisited_anomaly,
            palette.shadow,
            palette.target,
            palette.shadow,
            palette.self_vessel,
        ]
    );

    // Shadows sit one pixel down and right of their icon.
    for pair in draws.chunks(2) {
        let (shadow, icon) = (pair[0].1, pair[1].1);
        assert_eq!(shadow.x0, icon.x0 + 1.0);
        assert_eq!(shadow.y0, icon.y0 + 1.0);
        assert_eq!(pair[0].2, pair[1].2);
    }

    // The own vessel is the last thing drawn before the scale bar, centered.
    let (_, dst, src) = draws[7];
    assert_eq!(dst, RectF::new(176.0, 86.0, 184.0, 94.0));
    assert_eq!(src, Some(AtlasCell::new(0, 3).source_rect(ATLAS)));
    // Target uses the station cell.
    assert_eq!(draws[5].2, Some(AtlasCell::new(3, 1).source_rect(ATLAS)));
    // Visited anomaly uses the default cell, unvisited the unknown cell.
    assert_eq!(draws[1].2, Some(AtlasCell::DEFAULT.source_rect(ATLAS)));
    assert_eq!(draws[3].2, Some(AtlasCell::new(3, 3).source_rect(ATLAS)));
}

#[test]
fn target_on_another_body_is_skipped() {
    let mut backend = RefBackend::with_size(360, 180);
    let overlay = renderer(&mut backend);
    let me = vessel(1, 0.0, 0.0, VesselKind::Probe);
    let target = vessel(2, 0.0, 0.0, VesselKind::Ship);
    overlay.draw(
        &mut backend,
        &Flat,
        &OverlayFrame {
            body: BodyId(1),
            vessel: &me,
            target: Some(&target),
        },
    );
    let draws = icon_draws(&backend);
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[1].0, MarkerPalette::default().self_vessel);
}

#[test]
fn scale_bar_is_filled_when_no_image_is_configured() {
    let mut backend = RefBackend::with_size(200, 100);
    let mut overlay = renderer(&mut backend);
    let me = vessel(1, 0.0, 0.0, VesselKind::Rover);
    let frame = OverlayFrame {
        body: BodyId(1),
        vessel: &me,
        target: None,
    };

    // No scale measured yet: no bar.
    overlay.draw(&mut backend, &Flat, &frame);
    assert!(
        !backend
            .draws()
            .iter()
            .any(|(op, _)| matches!(op, DrawOp::FillRect(_)))
    );
    backend.clear_events();

    // 600 km body, one pixel per degree.
    overlay.measure_scale(&Flat, 600.0, 0.0, 0.0);
    let ppk = overlay.pixels_per_km();
    assert!((ppk - 1.0 / 10.471_975_5).abs() < 1e-6);
    overlay.draw(&mut backend, &Flat, &frame);
    let (last, paint) = backend.draws().pop().unwrap();
    assert_eq!(paint, Some(MarkerPalette::default().scale_bar));
    let DrawOp::FillRect(bar) = last else {
        panic!("expected a filled scale bar, got {last:?}");
    };
    assert_eq!(bar.x0, 20.0);
    assert_eq!(bar.y0, 80.0);
    assert_eq!(bar.y1, 90.0);
    assert!((f64::from(bar.width()) - 20.0 * ppk).abs() < 1e-4);
}

#[test]
fn scale_bar_image_is_tinted() {
    let mut backend = RefBackend::with_size(200, 100);
    let bar_desc = ImageDesc {
        width: 4,
        height: 1,
    };
    let bar_image = backend.create_image(bar_desc, &[]);
    let mut overlay = renderer(&mut backend).with_scale_bar_image(bar_image);
    overlay.measure_scale(&Flat, 600.0, 0.0, 0.0);
    let me = vessel(1, 0.0, 0.0, VesselKind::Rover);
    overlay.draw(
        &mut backend,
        &Flat,
        &OverlayFrame {
            body: BodyId(1),
            vessel: &me,
            target: None,
        },
    );
    let (last, paint) = backend.draws().pop().unwrap();
    assert_eq!(paint, Some(Color::WHITE));
    assert!(matches!(
        last,
        DrawOp::DrawImageRect {
            image,
            src: None,
            ..
        } if image == bar_image
    ));
}

#[test]
fn icons_rasterize_in_their_colors() {
    let mut backend = RasterBackend::new(360, 180);
    let desc = ImageDesc {
        width: 5,
        height: 5,
    };
    let atlas = backend.create_image(desc, &[255; 5 * 5 * 4]);
    let config = OverlayConfig {
        shadow_offset: Vec2::new(2.0, 2.0),
        ..OverlayConfig::default()
    };
    let mut overlay = IconOverlayRenderer::new(config, atlas, desc);
    overlay.set_anomalies(vec![anomaly(-90.0, 45.0, true, false)]);
    let me = vessel(1, 90.0, -45.0, VesselKind::Lander);
    overlay.draw(
        &mut backend,
        &Flat,
        &OverlayFrame {
            body: BodyId(1),
            vessel: &me,
            target: None,
        },
    );

    let target = backend.target();
    // Anomaly at (90, 45), vessel at (270, 135).
    assert_eq!(target.pixel(90, 45), Some([255, 0, 0, 255]));
    assert_eq!(target.pixel(270, 135), Some([255, 255, 255, 255]));
    // Bottom-right corner of the vessel shows its shadow.
    assert_eq!(target.pixel(275, 140), Some([0, 0, 0, 255]));
    assert_eq!(target.pixel(0, 0), Some([0, 0, 0, 0]));
}
