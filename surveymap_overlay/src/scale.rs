// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::PI;

use kurbo::Rect;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`
use surveymap_projection::ScreenProjection;

/// Kilometers along the equator per degree of longitude on a body of
/// `radius_km`. Zero for a non-positive or non-finite radius.
pub fn km_per_degree(radius_km: f64) -> f64 {
    if radius_km.is_finite() && radius_km > 0.0 {
        2.0 * PI * radius_km / 360.0
    } else {
        0.0
    }
}

/// Horizontal pixels covered by one degree of longitude at `(lon, lat)`.
///
/// Steps one degree east, or west when that would pass 360. A step that
/// crosses the canvas seam is folded back using the projection's period.
pub fn pixels_per_degree(projection: &impl ScreenProjection, lon: f64, lat: f64) -> f64 {
    let other = if lon + 1.0 > 360.0 { lon - 1.0 } else { lon + 1.0 };
    let a = projection.to_screen(lon, lat);
    let b = projection.to_screen(other, lat);
    let delta = (b.x - a.x).abs();
    let period = projection.horizontal_period();
    if period > 0.0 && delta > period / 2.0 {
        period - delta
    } else {
        delta
    }
}

/// Display pixels per kilometer, measured one degree from `(lon, lat)`.
///
/// Zero when the body radius gives no usable distance.
pub fn pixels_per_km(
    projection: &impl ScreenProjection,
    radius_km: f64,
    lon: f64,
    lat: f64,
) -> f64 {
    let km = km_per_degree(radius_km);
    if km > 0.0 {
        pixels_per_degree(projection, lon, lat) / km
    } else {
        0.0
    }
}

/// Screen rectangle of a scale bar `reference_km` long on a canvas of
/// `canvas_width` x `canvas_height` pixels.
///
/// The bar starts at 10% of the width, 80% of the height, and is 10% of the
/// height tall. Returns `None` if it would have no width.
pub fn scale_bar_rect(
    canvas_width: f64,
    canvas_height: f64,
    reference_km: f64,
    pixels_per_km: f64,
) -> Option<Rect> {
    let width = reference_km * pixels_per_km;
    if !(width.is_finite() && width > 0.0) {
        return None;
    }
    let x0 = canvas_width * 0.1;
    let y0 = canvas_height * 0.8;
    Some(Rect::new(x0, y0, x0 + width, y0 + canvas_height * 0.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    /// Two pixels per degree, repeating every 720 pixels.
    struct Linear;

    impl ScreenProjection for Linear {
        fn to_screen(&self, lon: f64, _lat: f64) -> Point {
            Point::new(surveymap_projection::wrap(lon, 360.0) * 2.0, 0.0)
        }

        fn horizontal_period(&self) -> f64 {
            720.0
        }
    }

    #[test]
    fn small_moon_scale() {
        let km = km_per_degree(600.0);
        assert!((km - 10.47).abs() < 0.01, "km per degree {km}");
        assert!((pixels_per_degree(&Linear, 10.0, 0.0) - 2.0).abs() < 1e-9);
        let ppk = pixels_per_km(&Linear, 600.0, 10.0, 0.0);
        assert!((ppk - 0.191).abs() < 0.001, "pixels per km {ppk}");
    }

    #[test]
    fn measurement_steps_west_near_360() {
        assert!((pixels_per_degree(&Linear, 359.5, 0.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn seam_crossing_is_folded() {
        // 359.0 -> 360.0 wraps from x = 718 to x = 0.
        assert!((pixels_per_degree(&Linear, 359.0, 0.0) - 2.0).abs() < 1e-9);
        assert!((pixels_per_degree(&Linear, -0.5, 0.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_radius_yields_no_scale() {
        assert_eq!(km_per_degree(0.0), 0.0);
        assert_eq!(km_per_degree(-5.0), 0.0);
        assert_eq!(km_per_degree(f64::NAN), 0.0);
        assert_eq!(pixels_per_km(&Linear, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn bar_geometry() {
        let bar = scale_bar_rect(200.0, 100.0, 20.0, 0.5).unwrap();
        assert_eq!(bar, Rect::new(20.0, 80.0, 30.0, 90.0));
        assert_eq!(scale_bar_rect(200.0, 100.0, 20.0, 0.0), None);
        assert_eq!(scale_bar_rect(200.0, 100.0, 20.0, f64::INFINITY), None);
    }
}
