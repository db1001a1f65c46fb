// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angle wrapping and the longitude/latitude → pixel transform.

use kurbo::Point;

/// Wraps `value` into `[0, modulus)`.
///
/// Unlike `%`, the result is never negative, so angles just west of the
/// antimeridian or just south of a pole land at the far end of the range
/// instead of going negative. The result is congruent to `value` modulo
/// `modulus`.
///
/// Non-finite inputs and non-positive moduli yield `0.0`.
#[inline]
pub fn wrap(value: f64, modulus: f64) -> f64 {
    if !(value.is_finite() && modulus.is_finite() && modulus > 0.0) {
        return 0.0;
    }
    ((value % modulus) + modulus) % modulus
}

/// Physical layout of a survey provider's raster.
///
/// `scale` is pixels per degree; `lon_offset` / `lat_offset` are the
/// (wrapped, zero-based) longitude and latitude shown at the left and bottom
/// edges, which is how a provider centers its raster on a point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RasterGeometry {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Pixels per degree.
    pub scale: f64,
    /// Zero-based longitude at the left edge, in degrees.
    pub lon_offset: f64,
    /// Zero-based latitude at the bottom edge, in degrees.
    pub lat_offset: f64,
}

impl Default for RasterGeometry {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1.0,
            lon_offset: 0.0,
            lat_offset: 0.0,
        }
    }
}

impl RasterGeometry {
    /// Degrees of longitude spanned by the raster.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        f64::from(self.width) / self.scale
    }

    /// Degrees of latitude spanned by the raster.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        f64::from(self.height) / self.scale
    }

    /// Horizontal magnification: `360 / lon_span`, or `1.0` for a degenerate raster.
    #[inline]
    pub fn scale_x(&self) -> f64 {
        magnification(360.0, self.lon_span())
    }

    /// Vertical magnification: `180 / lat_span`, or `1.0` for a degenerate raster.
    #[inline]
    pub fn scale_y(&self) -> f64 {
        magnification(180.0, self.lat_span())
    }

    /// Horizontal pixel position of a projected longitude on a canvas
    /// `canvas_width` pixels wide.
    pub fn pixel_x(&self, projected_lon: f64, canvas_width: f64) -> f64 {
        let lon = wrap(wrap(projected_lon + 180.0, 360.0) - self.lon_offset, 360.0);
        lon * self.scale_x() * canvas_width / 360.0
    }

    /// Vertical pixel position (top-down) of a projected latitude on a canvas
    /// `canvas_height` pixels tall.
    pub fn pixel_y(&self, projected_lat: f64, canvas_height: f64) -> f64 {
        let lat = wrap(wrap(projected_lat + 90.0, 180.0) - self.lat_offset, 180.0);
        canvas_height - lat * self.scale_y() * canvas_height / 180.0
    }

    /// Horizontal distance in canvas pixels after which longitudes repeat.
    #[inline]
    pub fn horizontal_period(&self, canvas_width: f64) -> f64 {
        self.scale_x() * canvas_width
    }
}

fn magnification(full: f64, span: f64) -> f64 {
    if span.is_finite() && span > 0.0 {
        full / span
    } else {
        1.0
    }
}

/// Something that places surface coordinates on the display.
pub trait ScreenProjection {
    /// Display position of `(lon, lat)` in degrees, in canvas pixels,
    /// origin at the top-left.
    fn to_screen(&self, lon: f64, lat: f64) -> Point;

    /// Horizontal distance in canvas pixels after which longitudes repeat.
    fn horizontal_period(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 14] = [
        -1e9, -721.5, -360.0, -180.0, -1e-12, -0.0, 0.0, 1e-12, 90.0, 179.999, 359.999_999, 360.0,
        540.25, 1e9,
    ];

    #[test]
    fn wrap_lands_in_range() {
        for m in [180.0, 360.0, 1.0, 0.25] {
            for v in SAMPLES {
                let w = wrap(v, m);
                assert!((0.0..m).contains(&w), "wrap({v}, {m}) = {w}");
            }
        }
    }

    #[test]
    fn wrap_is_congruent() {
        for m in [180.0, 360.0] {
            for v in SAMPLES {
                let w = wrap(v, m);
                let k = ((v - w) / m).round();
                assert!(
                    (v - w - k * m).abs() < 1e-6 * v.abs().max(1.0),
                    "wrap({v}, {m}) = {w} is not congruent"
                );
            }
        }
    }

    #[test]
    fn wrap_corrects_negative_remainders() {
        assert_eq!(wrap(-10.0, 360.0), 350.0);
        assert_eq!(wrap(-190.0, 180.0), 170.0);
        assert_eq!(wrap(370.0, 360.0), 10.0);
    }

    #[test]
    fn wrap_rejects_degenerate_inputs() {
        assert_eq!(wrap(f64::NAN, 360.0), 0.0);
        assert_eq!(wrap(f64::INFINITY, 360.0), 0.0);
        assert_eq!(wrap(10.0, 0.0), 0.0);
        assert_eq!(wrap(10.0, -360.0), 0.0);
    }

    #[test]
    fn full_world_geometry_matches_plain_formula() {
        // 720x360 canvas, 2 px/degree: the whole world, no centering.
        let g = RasterGeometry {
            width: 720,
            height: 360,
            scale: 2.0,
            lon_offset: 0.0,
            lat_offset: 0.0,
        };
        assert!((g.scale_x() - 1.0).abs() < 1e-12);
        assert!((g.scale_y() - 1.0).abs() < 1e-12);

        // pixelX = wrap(lon + 180, 360) * W / 360
        assert!((g.pixel_x(0.0, 720.0) - 360.0).abs() < 1e-9);
        assert!((g.pixel_x(-180.0, 720.0) - 0.0).abs() < 1e-9);
        assert!((g.pixel_x(-181.0, 720.0) - 718.0).abs() < 1e-9);
        // pixelY = H - wrap(lat + 90, 180) * H / 180
        assert!((g.pixel_y(0.0, 360.0) - 180.0).abs() < 1e-9);
        assert!((g.pixel_y(89.0, 360.0) - 2.0).abs() < 1e-9);
        assert!((g.pixel_y(-91.0, 360.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn pixels_are_never_negative_near_the_seam() {
        let g = RasterGeometry {
            width: 100,
            height: 50,
            scale: 100.0 / 360.0 * 4.0,
            lon_offset: 359.0,
            lat_offset: 179.5,
        };
        for lon in [-180.0, -179.999, 179.999, 180.0, 0.0] {
            assert!(g.pixel_x(lon, 100.0) >= 0.0);
        }
        for lat in [-90.0, -89.999, 89.999, 90.0] {
            assert!(g.pixel_y(lat, 50.0) <= 50.0);
        }
    }

    #[test]
    fn degenerate_geometry_falls_back_to_unit_magnification() {
        let g = RasterGeometry {
            width: 0,
            height: 0,
            scale: 0.0,
            ..RasterGeometry::default()
        };
        assert_eq!(g.scale_x(), 1.0);
        assert_eq!(g.scale_y(), 1.0);
        assert!(g.pixel_x(10.0, 360.0).is_finite());
    }
}
