// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surveymap Imaging: a small imaging IR, backend traits, and a CPU raster.
//!
//! The minimap draws very little: a background raster copied onto the
//! display, a handful of tinted icons sampled from an atlas, and one bar.
//! This crate models exactly that as plain data:
//!
//! - **Resources**: opaque [`ImageId`] handles whose lifetimes are managed via
//!   [`ResourceBackend`].
//! - **Operations**: [`StateOp`] (mutate the current paint) and [`DrawOp`]
//!   (produce pixels), combined into [`ImagingOp`] for logging and tests.
//! - **Backends**: [`ImagingBackend`] accepts the operations. [`RasterBackend`]
//!   rasterizes them into an owned [`Raster`]; other backends (for example a
//!   recording one used in tests) only need to honor the same contract.
//!
//! # Example
//!
//! ```rust
//! use peniko::Color;
//! use surveymap_imaging::{
//!     DrawOp, ImageDesc, ImagingBackend, RasterBackend, RectF, ResourceBackend, StateOp,
//! };
//!
//! let mut backend = RasterBackend::new(16, 16);
//! let icon = backend.create_image(ImageDesc { width: 1, height: 1 }, &[255, 255, 255, 255]);
//!
//! backend.state(StateOp::SetPaint(Color::from_rgba8(255, 0, 0, 255)));
//! backend.draw(DrawOp::DrawImageRect {
//!     image: icon,
//!     src: None,
//!     dst: RectF::new(4.0, 4.0, 12.0, 12.0),
//! });
//!
//! assert_eq!(backend.target().pixel(8, 8), Some([255, 0, 0, 255]));
//! assert_eq!(backend.target().pixel(0, 0), Some([0, 0, 0, 0]));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod raster;

pub use peniko::Color;
pub use raster::{Raster, RasterBackend};

use thiserror::Error;

/// Handle to an image uploaded to a backend.
///
/// Valid from [`ResourceBackend::create_image`] until the matching
/// [`ResourceBackend::destroy_image`]. The icon atlas lives for the whole
/// display lifetime; background images are replaced as builds complete.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Axis-aligned rectangle in display pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectF {
    /// Left edge.
    pub x0: f32,
    /// Top edge.
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Bottom edge.
    pub y1: f32,
}

impl RectF {
    /// Rectangle spanning `(x0, y0)` to `(x1, y1)`.
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from its minimum corner and a size.
    #[inline]
    pub const fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width of the rectangle (may be negative for inverted rects).
    #[inline]
    pub fn width(self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle (may be negative for inverted rects).
    #[inline]
    pub fn height(self) -> f32 {
        self.y1 - self.y0
    }

    /// Returns `true` if the rectangle covers no area or has non-finite corners.
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite())
            || self.width() <= 0.0
            || self.height() <= 0.0
    }

    /// Widens to a [`kurbo::Rect`].
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }

    /// Convert from kurbo's rectangle type, narrowing to `f32`.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "display coordinates fit comfortably in f32"
    )]
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        Self::new(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        )
    }
}

/// Size of an image resource.
///
/// Pixels handed to [`ResourceBackend::create_image`] are tightly packed,
/// row-major, straight-alpha RGBA8 with the first row at the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDesc {
    /// Number of bytes a pixel buffer for this description must hold.
    ///
    /// Returns `None` if the size overflows `usize`.
    #[inline]
    pub fn byte_len(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }
}

/// Paint changes. The paint is the only state a backend keeps.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Set the current paint.
    ///
    /// Fills use the paint directly; [`DrawOp::DrawImageRect`] multiplies each
    /// sampled texel by it.
    SetPaint(Color),
    /// Reset the paint to opaque white, which leaves sampled images untinted.
    ResetPaint,
}

/// Operations that touch the destination pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill an axis-aligned rectangle with the current paint.
    FillRect(RectF),
    /// Copy a whole image into `dst`, replacing the destination pixels.
    ///
    /// This ignores the current paint and does not blend; it is meant for
    /// opaque backgrounds.
    BlitImage {
        /// Image resource to copy.
        image: ImageId,
        /// Destination rectangle.
        dst: RectF,
    },
    /// Draw an image mapped to a destination rect, optionally sampling from a
    /// source rect, tinted by the current paint and blended source-over.
    ///
    /// - `dst` is in target pixel coordinates.
    /// - `src` is in image pixel coordinates; `None` samples the whole image.
    ///
    /// Sampling is nearest-neighbor, so atlas cells need no padding.
    DrawImageRect {
        /// Image resource to draw.
        image: ImageId,
        /// Optional source rectangle in image pixel coordinates.
        src: Option<RectF>,
        /// Destination rectangle in target pixel coordinates.
        dst: RectF,
    },
}

/// Imaging operation for logging and tests.
#[derive(Clone, Debug, PartialEq)]
pub enum ImagingOp {
    /// A state operation.
    State(StateOp),
    /// A draw operation.
    Draw(DrawOp),
}

/// Errors raised when building rasters from caller-supplied buffers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ImagingError {
    /// The pixel buffer length does not match `width * height * 4`.
    #[error("pixel buffer holds {actual} bytes, expected {expected} for a {width}x{height} RGBA8 image")]
    BufferSize {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Expected buffer length in bytes.
        expected: usize,
        /// Actual buffer length in bytes.
        actual: usize,
    },
    /// The image dimensions overflow the address space.
    #[error("a {width}x{height} RGBA8 image does not fit in memory")]
    TooLarge {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },
}

/// Uploads and releases images on a backend.
///
/// An id keeps referring to the same image until it is destroyed.
pub trait ResourceBackend {
    /// Create an image resource from raw straight-alpha RGBA8 pixels.
    ///
    /// A buffer whose length does not match `desc` yields a transparent image
    /// of the described size rather than a failure.
    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId;
    /// Destroy a previously created image. Destroying twice is tolerated.
    fn destroy_image(&mut self, id: ImageId);
}

/// A destination surface that executes imaging operations.
///
/// The host hands one to the render loop every frame.
pub trait ImagingBackend: ResourceBackend {
    /// Size of the destination target in pixels as `(width, height)`.
    ///
    /// A zero in either dimension means there is nothing to draw into yet.
    fn target_size(&self) -> (u32, u32);

    /// Changes the current paint.
    fn state(&mut self, op: StateOp);

    /// Draws with the current paint.
    fn draw(&mut self, op: DrawOp);
}

/// Helpers over [`ImagingBackend`] that take closures, kept out of the base
/// trait so `&mut dyn ImagingBackend` still works.
pub trait ImagingBackendExt: ImagingBackend {
    /// Runs `f` with `color` as the paint, then resets it.
    ///
    /// The reset is skipped if `f` panics.
    #[inline]
    fn with_paint<R>(&mut self, color: Color, f: impl FnOnce(&mut Self) -> R) -> R {
        self.state(StateOp::SetPaint(color));
        let result = f(self);
        self.state(StateOp::ResetPaint);
        result
    }
}

impl<B: ImagingBackend + ?Sized> ImagingBackendExt for B {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_emptiness() {
        assert!(!RectF::new(0.0, 0.0, 1.0, 1.0).is_empty());
        assert!(RectF::new(1.0, 0.0, 1.0, 1.0).is_empty());
        assert!(RectF::new(2.0, 0.0, 1.0, 1.0).is_empty());
        assert!(RectF::new(0.0, f32::NAN, 1.0, 1.0).is_empty());
        assert!(RectF::new(0.0, 0.0, f32::INFINITY, 1.0).is_empty());
    }

    #[test]
    fn rect_kurbo_conversion_keeps_corners() {
        let rect = RectF::from_origin_size(1.5, 2.0, 8.0, 4.0);
        let k = rect.to_kurbo();
        assert_eq!(k, kurbo::Rect::new(1.5, 2.0, 9.5, 6.0));
        assert_eq!(RectF::from_kurbo(k), rect);
    }

    #[test]
    fn byte_len_checks_overflow() {
        assert_eq!(ImageDesc { width: 3, height: 2 }.byte_len(), Some(24));
        assert_eq!(ImageDesc { width: 0, height: 9 }.byte_len(), Some(0));
    }
}
