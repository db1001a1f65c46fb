// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU raster storage and the backend that draws into it.

use alloc::vec::Vec;
use core::ops::Range;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round`, `ceil` and `floor`
use peniko::Color;

use crate::{
    DrawOp, ImageDesc, ImageId, ImagingBackend, ImagingError, RectF, ResourceBackend, StateOp,
};

/// Owned straight-alpha RGBA8 pixel buffer, first row at the top.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a fully transparent raster.
    ///
    /// Dimensions whose byte size would overflow produce an empty raster.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Creates a raster with every pixel set to `rgba`.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let desc = ImageDesc { width, height };
        match desc.byte_len() {
            Some(len) => Self {
                width,
                height,
                pixels: rgba.iter().copied().cycle().take(len).collect(),
            },
            None => Self::default(),
        }
    }

    /// Wraps an existing RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::BufferSize`] if `pixels.len()` is not
    /// `width * height * 4`, or [`ImagingError::TooLarge`] if that size
    /// overflows.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImagingError> {
        let expected = ImageDesc { width, height }
            .byte_len()
            .ok_or(ImagingError::TooLarge { width, height })?;
        if pixels.len() != expected {
            return Err(ImagingError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` if the raster has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Descriptor suitable for [`ResourceBackend::create_image`].
    #[inline]
    pub fn desc(&self) -> ImageDesc {
        ImageDesc {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw RGBA8 bytes.
    #[inline]
    pub fn as_rgba8(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Sets the pixel at `(x, y)`; writes outside the raster are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&rgba);
        }
    }

    /// Sets every pixel to `rgba`.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }
}

/// CPU backend rasterizing [`DrawOp`]s into an owned [`Raster`].
///
/// Sampling is nearest-neighbor and coverage is decided by pixel centers, so
/// a destination rect `[x0, x1)` touches pixel `px` when
/// `x0 <= px + 0.5 < x1`. Geometry outside the target is clipped.
#[derive(Clone, Debug)]
pub struct RasterBackend {
    target: Raster,
    images: Vec<Option<Raster>>,
    paint: [f32; 4],
}

impl RasterBackend {
    /// Creates a backend drawing into a transparent `width` x `height` target.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Raster::new(width, height),
            images: Vec::new(),
            paint: WHITE,
        }
    }

    /// The raster drawn so far.
    #[inline]
    pub fn target(&self) -> &Raster {
        &self.target
    }

    fn image(&self, id: ImageId) -> Option<&Raster> {
        self.images.get(id.0 as usize)?.as_ref()
    }

    fn fill_rect(&mut self, rect: RectF) {
        if rect.is_empty() {
            return;
        }
        let paint = self.paint;
        let xs = pixel_span(rect.x0, rect.x1, self.target.width);
        for y in pixel_span(rect.y0, rect.y1, self.target.height) {
            for x in xs.clone() {
                blend_pixel(&mut self.target, x, y, paint);
            }
        }
    }

    fn blit(&mut self, id: ImageId, dst: RectF) {
        if dst.is_empty() {
            return;
        }
        let Some(image) = self.images.get(id.0 as usize).and_then(Option::as_ref) else {
            return;
        };
        if image.is_empty() {
            return;
        }
        let full = RectF::new(0.0, 0.0, image.width as f32, image.height as f32);
        let xs = pixel_span(dst.x0, dst.x1, self.target.width);
        for y in pixel_span(dst.y0, dst.y1, self.target.height) {
            for x in xs.clone() {
                let (sx, sy) = sample_coords(image, full, dst, x, y);
                if let Some(texel) = image.pixel(sx, sy) {
                    self.target.set_pixel(x, y, texel);
                }
            }
        }
    }

    fn draw_image_rect(&mut self, id: ImageId, src: Option<RectF>, dst: RectF) {
        if dst.is_empty() {
            return;
        }
        let paint = self.paint;
        let Some(image) = self.image(id) else {
            return;
        };
        if image.is_empty() {
            return;
        }
        let src = src.unwrap_or(RectF::new(
            0.0,
            0.0,
            image.width as f32,
            image.height as f32,
        ));
        if src.is_empty() {
            return;
        }
        let xs = pixel_span(dst.x0, dst.x1, self.target.width);
        let ys = pixel_span(dst.y0, dst.y1, self.target.height);
        let mut writes = Vec::with_capacity(xs.len() * ys.len());
        for y in ys {
            for x in xs.clone() {
                let (sx, sy) = sample_coords(image, src, dst, x, y);
                if let Some(texel) = image.pixel(sx, sy) {
                    let tinted = [
                        to_unit(texel[0]) * paint[0],
                        to_unit(texel[1]) * paint[1],
                        to_unit(texel[2]) * paint[2],
                        to_unit(texel[3]) * paint[3],
                    ];
                    writes.push((x, y, tinted));
                }
            }
        }
        for (x, y, color) in writes {
            blend_pixel(&mut self.target, x, y, color);
        }
    }
}

impl ResourceBackend for RasterBackend {
    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId {
        let raster = Raster::from_rgba8(desc.width, desc.height, pixels.to_vec())
            .unwrap_or_else(|_| Raster::new(desc.width, desc.height));
        // Reuse the first free slot.
        let slot = self.images.iter().position(Option::is_none);
        let index = match slot {
            Some(index) => {
                self.images[index] = Some(raster);
                index
            }
            None => {
                self.images.push(Some(raster));
                self.images.len() - 1
            }
        };
        ImageId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    fn destroy_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for RasterBackend {
    fn target_size(&self) -> (u32, u32) {
        (self.target.width, self.target.height)
    }

    fn state(&mut self, op: StateOp) {
        match op {
            StateOp::SetPaint(color) => self.paint = color_to_unit(color),
            StateOp::ResetPaint => self.paint = WHITE,
        }
    }

    fn draw(&mut self, op: DrawOp) {
        match op {
            DrawOp::FillRect(rect) => self.fill_rect(rect),
            DrawOp::BlitImage { image, dst } => self.blit(image, dst),
            DrawOp::DrawImageRect { image, src, dst } => self.draw_image_rect(image, src, dst),
        }
    }
}

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

fn color_to_unit(color: Color) -> [f32; 4] {
    color.components.map(|c| c.clamp(0.0, 1.0))
}

fn to_unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped into 0..=255 first"
)]
fn from_unit(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Pixels whose centers fall inside `[lo, hi)`, clipped to `0..limit`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "bounds are clamped into 0..=limit before conversion"
)]
fn pixel_span(lo: f32, hi: f32, limit: u32) -> Range<u32> {
    let limit_f = limit as f32;
    let start = (lo - 0.5).ceil().clamp(0.0, limit_f) as u32;
    let end = (hi - 0.5).ceil().clamp(0.0, limit_f) as u32;
    start..end.max(start)
}

/// Maps the center of target pixel `(x, y)` inside `dst` to a texel in `src`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "texel coordinates are clamped into the image before conversion"
)]
fn sample_coords(image: &Raster, src: RectF, dst: RectF, x: u32, y: u32) -> (u32, u32) {
    let u = (x as f32 + 0.5 - dst.x0) / dst.width();
    let v = (y as f32 + 0.5 - dst.y0) / dst.height();
    let sx = (src.x0 + u * src.width()).floor();
    let sy = (src.y0 + v * src.height()).floor();
    let max_x = image.width.saturating_sub(1) as f32;
    let max_y = image.height.saturating_sub(1) as f32;
    (sx.clamp(0.0, max_x) as u32, sy.clamp(0.0, max_y) as u32)
}

/// Source-over blend of a straight-alpha color onto a straight-alpha pixel.
fn blend_pixel(target: &mut Raster, x: u32, y: u32, src: [f32; 4]) {
    let Some(dst) = target.pixel(x, y) else {
        return;
    };
    let sa = src[3].clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = to_unit(dst[3]);
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0_u8; 4];
    for c in 0..3 {
        let blended = (src[c] * sa + to_unit(dst[c]) * da * (1.0 - sa)) / out_a;
        out[c] = from_unit(blended);
    }
    out[3] = from_unit(out_a);
    target.set_pixel(x, y, out);
}
