// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surveymap Imaging Reference Backend.
//!
//! [`RefBackend`] accepts the same operations as any Surveymap surface but
//! produces no pixels. It records every operation together with the paint
//! that was current at that point, so tests can check draw order, colors
//! and image lifetimes of the overlay and the render loop.
//!
//! For pixel-level checks use `surveymap_imaging::RasterBackend` instead.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use peniko::Color;
use surveymap_imaging::{
    DrawOp, ImageDesc, ImageId, ImagingBackend, ImagingOp, ResourceBackend, StateOp,
};

/// One recorded operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The operation as received.
    pub op: ImagingOp,
    /// Paint in effect after a state op, or while a draw op was applied.
    /// `None` means no paint was set since the last reset.
    pub paint: Option<Color>,
}

/// Recording backend with a configurable target size.
#[derive(Clone, Debug, Default)]
pub struct RefBackend {
    size: (u32, u32),
    images: Vec<Option<ImageDesc>>,
    paint: Option<Color>,
    records: Vec<Record>,
}

impl RefBackend {
    /// Creates a backend reporting a `width` x `height` target.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    /// Changes the reported target size, as a display resize would.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Everything recorded since creation or the last
    /// [`clear_events`](Self::clear_events).
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The draw operations in order, each with the paint it was drawn with.
    pub fn draws(&self) -> Vec<(DrawOp, Option<Color>)> {
        self.records
            .iter()
            .filter_map(|record| match &record.op {
                ImagingOp::Draw(op) => Some((op.clone(), record.paint)),
                ImagingOp::State(_) => None,
            })
            .collect()
    }

    /// Descriptor of `id` while it is alive.
    pub fn image(&self, id: ImageId) -> Option<ImageDesc> {
        self.images.get(id.0 as usize).copied().flatten()
    }

    /// Number of images created and not yet destroyed.
    pub fn live_images(&self) -> usize {
        self.images.iter().flatten().count()
    }

    /// Forgets the recorded operations. Images stay alive.
    pub fn clear_events(&mut self) {
        self.records.clear();
    }

    fn record(&mut self, op: ImagingOp) {
        self.records.push(Record {
            op,
            paint: self.paint,
        });
    }
}

impl ResourceBackend for RefBackend {
    // Ids are never reused, so a stale id cannot alias a newer image.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a test backend never creates 2^32 images"
    )]
    fn create_image(&mut self, desc: ImageDesc, _pixels: &[u8]) -> ImageId {
        let id = ImageId(self.images.len() as u32);
        self.images.push(Some(desc));
        id
    }

    fn destroy_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for RefBackend {
    fn target_size(&self) -> (u32, u32) {
        self.size
    }

    fn state(&mut self, op: StateOp) {
        self.paint = match op {
            StateOp::SetPaint(color) => Some(color),
            StateOp::ResetPaint => None,
        };
        self.record(ImagingOp::State(op));
    }

    fn draw(&mut self, op: DrawOp) {
        self.record(ImagingOp::Draw(op));
    }
}
