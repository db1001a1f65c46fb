// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;
use surveymap_imaging::{ImageDesc, RectF};
use surveymap_projection::VesselKind;

/// Columns in the icon atlas grid.
pub const ATLAS_COLUMNS: u32 = 5;
/// Rows in the icon atlas grid.
pub const ATLAS_ROWS: u32 = 4;
/// Side of one cell in normalized atlas coordinates.
pub const CELL_SIZE: f64 = 0.2;

/// What an icon stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IconKey {
    /// A vessel of the given kind.
    Vessel(VesselKind),
    /// An anomaly; `detailed` once it has been visited.
    Anomaly {
        /// Whether the anomaly has been identified.
        detailed: bool,
    },
}

/// A cell of the icon atlas.
///
/// Rows count up from the bottom of the image, as texture coordinates do.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasCell {
    /// Column in `0..ATLAS_COLUMNS`.
    pub column: u32,
    /// Row in `0..ATLAS_ROWS`, counted from the bottom.
    pub row: u32,
}

impl AtlasCell {
    /// Cell used for every kind without an entry of its own.
    pub const DEFAULT: Self = Self::new(3, 2);

    /// Creates a cell reference.
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Normalized bounds with `y` pointing up, `[0, 1]` on both axes.
    pub fn uv_rect(self) -> Rect {
        let x0 = f64::from(self.column) * CELL_SIZE;
        let y0 = f64::from(self.row) * CELL_SIZE;
        Rect::new(x0, y0, x0 + CELL_SIZE, y0 + CELL_SIZE)
    }

    /// Source rectangle in pixels of an atlas image of size `desc`, rows
    /// flipped to top-down.
    pub fn source_rect(self, desc: ImageDesc) -> RectF {
        let uv = self.uv_rect();
        let w = f64::from(desc.width);
        let h = f64::from(desc.height);
        RectF::from_kurbo(Rect::new(
            uv.x0 * w,
            (1.0 - uv.y1) * h,
            uv.x1 * w,
            (1.0 - uv.y0) * h,
        ))
    }
}

const VESSEL_CELLS: [(VesselKind, AtlasCell); 10] = [
    (VesselKind::Base, AtlasCell::new(2, 0)),
    (VesselKind::Debris, AtlasCell::new(1, 3)),
    (VesselKind::Eva, AtlasCell::new(2, 2)),
    (VesselKind::Flag, AtlasCell::new(4, 0)),
    (VesselKind::Lander, AtlasCell::new(3, 0)),
    (VesselKind::Probe, AtlasCell::new(1, 0)),
    (VesselKind::Rover, AtlasCell::new(0, 0)),
    (VesselKind::Ship, AtlasCell::new(0, 3)),
    (VesselKind::Station, AtlasCell::new(3, 1)),
    (VesselKind::Unknown, AtlasCell::new(3, 3)),
];

/// Atlas cell for `key`. Kinds without an entry get [`AtlasCell::DEFAULT`].
pub fn atlas_cell(key: IconKey) -> AtlasCell {
    let kind = match key {
        IconKey::Vessel(kind) => kind,
        IconKey::Anomaly { detailed: true } => return AtlasCell::DEFAULT,
        IconKey::Anomaly { detailed: false } => VesselKind::Unknown,
    };
    VESSEL_CELLS
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(AtlasCell::DEFAULT, |&(_, cell)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [VesselKind; 15] = [
        VesselKind::Base,
        VesselKind::Debris,
        VesselKind::Eva,
        VesselKind::Flag,
        VesselKind::Lander,
        VesselKind::Probe,
        VesselKind::Rover,
        VesselKind::Ship,
        VesselKind::Station,
        VesselKind::Unknown,
        VesselKind::Plane,
        VesselKind::Relay,
        VesselKind::SpaceObject,
        VesselKind::Other(0),
        VesselKind::Other(u32::MAX),
    ];

    #[test]
    fn every_kind_lands_inside_the_grid() {
        for kind in ALL_KINDS {
            let cell = atlas_cell(IconKey::Vessel(kind));
            assert!(cell.column < ATLAS_COLUMNS, "{kind:?}");
            assert!(cell.row < ATLAS_ROWS, "{kind:?}");
            let uv = cell.uv_rect();
            assert!(uv.x0 >= 0.0 && uv.x1 <= 1.0 + 1e-12, "{kind:?}");
            assert!(uv.y0 >= 0.0 && uv.y1 <= 1.0 + 1e-12, "{kind:?}");
        }
    }

    #[test]
    fn unlisted_kinds_use_the_default_cell() {
        for kind in [
            VesselKind::Plane,
            VesselKind::Relay,
            VesselKind::SpaceObject,
            VesselKind::Other(17),
        ] {
            assert_eq!(atlas_cell(IconKey::Vessel(kind)), AtlasCell::DEFAULT);
        }
    }

    #[test]
    fn listed_kinds_match_the_table() {
        assert_eq!(atlas_cell(IconKey::Vessel(VesselKind::Ship)), AtlasCell::new(0, 3));
        assert_eq!(atlas_cell(IconKey::Vessel(VesselKind::Flag)), AtlasCell::new(4, 0));
        assert_eq!(atlas_cell(IconKey::Vessel(VesselKind::Rover)), AtlasCell::new(0, 0));
    }

    #[test]
    fn anomaly_cells() {
        assert_eq!(
            atlas_cell(IconKey::Anomaly { detailed: false }),
            AtlasCell::new(3, 3)
        );
        assert_eq!(
            atlas_cell(IconKey::Anomaly { detailed: true }),
            AtlasCell::DEFAULT
        );
    }

    #[test]
    fn source_rect_flips_rows() {
        let desc = ImageDesc {
            width: 100,
            height: 100,
        };
        // Bottom row of the atlas is the bottom strip of the image.
        let bottom = AtlasCell::new(0, 0).source_rect(desc);
        assert_eq!(bottom, RectF::new(0.0, 80.0, 20.0, 100.0));
        let top = AtlasCell::new(4, 3).source_rect(desc);
        assert_eq!(top, RectF::new(80.0, 20.0, 100.0, 40.0));
    }
}
