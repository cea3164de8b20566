// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Ellipse, Point, Rect, Size};

use crate::config::CropShape;

/// The hole cut out of the dimmed overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaskHole {
    /// Rectangular hole matching the selection.
    Rect(Rect),
    /// Elliptical hole inscribed in the selection.
    Ellipse(Ellipse),
}

/// Geometry pair for painting the dimmed overlay with an even-odd fill.
///
/// The renderer fills `outer` and `hole` together with the even-odd rule, so
/// everything on the canvas except the selection is dimmed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskGeometry {
    /// Covers the whole canvas.
    pub outer: Rect,
    /// Selection-shaped hole.
    pub hole: MaskHole,
}

impl MaskGeometry {
    /// Builds the overlay for `selection` on a canvas of `canvas` size.
    #[must_use]
    pub fn new(canvas: Size, selection: Rect, shape: CropShape) -> Self {
        let hole = match shape {
            CropShape::Rectangular => MaskHole::Rect(selection),
            CropShape::Circular => MaskHole::Ellipse(Ellipse::from_rect(selection)),
        };
        Self {
            outer: Rect::from_origin_size(Point::ZERO, canvas),
            hole,
        }
    }

    /// Returns `true` if `pt` is painted by the overlay.
    #[must_use]
    pub fn is_dimmed(&self, pt: Point) -> bool {
        let in_outer = self.outer.contains(pt);
        let in_hole = match self.hole {
            MaskHole::Rect(r) => r.contains(pt),
            MaskHole::Ellipse(e) => {
                let c = e.center();
                let r = e.radii();
                if r.x <= 0.0 || r.y <= 0.0 {
                    false
                } else {
                    let nx = (pt.x - c.x) / r.x;
                    let ny = (pt.y - c.y) / r.y;
                    nx * nx + ny * ny <= 1.0
                }
            }
        };
        in_outer != in_hole
    }
}
