// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

use crate::geometry::{clamp_point_to_rect, is_valid_rect, is_valid_size, uniform_fit};
use crate::map::AffineMap;

/// Display-space layout derived from the canvas size and the crop rectangle.
///
/// The crop rectangle is uniformly scaled to the largest size that fits the
/// canvas and centered in it. All four fields are computed together and are
/// always mutually consistent: `inverse` is the algebraic inverse of
/// `forward`, and both rectangles are projections through `forward`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportLayout {
    /// Image space → display space.
    pub forward: AffineMap,
    /// Display space → image space.
    pub inverse: AffineMap,
    /// The whole image projected into display space.
    pub view_bounds: Rect,
    /// The crop rectangle projected into display space, clamped into
    /// [`ViewportLayout::view_bounds`].
    pub selection: Rect,
}

impl ViewportLayout {
    /// Fits `crop` into a canvas of `canvas` size.
    ///
    /// Returns `None` if the canvas, the crop rectangle, or the image bounds
    /// have no area; callers keep their previous layout in that case.
    #[must_use]
    pub fn fit(canvas: Size, crop: Rect, image_bounds: Rect) -> Option<Self> {
        if !is_valid_size(canvas) || !is_valid_rect(crop) || !is_valid_rect(image_bounds) {
            return None;
        }
        let canvas_rect = Rect::from_origin_size(Point::ZERO, canvas);
        let target = uniform_fit(canvas_rect, crop.width() / crop.height());
        let scale = target.width() / crop.width();
        let translate = target.origin().to_vec2() - crop.origin().to_vec2() * scale;
        let forward = AffineMap::uniform(scale, translate);
        let inverse = forward.invert()?;

        let view_bounds = forward.transform_rect(image_bounds);
        let projected = forward.transform_rect(crop);
        // Rounding can push the projected crop a hair outside the projected
        // image at the edges.
        let start = clamp_point_to_rect(view_bounds, Point::new(projected.x0, projected.y0));
        let end = clamp_point_to_rect(view_bounds, Point::new(projected.x1, projected.y1));

        Some(Self {
            forward,
            inverse,
            view_bounds,
            selection: Rect::from_points(start, end),
        })
    }

    /// Uniform display units per image pixel.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.forward.scale_x
    }

    /// Maps a display-space selection back into image space, cut to `image_bounds`.
    #[must_use]
    pub fn crop_for_selection(&self, selection: Rect, image_bounds: Rect) -> Rect {
        self.inverse.transform_rect(selection).intersect(image_bounds)
    }
}
