// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Axis-aligned scale + translate transform between image and display space.
///
/// The map applies `x' = x * scale_x + translate_x` and
/// `y' = y * scale_y + translate_y`. There is no rotation or skew.
///
/// Use [`AffineMap::to_affine`] to hand the transform to a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineMap {
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Horizontal translation, applied after scaling.
    pub translate_x: f64,
    /// Vertical translation, applied after scaling.
    pub translate_y: f64,
}

impl Default for AffineMap {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMap {
    /// The identity map.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Creates a map with a uniform scale followed by a translation.
    #[must_use]
    pub fn uniform(scale: f64, translate: Vec2) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            translate_x: translate.x,
            translate_y: translate.y,
        }
    }

    /// Returns `true` if both scale factors are finite and non-zero.
    ///
    /// Only active maps can be inverted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.scale_x.is_finite()
            && self.scale_y.is_finite()
            && self.translate_x.is_finite()
            && self.translate_y.is_finite()
            && self.scale_x != 0.0
            && self.scale_y != 0.0
    }

    /// Returns the translation component.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    /// Maps a point.
    #[must_use]
    pub fn transform_point(&self, pt: Point) -> Point {
        Point::new(
            pt.x * self.scale_x + self.translate_x,
            pt.y * self.scale_y + self.translate_y,
        )
    }

    /// Maps a size (scale only; translation does not apply to extents).
    #[must_use]
    pub fn transform_size(&self, size: Size) -> Size {
        Size::new(size.width * self.scale_x, size.height * self.scale_y)
    }

    /// Maps a rectangle by mapping its two corners.
    ///
    /// The result is normalized, so a negative scale still yields a rectangle
    /// with `x0 <= x1` and `y0 <= y1`.
    #[must_use]
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let p0 = self.transform_point(Point::new(rect.x0, rect.y0));
        let p1 = self.transform_point(Point::new(rect.x1, rect.y1));
        Rect::from_points(p0, p1)
    }

    /// Returns the inverse map, or `None` if the map is not active.
    ///
    /// The inverse satisfies `inverse.scale = 1 / scale` and
    /// `inverse.translate = -translate / scale` per axis.
    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        if !self.is_active() {
            return None;
        }
        Some(Self {
            scale_x: 1.0 / self.scale_x,
            scale_y: 1.0 / self.scale_y,
            translate_x: -self.translate_x / self.scale_x,
            translate_y: -self.translate_y / self.scale_y,
        })
    }

    /// Converts into a [`kurbo::Affine`] for rendering.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::new([
            self.scale_x,
            0.0,
            0.0,
            self.scale_y,
            self.translate_x,
            self.translate_y,
        ])
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Vec2};

    use super::AffineMap;

    #[test]
    fn point_roundtrip_through_inverse() {
        let map = AffineMap::uniform(0.4, Vec2::new(12.5, -3.0));
        let inv = map.invert().unwrap();

        let pt = Point::new(1234.5, 678.25);
        let back = inv.transform_point(map.transform_point(pt));
        assert!((back.x - pt.x).abs() < 1e-9);
        assert!((back.y - pt.y).abs() < 1e-9);
    }

    #[test]
    fn translation_reports_offset() {
        let map = AffineMap::uniform(3.0, Vec2::new(-7.0, 4.5));
        assert_eq!(map.translation(), Vec2::new(-7.0, 4.5));
        assert_eq!(map.transform_point(Point::ZERO).to_vec2(), map.translation());
        assert_eq!(AffineMap::default().translation(), Vec2::ZERO);
    }

    #[test]
    fn inverse_matches_closed_form() {
        let map = AffineMap::uniform(2.0, Vec2::new(10.0, 20.0));
        let inv = map.invert().unwrap();
        assert_eq!(inv.scale_x, 0.5);
        assert_eq!(inv.scale_y, 0.5);
        assert_eq!(inv.translate_x, -5.0);
        assert_eq!(inv.translate_y, -10.0);
    }

    #[test]
    fn degenerate_scale_has_no_inverse() {
        let map = AffineMap::uniform(0.0, Vec2::ZERO);
        assert!(!map.is_active());
        assert!(map.invert().is_none());

        let nan = AffineMap::uniform(f64::NAN, Vec2::ZERO);
        assert!(nan.invert().is_none());
    }

    #[test]
    fn rect_scales_extent_and_translates_origin() {
        let map = AffineMap::uniform(0.5, Vec2::new(100.0, 50.0));
        let r = map.transform_rect(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(r, Rect::new(100.0, 50.0, 200.0, 100.0));
    }

    #[test]
    fn to_affine_agrees_with_transform_point() {
        let map = AffineMap::uniform(1.5, Vec2::new(-4.0, 9.0));
        let pt = Point::new(3.0, 7.0);
        let a = map.to_affine() * pt;
        let b = map.transform_point(pt);
        assert!((a.x - b.x).abs() < 1e-12);
        assert!((a.y - b.y).abs() < 1e-12);
    }
}
