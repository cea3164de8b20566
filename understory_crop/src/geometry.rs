// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateless rectangle and point helpers used by the resize solver and layout.
//!
//! All comparisons that decide whether an update is accepted go through
//! [`TOLERANCE`]: selection rectangles are repeatedly pushed through
//! image → display → image transforms, and strict containment checks would
//! reject rectangles that sit on a bound up to rounding.

use kurbo::{Point, Rect, Size, Vec2};

use crate::handle::HandlePosition;

/// Slack used by the tolerant containment and minimum-size checks.
pub const TOLERANCE: f64 = 0.001;

/// Returns `true` if `rect` has a positive, finite extent.
#[must_use]
pub fn is_valid_rect(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

/// Returns `true` if `size` is positive and finite on both axes.
#[must_use]
pub fn is_valid_size(size: Size) -> bool {
    size.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Clamps `pt` per axis into `[rect.x0, rect.x1] × [rect.y0, rect.y1]`.
#[must_use]
pub fn clamp_point_to_rect(rect: Rect, pt: Point) -> Point {
    Point::new(
        pt.x.max(rect.min_x()).min(rect.max_x()),
        pt.y.max(rect.min_y()).min(rect.max_y()),
    )
}

/// Inclusive containment test with `tolerance` of slack on every edge.
#[must_use]
pub fn is_point_in_rect(rect: Rect, pt: Point, tolerance: f64) -> bool {
    pt.x - rect.min_x() >= -tolerance
        && pt.x - rect.max_x() <= tolerance
        && pt.y - rect.min_y() >= -tolerance
        && pt.y - rect.max_y() <= tolerance
}

/// Returns `true` if the rectangle spanned by `start`/`end` is at least
/// `min_size` on both axes, minus `tolerance`.
///
/// `end` is expected to be the lower-right corner; an inverted pair fails.
#[must_use]
pub fn is_rect_at_least(start: Point, end: Point, min_size: Size, tolerance: f64) -> bool {
    start.x + min_size.width - end.x < tolerance && start.y + min_size.height - end.y < tolerance
}

/// Pushes the edges owned by `handle` outward until the rectangle spanned by
/// `start`/`end` satisfies `min_size`.
///
/// The edges opposite the dragged handle stay pinned. Edge handles only touch
/// their own axis; corner handles may fix both.
#[must_use]
pub fn clamp_rect_to_min_size(
    mut start: Point,
    mut end: Point,
    min_size: Size,
    handle: HandlePosition,
) -> Rect {
    let edges = handle.edges();
    if start.x + min_size.width > end.x {
        if edges.left {
            start.x = end.x - min_size.width;
        } else if edges.right {
            end.x = start.x + min_size.width;
        }
    }
    if start.y + min_size.height > end.y {
        if edges.top {
            start.y = end.y - min_size.height;
        } else if edges.bottom {
            end.y = start.y + min_size.height;
        }
    }
    Rect::from_points(start, end)
}

/// Returns the largest rectangle with `width / height == aspect_ratio` that
/// fits inside `container`, centered in it.
///
/// When the container is relatively wider than the target ratio the height is
/// the limiting dimension; otherwise the width is.
#[must_use]
pub fn uniform_fit(container: Rect, aspect_ratio: f64) -> Rect {
    let container_ratio = container.width() / container.height();
    let (width, height) = if aspect_ratio > container_ratio {
        let width = container.width();
        (width, width / aspect_ratio)
    } else {
        let height = container.height();
        (height * aspect_ratio, height)
    };
    let center = container.center();
    Rect::from_center_size(center, Size::new(width, height))
}

/// Returns `true` if `rect` could be translated to fit inside `bounds`.
#[must_use]
pub fn can_contain(bounds: Rect, rect: Rect) -> bool {
    bounds.width() - rect.width() > -TOLERANCE && bounds.height() - rect.height() > -TOLERANCE
}

/// Translates `rect` by the smallest displacement that puts it inside `bounds`.
///
/// The rectangle is never resized. Returns `None` if it is larger than
/// `bounds` on either axis.
#[must_use]
pub fn contained_rect(bounds: Rect, rect: Rect) -> Option<Rect> {
    if !can_contain(bounds, rect) {
        return None;
    }
    let mut dx = 0.0;
    let mut dy = 0.0;
    if rect.min_x() < bounds.min_x() {
        dx = bounds.min_x() - rect.min_x();
    } else if rect.max_x() > bounds.max_x() {
        dx = bounds.max_x() - rect.max_x();
    }
    if rect.min_y() < bounds.min_y() {
        dy = bounds.min_y() - rect.min_y();
    } else if rect.max_y() > bounds.max_y() {
        dy = bounds.max_y() - rect.max_y();
    }
    Some(rect + Vec2::new(dx, dy))
}

/// Expands a minimum edge length into a minimum size with the given ratio.
///
/// The shorter side gets `length`; the longer side is stretched by the ratio.
/// A ratio of `1.0` yields a square.
#[must_use]
pub fn min_size_for_ratio(length: f64, aspect_ratio: f64) -> Size {
    if aspect_ratio >= 1.0 {
        Size::new(length * aspect_ratio, length)
    } else {
        Size::new(length, length / aspect_ratio)
    }
}

/// Returns `true` if `rect` has the given ratio, up to a relative tolerance.
#[must_use]
pub fn has_aspect_ratio(rect: Rect, aspect_ratio: f64) -> bool {
    if !is_valid_rect(rect) {
        return false;
    }
    let actual = rect.width() / rect.height();
    (actual - aspect_ratio).abs() <= aspect_ratio * 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_point_pulls_outside_points_onto_edges() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            clamp_point_to_rect(r, Point::new(-5.0, 70.0)),
            Point::new(0.0, 50.0)
        );
        assert_eq!(
            clamp_point_to_rect(r, Point::new(40.0, 20.0)),
            Point::new(40.0, 20.0)
        );
    }

    #[test]
    fn tolerant_containment_absorbs_drift() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(is_point_in_rect(r, Point::new(100.0005, 50.0), TOLERANCE));
        assert!(is_point_in_rect(r, Point::new(-0.0009, 0.0), TOLERANCE));
        assert!(!is_point_in_rect(r, Point::new(100.01, 10.0), TOLERANCE));
        assert!(!is_point_in_rect(r, Point::new(10.0, -0.5), TOLERANCE));
    }

    #[test]
    fn at_least_checks_both_axes() {
        let min = Size::new(40.0, 40.0);
        let start = Point::new(0.0, 0.0);
        assert!(is_rect_at_least(start, Point::new(40.0, 40.0), min, TOLERANCE));
        assert!(!is_rect_at_least(start, Point::new(39.0, 80.0), min, TOLERANCE));
        assert!(!is_rect_at_least(start, Point::new(80.0, 39.0), min, TOLERANCE));
        // Inverted rectangles never satisfy a positive minimum.
        assert!(!is_rect_at_least(start, Point::new(-50.0, -50.0), min, TOLERANCE));
    }

    #[test]
    fn min_size_clamp_pins_opposite_edge() {
        let min = Size::new(40.0, 40.0);

        // Top dragged past the bottom: bottom stays, top is pushed up.
        let r = clamp_rect_to_min_size(
            Point::new(0.0, 90.0),
            Point::new(100.0, 80.0),
            min,
            HandlePosition::Top,
        );
        assert_eq!(r, Rect::new(0.0, 40.0, 100.0, 80.0));

        // Right dragged too far left: left stays.
        let r = clamp_rect_to_min_size(
            Point::new(10.0, 0.0),
            Point::new(20.0, 100.0),
            min,
            HandlePosition::Right,
        );
        assert_eq!(r, Rect::new(10.0, 0.0, 50.0, 100.0));

        // Upper-left fixes both axes against the lower-right corner.
        let r = clamp_rect_to_min_size(
            Point::new(95.0, 95.0),
            Point::new(100.0, 100.0),
            min,
            HandlePosition::UpperLeft,
        );
        assert_eq!(r, Rect::new(60.0, 60.0, 100.0, 100.0));

        // Lower-left: left moves, bottom moves.
        let r = clamp_rect_to_min_size(
            Point::new(90.0, 0.0),
            Point::new(100.0, 10.0),
            min,
            HandlePosition::LowerLeft,
        );
        assert_eq!(r, Rect::new(60.0, 0.0, 100.0, 40.0));
    }

    #[test]
    fn uniform_fit_is_centered_contained_and_exact() {
        let containers = [
            Rect::new(0.0, 0.0, 800.0, 400.0),
            Rect::new(10.0, 20.0, 110.0, 320.0),
            Rect::new(-50.0, -50.0, 50.0, 50.0),
        ];
        for container in containers {
            for ratio in [0.25, 0.5, 1.0, 4.0 / 3.0, 2.0, 16.0 / 9.0, 5.0] {
                let fit = uniform_fit(container, ratio);
                assert!(fit.min_x() >= container.min_x() - 1e-9);
                assert!(fit.min_y() >= container.min_y() - 1e-9);
                assert!(fit.max_x() <= container.max_x() + 1e-9);
                assert!(fit.max_y() <= container.max_y() + 1e-9);
                assert!((fit.center().x - container.center().x).abs() < 1e-9);
                assert!((fit.center().y - container.center().y).abs() < 1e-9);
                assert!((fit.width() / fit.height() - ratio).abs() < 1e-9);
                // One dimension always touches the container.
                let touches = (fit.width() - container.width()).abs() < 1e-9
                    || (fit.height() - container.height()).abs() < 1e-9;
                assert!(touches);
            }
        }
    }

    #[test]
    fn uniform_fit_of_matching_ratio_is_identity() {
        let r = Rect::new(0.0, 0.0, 2000.0, 1000.0);
        assert_eq!(uniform_fit(r, 2.0), r);
    }

    #[test]
    fn contained_rect_translates_without_resizing() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let moved = contained_rect(bounds, Rect::new(-10.0, 80.0, 20.0, 120.0)).unwrap();
        assert_eq!(moved, Rect::new(0.0, 60.0, 30.0, 100.0));

        let inside = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(contained_rect(bounds, inside), Some(inside));

        assert!(contained_rect(bounds, Rect::new(0.0, 0.0, 120.0, 10.0)).is_none());
    }

    #[test]
    fn min_size_follows_ratio() {
        assert_eq!(min_size_for_ratio(40.0, 1.0), Size::new(40.0, 40.0));
        assert_eq!(min_size_for_ratio(40.0, 2.0), Size::new(80.0, 40.0));
        assert_eq!(min_size_for_ratio(40.0, 0.5), Size::new(40.0, 80.0));
    }

    #[test]
    fn validity_rejects_empty_and_non_finite() {
        assert!(is_valid_rect(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!is_valid_rect(Rect::new(0.0, 0.0, 0.0, 1.0)));
        assert!(!is_valid_rect(Rect::new(5.0, 0.0, 1.0, 1.0)));
        assert!(!is_valid_rect(Rect::new(0.0, 0.0, f64::INFINITY, 1.0)));
        assert!(!is_valid_size(Size::new(0.0, 10.0)));
    }

    #[test]
    fn aspect_ratio_check_is_relative() {
        assert!(has_aspect_ratio(Rect::new(0.0, 0.0, 2000.0, 1000.0), 2.0));
        assert!(!has_aspect_ratio(Rect::new(0.0, 0.0, 2000.0, 1001.0), 2.0));
    }
}
