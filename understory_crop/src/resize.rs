// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle-drag resize solver.
//!
//! Given the current selection (display space), a handle, and a pointer delta,
//! [`solve_resize`] computes the next selection or rejects the drag step.
//!
//! ## Free-form resize
//!
//! The handle moves only the edges it owns, by the raw delta.
//!
//! ## Aspect-locked resize
//!
//! The drag is first turned into a growth pair `(dw, dh)` with
//! `dw == dh * ratio`:
//! - edge handles take their own axis from the delta and derive the other;
//! - corner handles project the outward component of the delta onto the
//!   ratio diagonal `(ratio, 1)`, so motion along the diagonal counts fully and
//!   motion across it counts not at all.
//!
//! The pair is then limited per handle by the room left between the selection
//! and the view bounds, rescaling the other axis to keep the ratio exact. Edge
//! handles spread the cross-axis change evenly over both sides, keeping the
//! selection centered on that axis; corner handles move only their corner.
//!
//! ## Post-processing
//!
//! - Below the minimum size, a locked resize that shrinks is rejected, while a
//!   free resize pins the opposite edge and pushes the dragged edge out.
//! - A result outside the view bounds is translated back inside for edge
//!   handles; corner handles (or a result too large to fit) are rejected.

use kurbo::{Point, Rect, Size, Vec2};

use crate::geometry::{
    TOLERANCE, clamp_rect_to_min_size, contained_rect, is_point_in_rect, is_rect_at_least,
    is_valid_rect,
};
use crate::handle::HandlePosition;

/// Inputs to a single resize step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeRequest {
    /// Current selection in display space.
    pub selection: Rect,
    /// Handle being dragged.
    pub handle: HandlePosition,
    /// Pointer movement since the last step, in display units.
    pub delta: Vec2,
    /// Hard bounds for the selection (the image projected into display space).
    pub view_bounds: Rect,
    /// Smallest allowed selection.
    pub min_select_size: Size,
    /// Locked `width / height`, or `None` for free-form.
    pub aspect_ratio: Option<f64>,
}

/// Computes the selection after dragging `request.handle` by `request.delta`.
///
/// Returns `None` when the step is rejected or would not change anything; the
/// caller keeps its current selection in that case.
#[must_use]
pub fn solve_resize(request: &ResizeRequest) -> Option<Rect> {
    let ResizeRequest {
        selection,
        handle,
        delta,
        view_bounds,
        min_select_size,
        aspect_ratio,
    } = *request;

    if delta == Vec2::ZERO || !delta.is_finite() {
        return None;
    }
    if !is_valid_rect(selection) || !is_valid_rect(view_bounds) {
        return None;
    }
    let ratio = aspect_ratio.filter(|r| r.is_finite() && *r > 0.0);

    let mut start = Point::new(selection.x0, selection.y0);
    let mut end = Point::new(selection.x1, selection.y1);

    match ratio {
        None => {
            let edges = handle.edges();
            if edges.left {
                start.x += delta.x;
            }
            if edges.right {
                end.x += delta.x;
            }
            if edges.top {
                start.y += delta.y;
            }
            if edges.bottom {
                end.y += delta.y;
            }
        }
        Some(ratio) => {
            let wanted = locked_growth(handle, delta, ratio);
            let growth = limit_growth(view_bounds, handle, selection, wanted, ratio);
            apply_growth(handle, growth, &mut start, &mut end);
        }
    }

    if !is_rect_at_least(start, end, min_select_size, TOLERANCE) {
        if ratio.is_some() {
            if end.y - start.y < selection.height() || end.x - start.x < selection.width() {
                return None;
            }
        } else {
            let safe = clamp_rect_to_min_size(start, end, min_select_size, handle)
                .intersect(view_bounds);
            start = Point::new(safe.x0, safe.y0);
            end = Point::new(safe.x1, safe.y1);
        }
    }

    let mut rect = Rect::from_points(start, end);
    let inside = is_point_in_rect(view_bounds, start, TOLERANCE)
        && is_point_in_rect(view_bounds, end, TOLERANCE);
    if !inside {
        if handle.is_corner() {
            return None;
        }
        rect = contained_rect(view_bounds, rect)?;
    }

    if !is_valid_rect(rect) || rect == selection {
        return None;
    }
    Some(rect)
}

/// The outward direction of a corner, as `(sx, sy)` signs.
fn corner_signs(handle: HandlePosition) -> (f64, f64) {
    match handle {
        HandlePosition::UpperLeft => (-1.0, -1.0),
        HandlePosition::UpperRight => (1.0, -1.0),
        HandlePosition::LowerLeft => (-1.0, 1.0),
        _ => (1.0, 1.0),
    }
}

/// Turns a raw delta into a ratio-consistent growth `(dw, dh)`.
///
/// Positive values grow the selection.
fn locked_growth(handle: HandlePosition, delta: Vec2, ratio: f64) -> Vec2 {
    match handle {
        HandlePosition::Top => Vec2::new(-delta.y * ratio, -delta.y),
        HandlePosition::Bottom => Vec2::new(delta.y * ratio, delta.y),
        HandlePosition::Left => Vec2::new(-delta.x, -delta.x / ratio),
        HandlePosition::Right => Vec2::new(delta.x, delta.x / ratio),
        corner => {
            let (sx, sy) = corner_signs(corner);
            let outward = Vec2::new(sx * delta.x, sy * delta.y);
            // Projection onto the diagonal (ratio, 1), expressed as the height
            // component of the projected vector.
            let dh = (outward.x * ratio + outward.y) / (ratio * ratio + 1.0);
            Vec2::new(dh * ratio, dh)
        }
    }
}

/// Caps a growth pair at the room available on the sides `handle` moves.
fn limit_growth(
    bounds: Rect,
    handle: HandlePosition,
    selection: Rect,
    growth: Vec2,
    ratio: f64,
) -> Vec2 {
    let room_left = selection.x0 - bounds.x0;
    let room_right = bounds.x1 - selection.x1;
    let room_top = selection.y0 - bounds.y0;
    let room_bottom = bounds.y1 - selection.y1;
    let spare_width = bounds.width() - selection.width();
    let spare_height = bounds.height() - selection.height();

    let (max_dw, max_dh) = match handle {
        HandlePosition::Top => (spare_width, room_top),
        HandlePosition::Bottom => (spare_width, room_bottom),
        HandlePosition::Left => (room_left, spare_height),
        HandlePosition::Right => (room_right, spare_height),
        HandlePosition::UpperLeft => (room_left, room_top),
        HandlePosition::UpperRight => (room_right, room_top),
        HandlePosition::LowerLeft => (room_left, room_bottom),
        HandlePosition::LowerRight => (room_right, room_bottom),
    };

    let mut out = growth;
    if out.x > max_dw {
        out.x = max_dw;
        out.y = out.x / ratio;
    }
    if out.y > max_dh {
        out.y = max_dh;
        out.x = out.y * ratio;
    }
    out
}

fn apply_growth(handle: HandlePosition, growth: Vec2, start: &mut Point, end: &mut Point) {
    let Vec2 { x: dw, y: dh } = growth;
    match handle {
        HandlePosition::Top => {
            start.x -= dw / 2.0;
            end.x += dw / 2.0;
            start.y -= dh;
        }
        HandlePosition::Bottom => {
            start.x -= dw / 2.0;
            end.x += dw / 2.0;
            end.y += dh;
        }
        HandlePosition::Left => {
            start.y -= dh / 2.0;
            end.y += dh / 2.0;
            start.x -= dw;
        }
        HandlePosition::Right => {
            start.y -= dh / 2.0;
            end.y += dh / 2.0;
            end.x += dw;
        }
        HandlePosition::UpperLeft => {
            start.x -= dw;
            start.y -= dh;
        }
        HandlePosition::UpperRight => {
            end.x += dw;
            start.y -= dh;
        }
        HandlePosition::LowerLeft => {
            start.x -= dw;
            end.y += dh;
        }
        HandlePosition::LowerRight => {
            end.x += dw;
            end.y += dh;
        }
    }
}
