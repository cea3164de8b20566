// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The eight resize handles and their derived display positions.

use kurbo::{Point, Rect};

/// Identifies one of the eight draggable handles on the selection rectangle.
///
/// Corner handles resize two axes at once; edge handles resize one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlePosition {
    /// Midpoint of the top edge.
    Top,
    /// Midpoint of the bottom edge.
    Bottom,
    /// Midpoint of the left edge.
    Left,
    /// Midpoint of the right edge.
    Right,
    /// Top-left corner.
    UpperLeft,
    /// Top-right corner.
    UpperRight,
    /// Bottom-left corner.
    LowerLeft,
    /// Bottom-right corner.
    LowerRight,
}

/// Which edges of the selection a handle moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    /// Moves the left edge (`x0`).
    pub left: bool,
    /// Moves the right edge (`x1`).
    pub right: bool,
    /// Moves the top edge (`y0`).
    pub top: bool,
    /// Moves the bottom edge (`y1`).
    pub bottom: bool,
}

impl HandlePosition {
    /// All handles, in index order.
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::UpperLeft,
        Self::UpperRight,
        Self::LowerLeft,
        Self::LowerRight,
    ];

    /// Stable index into per-handle arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::UpperLeft => 4,
            Self::UpperRight => 5,
            Self::LowerLeft => 6,
            Self::LowerRight => 7,
        }
    }

    /// Returns `true` for the four corner handles.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::UpperLeft | Self::UpperRight | Self::LowerLeft | Self::LowerRight
        )
    }

    /// The edges this handle owns.
    #[must_use]
    pub const fn edges(self) -> Edges {
        let (left, right, top, bottom) = match self {
            Self::Top => (false, false, true, false),
            Self::Bottom => (false, false, false, true),
            Self::Left => (true, false, false, false),
            Self::Right => (false, true, false, false),
            Self::UpperLeft => (true, false, true, false),
            Self::UpperRight => (false, true, true, false),
            Self::LowerLeft => (true, false, false, true),
            Self::LowerRight => (false, true, false, true),
        };
        Edges {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Where this handle sits on `rect`.
    #[must_use]
    pub fn anchor_on(self, rect: Rect) -> Point {
        let c = rect.center();
        match self {
            Self::Top => Point::new(c.x, rect.y0),
            Self::Bottom => Point::new(c.x, rect.y1),
            Self::Left => Point::new(rect.x0, c.y),
            Self::Right => Point::new(rect.x1, c.y),
            Self::UpperLeft => Point::new(rect.x0, rect.y0),
            Self::UpperRight => Point::new(rect.x1, rect.y0),
            Self::LowerLeft => Point::new(rect.x0, rect.y1),
            Self::LowerRight => Point::new(rect.x1, rect.y1),
        }
    }
}

/// Which handles are offered for a rectangular crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HandlePlacement {
    /// Corners plus the four edge midpoints.
    #[default]
    All,
    /// Corners only.
    Corners,
}

/// Display position and visibility of one handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleState {
    /// Which handle this is.
    pub position: HandlePosition,
    /// Center of the handle in display space.
    pub point: Point,
    /// Whether the handle should be drawn and hit-tested.
    pub visible: bool,
}

/// The eight handles, indexed by [`HandlePosition`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleSet {
    points: [Point; 8],
    visible: [bool; 8],
}

impl Default for HandleSet {
    fn default() -> Self {
        Self {
            points: [Point::ZERO; 8],
            visible: [false; 8],
        }
    }
}

impl HandleSet {
    /// Lays the handles out on `selection` with the given visibility split.
    #[must_use]
    pub fn new(selection: Rect, corners_visible: bool, edges_visible: bool) -> Self {
        let mut set = Self::default();
        for handle in HandlePosition::ALL {
            let i = handle.index();
            set.points[i] = handle.anchor_on(selection);
            set.visible[i] = if handle.is_corner() {
                corners_visible
            } else {
                edges_visible
            };
        }
        set
    }

    /// Returns the state of a single handle.
    #[must_use]
    pub fn get(&self, handle: HandlePosition) -> HandleState {
        let i = handle.index();
        HandleState {
            position: handle,
            point: self.points[i],
            visible: self.visible[i],
        }
    }

    /// Display position of `handle`.
    #[must_use]
    pub fn point(&self, handle: HandlePosition) -> Point {
        self.points[handle.index()]
    }

    /// Whether `handle` is visible.
    #[must_use]
    pub fn is_visible(&self, handle: HandlePosition) -> bool {
        self.visible[handle.index()]
    }

    /// Iterates all eight handles in [`HandlePosition::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = HandleState> + '_ {
        HandlePosition::ALL.into_iter().map(|h| self.get(h))
    }

    /// Finds the visible handle under `pt`.
    ///
    /// Corners are tested first so that they win where they overlap edge
    /// handles on small selections; within a group the nearest handle inside
    /// `radius` wins.
    #[must_use]
    pub fn hit_test(&self, pt: Point, radius: f64) -> Option<HandlePosition> {
        let r2 = radius * radius;
        let nearest = |corners: bool| {
            let mut best: Option<(f64, HandlePosition)> = None;
            for handle in HandlePosition::ALL {
                if handle.is_corner() != corners || !self.is_visible(handle) {
                    continue;
                }
                let d2 = (self.point(handle) - pt).hypot2();
                if d2 <= r2 && best.is_none_or(|(b, _)| d2 < b) {
                    best = Some((d2, handle));
                }
            }
            best.map(|(_, h)| h)
        };
        nearest(true).or_else(|| nearest(false))
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};

    use super::{HandlePosition, HandleSet};

    #[test]
    fn indices_are_dense_and_unique() {
        let mut seen = [false; 8];
        for h in HandlePosition::ALL {
            assert!(!seen[h.index()]);
            seen[h.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn corners_own_two_edges_and_sides_own_one() {
        for h in HandlePosition::ALL {
            let e = h.edges();
            let owned = [e.left, e.right, e.top, e.bottom]
                .iter()
                .filter(|b| **b)
                .count();
            assert_eq!(owned, if h.is_corner() { 2 } else { 1 });
        }
    }

    #[test]
    fn handles_sit_on_corners_and_midpoints() {
        let sel = Rect::new(100.0, 50.0, 300.0, 250.0);
        let set = HandleSet::new(sel, true, true);
        assert_eq!(set.point(HandlePosition::Top), Point::new(200.0, 50.0));
        assert_eq!(set.point(HandlePosition::Bottom), Point::new(200.0, 250.0));
        assert_eq!(set.point(HandlePosition::Left), Point::new(100.0, 150.0));
        assert_eq!(set.point(HandlePosition::Right), Point::new(300.0, 150.0));
        assert_eq!(set.point(HandlePosition::UpperLeft), Point::new(100.0, 50.0));
        assert_eq!(set.point(HandlePosition::LowerRight), Point::new(300.0, 250.0));
    }

    #[test]
    fn hit_test_prefers_corners_and_skips_hidden() {
        let sel = Rect::new(0.0, 0.0, 20.0, 20.0);
        let set = HandleSet::new(sel, true, true);
        // (2, 2) is within 12px of both UpperLeft and Top/Left midpoints.
        assert_eq!(
            set.hit_test(Point::new(2.0, 2.0), 12.0),
            Some(HandlePosition::UpperLeft)
        );

        let corners_hidden = HandleSet::new(sel, false, true);
        let hit = corners_hidden.hit_test(Point::new(2.0, 2.0), 12.0);
        assert!(matches!(
            hit,
            Some(HandlePosition::Top | HandlePosition::Left)
        ));

        assert_eq!(set.hit_test(Point::new(100.0, 100.0), 12.0), None);
    }
}
