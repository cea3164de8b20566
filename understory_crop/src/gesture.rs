// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-pointer gesture routing for a [`CropRegionState`].
//!
//! ## Usage
//!
//! 1) On pointer down, call [`CropGesture::begin`]; it decides whether the
//!    press grabs a handle, starts drawing, or pans the image.
//! 2) On each pointer move, call [`CropGesture::pointer_moved`] and repaint
//!    with the returned [`CropUpdate`].
//! 3) On pointer up, call [`CropGesture::end`] to commit the gesture.
//! 4) Route wheel input to [`CropGesture::wheel`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_crop::{CropGesture, CropRegionState, GestureTarget, HandlePosition};
//!
//! let mut crop = CropRegionState::default();
//! crop.set_canvas_size(Size::new(800.0, 400.0));
//! crop.load_image(2000.0, 1000.0).unwrap();
//!
//! let mut gesture = CropGesture::default();
//! let target = gesture.begin(&crop, Point::new(2.0, 2.0));
//! assert_eq!(target, Some(GestureTarget::Handle(HandlePosition::UpperLeft)));
//!
//! gesture.pointer_moved(&mut crop, Point::new(102.0, 52.0));
//! gesture.end(&mut crop);
//! assert_eq!(crop.cropped_region(), Some(Rect::new(250.0, 125.0, 2000.0, 1000.0)));
//! ```

use kurbo::{Point, Vec2};

use crate::geometry::clamp_point_to_rect;
use crate::handle::HandlePosition;
use crate::state::{CropRegionState, CropUpdate};

/// Default handle grab radius in display units.
pub const HANDLE_HIT_RADIUS: f64 = 12.0;

/// Zoom step per wheel notch, in percent.
pub const WHEEL_ZOOM_STEP: f64 = 8.0;

/// What a pointer press is acting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureTarget {
    /// Dragging a resize handle.
    Handle(HandlePosition),
    /// Drawing a new selection.
    Draw,
    /// Dragging the image behind the selection.
    Pan,
}

/// Tracks one pointer drag and forwards it to a [`CropRegionState`].
#[derive(Clone, Copy, Debug)]
pub struct CropGesture {
    target: Option<GestureTarget>,
    start_pos: Option<Point>,
    last_pos: Option<Point>,
    /// Where the grabbed handle currently sits.
    thumb: Point,
    /// Handle position relative to the pointer at press time.
    grab_offset: Vec2,
    hit_radius: f64,
}

impl Default for CropGesture {
    fn default() -> Self {
        Self::new(HANDLE_HIT_RADIUS)
    }
}

impl CropGesture {
    /// Creates an idle gesture tracker grabbing handles within `hit_radius`.
    #[must_use]
    pub fn new(hit_radius: f64) -> Self {
        Self {
            target: None,
            start_pos: None,
            last_pos: None,
            thumb: Point::ZERO,
            grab_offset: Vec2::ZERO,
            hit_radius,
        }
    }

    /// The target of the gesture in progress.
    #[must_use]
    pub fn target(&self) -> Option<GestureTarget> {
        self.target
    }

    /// Returns `true` while a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    /// Starts a gesture at `pos` (display space).
    ///
    /// Visible handles win over everything else. Otherwise the press draws
    /// while a [draw session](crate::InteractionMode::Draw) is waiting for
    /// its selection, or pans when it lands on the image and panning is
    /// enabled.
    /// Returns `None` if the press is ignored.
    pub fn begin(&mut self, state: &CropRegionState, pos: Point) -> Option<GestureTarget> {
        self.reset();
        let config = state.config();
        if !config.enabled {
            return None;
        }
        let handles = state.handles();
        let target = if let Some(handle) = handles.hit_test(pos, self.hit_radius) {
            self.thumb = handles.point(handle);
            self.grab_offset = self.thumb - pos;
            GestureTarget::Handle(handle)
        } else if state.is_awaiting_draw() {
            GestureTarget::Draw
        } else if config.pan_enabled && state.view_bounds()?.contains(pos) {
            GestureTarget::Pan
        } else {
            return None;
        };
        self.target = Some(target);
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        Some(target)
    }

    /// Feeds a pointer move; returns the state's update if it changed.
    pub fn pointer_moved(&mut self, state: &mut CropRegionState, pos: Point) -> Option<CropUpdate> {
        let target = self.target?;
        let last = self.last_pos?;
        self.last_pos = Some(pos);
        match target {
            GestureTarget::Handle(handle) => {
                let bounds = state.view_bounds()?;
                let next = clamp_point_to_rect(bounds, pos + self.grab_offset);
                let update = state.resize_via_handle(handle, next - self.thumb)?;
                self.thumb = update.handles.point(handle);
                Some(update)
            }
            GestureTarget::Draw => state.draw_selection(self.start_pos?, pos),
            // The image follows the pointer, so the selection moves against it.
            GestureTarget::Pan => state.pan(last - pos),
        }
    }

    /// Ends the gesture, committing handle drags and draws.
    pub fn end(&mut self, state: &mut CropRegionState) -> Option<CropUpdate> {
        let target = self.target;
        self.reset();
        match target? {
            GestureTarget::Handle(_) | GestureTarget::Draw => state.finish_gesture(),
            GestureTarget::Pan => None,
        }
    }

    /// Zooms one wheel notch around `pos`; positive `notches` zoom in.
    pub fn wheel(
        &self,
        state: &mut CropRegionState,
        notches: f64,
        pos: Point,
    ) -> Option<CropUpdate> {
        if self.is_active() || notches == 0.0 || !notches.is_finite() {
            return None;
        }
        let percent = if notches > 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            -WHEEL_ZOOM_STEP
        };
        state.zoom(percent, pos)
    }

    fn reset(&mut self) {
        self.target = None;
        self.start_pos = None;
        self.last_pos = None;
    }
}
