// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

use crate::config::{CropConfig, CropShape, InteractionMode};
use crate::error::CropError;
use crate::geometry::{
    TOLERANCE, can_contain, clamp_point_to_rect, contained_rect, has_aspect_ratio, is_valid_rect,
    is_valid_size, min_size_for_ratio, uniform_fit,
};
use crate::handle::{HandlePlacement, HandlePosition, HandleSet};
use crate::layout::ViewportLayout;
use crate::map::AffineMap;
use crate::mask::MaskGeometry;
use crate::resize::{ResizeRequest, solve_resize};

/// Lifecycle phase of a [`CropRegionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropPhase {
    /// No image is loaded; every mutating operation is a no-op.
    Uninitialized,
    /// An image is loaded and the crop rectangle is valid.
    Ready,
}

/// Everything a renderer needs after an accepted change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropUpdate {
    /// Selection rectangle in display space.
    pub selection: Rect,
    /// Handle positions and visibility.
    pub handles: HandleSet,
    /// Overlay geometry, or `None` while cropping is disabled.
    pub mask: Option<MaskGeometry>,
}

#[derive(Clone, Copy, Debug)]
struct Session {
    image_bounds: Rect,
    crop_rect: Rect,
    layout: Option<ViewportLayout>,
    /// In [`InteractionMode::Draw`], whether the user has drawn a selection yet.
    drawn: bool,
}

/// Authoritative crop state for one cropping session.
///
/// The crop rectangle lives in image pixels and is the value callers read
/// back. Everything in display space (the forward and inverse maps, the view
/// bounds, the selection, the handles, and the mask) is derived from it and the
/// canvas size, and is recomputed synchronously by every setter. Callers never
/// observe a partially updated state.
///
/// Handle drags ([`CropRegionState::resize_via_handle`]) and drawing
/// ([`CropRegionState::draw_selection`]) keep the current display mapping so
/// the selection tracks the pointer; [`CropRegionState::finish_gesture`]
/// re-fits the view around the result. Pan and zoom re-fit immediately.
///
/// ```rust
/// use kurbo::{Rect, Size, Vec2};
/// use understory_crop::{CropRegionState, HandlePosition};
///
/// let mut crop = CropRegionState::default();
/// crop.set_canvas_size(Size::new(800.0, 400.0));
/// crop.load_image(2000.0, 1000.0).unwrap();
/// assert_eq!(crop.cropped_region(), Some(Rect::new(0.0, 0.0, 2000.0, 1000.0)));
///
/// let update = crop
///     .resize_via_handle(HandlePosition::UpperLeft, Vec2::new(100.0, 50.0))
///     .unwrap();
/// assert_eq!(update.selection, Rect::new(100.0, 50.0, 800.0, 400.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CropRegionState {
    config: CropConfig,
    canvas: Size,
    session: Option<Session>,
}

impl CropRegionState {
    /// Creates an empty state with the given configuration.
    #[must_use]
    pub fn new(config: CropConfig) -> Self {
        Self {
            config,
            canvas: Size::ZERO,
            session: None,
        }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> CropPhase {
        if self.session.is_some() {
            CropPhase::Ready
        } else {
            CropPhase::Uninitialized
        }
    }

    /// Returns the canvas size last supplied by the caller.
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// The full image extent in pixels.
    #[must_use]
    pub fn image_bounds(&self) -> Option<Rect> {
        self.session.map(|s| s.image_bounds)
    }

    /// The crop rectangle in image pixels.
    #[must_use]
    pub fn cropped_region(&self) -> Option<Rect> {
        self.session.map(|s| s.crop_rect)
    }

    /// The current display layout, if an image is loaded and the canvas has area.
    #[must_use]
    pub fn layout(&self) -> Option<ViewportLayout> {
        self.session.and_then(|s| s.layout)
    }

    /// The image projected into display space.
    #[must_use]
    pub fn view_bounds(&self) -> Option<Rect> {
        self.layout().map(|l| l.view_bounds)
    }

    /// The selection rectangle in display space.
    #[must_use]
    pub fn selection_rect(&self) -> Option<Rect> {
        self.layout().map(|l| l.selection)
    }

    /// Image space → display space.
    #[must_use]
    pub fn forward_map(&self) -> Option<AffineMap> {
        self.layout().map(|l| l.forward)
    }

    /// Display space → image space.
    #[must_use]
    pub fn inverse_map(&self) -> Option<AffineMap> {
        self.layout().map(|l| l.inverse)
    }

    /// The enforced aspect ratio (`1.0` for circular crops).
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.config.effective_aspect_ratio()
    }

    /// Smallest allowed crop rectangle in image pixels.
    ///
    /// The shorter side is the configured minimum pixel length; with a locked
    /// ratio the longer side is stretched to match.
    #[must_use]
    pub fn min_crop_size(&self) -> Size {
        let ratio = self.aspect_ratio().unwrap_or(1.0);
        min_size_for_ratio(self.config.min_crop_pixel_length, ratio)
    }

    /// Smallest allowed selection rectangle in display units.
    ///
    /// This is the projected [`CropRegionState::min_crop_size`], unless that
    /// projection is shorter than the configured minimum select length, in
    /// which case the select length (shaped by the ratio) wins. Zoomed far
    /// out, a pixel minimum alone would collapse to nothing on screen.
    #[must_use]
    pub fn min_select_size(&self) -> Size {
        let ratio = self.aspect_ratio().unwrap_or(1.0);
        let fallback = min_size_for_ratio(self.config.min_select_length, ratio);
        match self.layout() {
            Some(layout) => {
                let projected = layout.forward.transform_size(self.min_crop_size());
                if projected.width.min(projected.height) < self.config.min_select_length {
                    fallback
                } else {
                    projected
                }
            }
            None => fallback,
        }
    }

    /// The eight handles on the current selection.
    ///
    /// All handles are hidden without a layout, while disabled, or while a
    /// draw session has not produced a selection yet. Circular crops show
    /// only the edge handles; [`HandlePlacement::Corners`] shows only corners.
    #[must_use]
    pub fn handles(&self) -> HandleSet {
        let Some(session) = self.session else {
            return HandleSet::default();
        };
        let Some(layout) = session.layout else {
            return HandleSet::default();
        };
        let awaiting_draw = self.config.interaction == InteractionMode::Draw && !session.drawn;
        let shown = self.config.enabled && !awaiting_draw;
        let (corners, edges) = match self.config.shape {
            CropShape::Circular => (false, true),
            CropShape::Rectangular => (
                true,
                self.config.handle_placement == HandlePlacement::All,
            ),
        };
        HandleSet::new(layout.selection, shown && corners, shown && edges)
    }

    /// The overlay geometry, or `None` while disabled or without a layout.
    #[must_use]
    pub fn mask(&self) -> Option<MaskGeometry> {
        if !self.config.enabled {
            return None;
        }
        let layout = self.layout()?;
        Some(MaskGeometry::new(
            self.canvas,
            layout.selection,
            self.config.shape,
        ))
    }

    /// Snapshot of the current display state.
    #[must_use]
    pub fn update(&self) -> Option<CropUpdate> {
        let layout = self.layout()?;
        Some(CropUpdate {
            selection: layout.selection,
            handles: self.handles(),
            mask: self.mask(),
        })
    }

    /// Returns `true` while a draw session is waiting for its first selection.
    #[must_use]
    pub fn is_awaiting_draw(&self) -> bool {
        self.config.interaction == InteractionMode::Draw
            && self.session.is_some_and(|s| !s.drawn)
    }

    /// Sets the canvas size and re-fits the layout.
    pub fn set_canvas_size(&mut self, size: Size) -> Option<CropUpdate> {
        self.canvas = size;
        self.relayout();
        self.update()
    }

    /// Adopts a `width` × `height` image and resets the crop rectangle.
    ///
    /// The crop starts as the whole image, or the largest centered rectangle
    /// of the locked ratio. An image smaller than the minimum crop size is
    /// refused and leaves the state uninitialized.
    pub fn load_image(&mut self, width: f64, height: f64) -> Result<(), CropError> {
        let image_bounds = Rect::new(0.0, 0.0, width, height);
        if !is_valid_rect(image_bounds) {
            return Err(CropError::InvalidGeometry);
        }
        let min = self.min_crop_size();
        if width < min.width || height < min.height {
            log::warn!(
                "refusing {width}x{height} image: smaller than minimum crop {}x{}",
                min.width,
                min.height
            );
            self.session = None;
            return Err(CropError::ImageTooSmall { width, height, min });
        }
        self.session = Some(Session {
            image_bounds,
            crop_rect: self.initial_crop(image_bounds),
            layout: None,
            drawn: false,
        });
        self.relayout();
        Ok(())
    }

    /// Drops the image and returns to [`CropPhase::Uninitialized`].
    pub fn clear_image(&mut self) {
        self.session = None;
    }

    /// Restores the initial crop rectangle for the loaded image.
    ///
    /// Also re-arms drawing in [`InteractionMode::Draw`].
    pub fn reset(&mut self) -> Option<CropUpdate> {
        let mut session = self.session?;
        session.crop_rect = self.initial_crop(session.image_bounds);
        session.drawn = false;
        self.session = Some(session);
        self.relayout();
        self.update()
    }

    /// Replaces the crop rectangle with `rect`, given in image pixels.
    ///
    /// The region must be at least the minimum crop size, lie inside the
    /// image, and match the locked ratio. All checks run before anything
    /// changes; a rejected region leaves the state untouched.
    pub fn set_cropped_region(&mut self, rect: Rect) -> Result<(), CropError> {
        let Some(mut session) = self.session else {
            return Err(CropError::NoImage);
        };
        if !is_valid_rect(rect) {
            return Err(CropError::InvalidGeometry);
        }
        let min = self.min_crop_size();
        if rect.width() < min.width || rect.height() < min.height {
            return Err(CropError::BelowMinimumSize { min });
        }
        let image = session.image_bounds;
        if rect.x0 < image.x0 || rect.y0 < image.y0 || rect.x1 > image.x1 || rect.y1 > image.y1 {
            return Err(CropError::OutOfBounds);
        }
        if let Some(expected) = self.aspect_ratio() {
            if !has_aspect_ratio(rect, expected) {
                return Err(CropError::AspectRatioMismatch {
                    expected,
                    actual: rect.width() / rect.height(),
                });
            }
        }
        session.crop_rect = rect;
        self.session = Some(session);
        self.relayout();
        Ok(())
    }

    /// Drags `handle` by `delta` display units.
    ///
    /// Returns `None` if the step was rejected; the selection is unchanged.
    pub fn resize_via_handle(&mut self, handle: HandlePosition, delta: Vec2) -> Option<CropUpdate> {
        let (_, layout) = self.interactive()?;
        let request = ResizeRequest {
            selection: layout.selection,
            handle,
            delta,
            view_bounds: layout.view_bounds,
            min_select_size: self.min_select_size(),
            aspect_ratio: self.aspect_ratio(),
        };
        let Some(selection) = solve_resize(&request) else {
            log::debug!("resize via {handle:?} by {delta:?} rejected");
            return None;
        };
        self.adopt_selection(selection);
        self.update()
    }

    /// Draws a fresh selection spanning `anchor` to `current` (display space).
    ///
    /// Both points are clamped into the view bounds. With a locked ratio the
    /// selection is the largest rectangle of that ratio anchored at `anchor`
    /// and fitting inside the dragged span. A selection below the minimum
    /// select size is rejected.
    pub fn draw_selection(&mut self, anchor: Point, current: Point) -> Option<CropUpdate> {
        let (_, layout) = self.interactive()?;
        let bounds = layout.view_bounds;
        let a = clamp_point_to_rect(bounds, anchor);
        let c = clamp_point_to_rect(bounds, current);
        let selection = match self.aspect_ratio() {
            None => Rect::from_points(a, c),
            Some(ratio) => span_with_ratio(a, c, ratio),
        };
        let min = self.min_select_size();
        if selection.width() + TOLERANCE < min.width || selection.height() + TOLERANCE < min.height
        {
            log::debug!("drawn selection {selection:?} is below minimum {min:?}");
            return None;
        }
        self.adopt_selection(selection);
        if let Some(session) = self.session.as_mut() {
            session.drawn = true;
        }
        self.update()
    }

    /// Ends a handle drag or draw gesture and re-fits the view around the
    /// resulting crop rectangle.
    pub fn finish_gesture(&mut self) -> Option<CropUpdate> {
        self.session?;
        self.relayout();
        self.update()
    }

    /// Moves the selection by `delta` display units and re-fits the view.
    ///
    /// The delta is reduced per axis so the selection stops exactly at the
    /// view bounds. Returns `None` if nothing moved.
    pub fn pan(&mut self, delta: Vec2) -> Option<CropUpdate> {
        let (mut session, layout) = self.interactive()?;
        if !delta.is_finite() {
            return None;
        }
        let sel = layout.selection;
        let bounds = layout.view_bounds;
        let dx = if delta.x > 0.0 {
            delta.x.min(bounds.x1 - sel.x1)
        } else {
            delta.x.max(bounds.x0 - sel.x0)
        };
        let dy = if delta.y > 0.0 {
            delta.y.min(bounds.y1 - sel.y1)
        } else {
            delta.y.max(bounds.y0 - sel.y0)
        };
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        let moved = sel + Vec2::new(dx, dy);
        session.crop_rect = layout.crop_for_selection(moved, session.image_bounds);
        self.session = Some(session);
        self.relayout();
        self.update()
    }

    /// Zooms by `percent` around `center` (display space) and re-fits the view.
    ///
    /// Positive values zoom in (the selection shrinks), negative values zoom
    /// out. Each edge moves in proportion to its distance from `center`, so
    /// the point under the pointer stays put. Zooming in past the minimum crop
    /// size is rejected, as is any `percent` of `100` or more; zooming out
    /// past the image is settled back inside it.
    pub fn zoom(&mut self, percent: f64, center: Point) -> Option<CropUpdate> {
        let (mut session, layout) = self.interactive()?;
        // At 100% or more the edges would meet or cross.
        if !percent.is_finite() || percent == 0.0 || percent >= 100.0 {
            return None;
        }
        let sel = layout.selection;
        if !is_valid_rect(sel) {
            return None;
        }
        let c = clamp_point_to_rect(sel, center);
        let left_share = (c.x - sel.x0) / sel.width();
        let top_share = (c.y - sel.y0) / sel.height();
        let step = percent / 100.0;
        let moved_x = sel.width() * step;
        let moved_y = sel.height() * step;
        let zoomed = Rect::new(
            sel.x0 + moved_x * left_share,
            sel.y0 + moved_y * top_share,
            sel.x1 - moved_x * (1.0 - left_share),
            sel.y1 - moved_y * (1.0 - top_share),
        );
        if !is_valid_rect(zoomed) {
            return None;
        }
        let crop = layout.inverse.transform_rect(zoomed);
        let min = self.min_crop_size();
        if !(crop.width() > min.width && crop.height() > min.height) {
            log::debug!("zoom by {percent}% rejected: crop {crop:?} below minimum {min:?}");
            return None;
        }
        let locked = self.aspect_ratio().is_some();
        let crop = settle_in_image(crop, session.image_bounds, locked)?;
        if crop == session.crop_rect {
            return None;
        }
        session.crop_rect = crop;
        self.session = Some(session);
        self.relayout();
        self.update()
    }

    /// Locks (`Some`) or unlocks (`None`) the aspect ratio.
    ///
    /// Non-positive or non-finite ratios unlock. On lock, the selection is
    /// re-fit to the ratio around its own center and kept inside the view
    /// bounds. If no rectangle of that ratio satisfies the minimum crop size
    /// inside the image, the lock is dropped and the crop is left unchanged.
    ///
    /// While the shape is circular the ratio is stored but has no effect.
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> Result<(), CropError> {
        self.config.aspect_ratio = ratio.filter(|r| r.is_finite() && *r > 0.0);
        if self.config.shape == CropShape::Circular {
            return Ok(());
        }
        self.enforce_aspect_ratio().inspect_err(|_| {
            log::warn!("dropping aspect ratio lock {ratio:?}: no valid region");
            self.config.aspect_ratio = None;
        })
    }

    /// Switches the crop shape.
    ///
    /// Circular crops lock a `1:1` ratio and re-fit like
    /// [`CropRegionState::set_aspect_ratio`]. If the re-fit is impossible the
    /// shape change is undone (for circles) or the ratio lock dropped.
    pub fn set_crop_shape(&mut self, shape: CropShape) -> Result<(), CropError> {
        let previous = self.config.shape;
        self.config.shape = shape;
        self.enforce_aspect_ratio().inspect_err(|_| match shape {
            CropShape::Circular => {
                log::warn!("cannot switch to a circular crop: no valid square region");
                self.config.shape = previous;
            }
            CropShape::Rectangular => {
                log::warn!("dropping aspect ratio lock: no valid region");
                self.config.aspect_ratio = None;
            }
        })
    }

    /// Sets the minimum crop edge length in image pixels.
    ///
    /// Takes effect for subsequent operations; the current crop is kept.
    pub fn set_min_crop_pixel_length(&mut self, length: f64) -> Result<(), CropError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(CropError::InvalidGeometry);
        }
        self.config.min_crop_pixel_length = length;
        Ok(())
    }

    /// Sets the minimum selection edge length in display units.
    pub fn set_min_select_length(&mut self, length: f64) -> Result<(), CropError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(CropError::InvalidGeometry);
        }
        self.config.min_select_length = length;
        Ok(())
    }

    /// Chooses which handles a rectangular crop offers.
    pub fn set_handle_placement(&mut self, placement: HandlePlacement) -> Option<CropUpdate> {
        self.config.handle_placement = placement;
        self.update()
    }

    /// Enables or disables cropping. While disabled, gestures are ignored and
    /// handles and mask are hidden.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<CropUpdate> {
        self.config.enabled = enabled;
        self.update()
    }

    /// Enables or disables panning by dragging the image.
    pub fn set_pan_enabled(&mut self, enabled: bool) {
        self.config.pan_enabled = enabled;
    }

    /// Sets how presses away from the handles are interpreted.
    pub fn set_interaction_mode(&mut self, mode: InteractionMode) -> Option<CropUpdate> {
        self.config.interaction = mode;
        self.update()
    }

    /// Re-arms drawing so the next draw gesture replaces the selection.
    pub fn reset_draw(&mut self) -> Option<CropUpdate> {
        if let Some(session) = self.session.as_mut() {
            session.drawn = false;
        }
        self.update()
    }

    fn initial_crop(&self, image_bounds: Rect) -> Rect {
        match self.aspect_ratio() {
            Some(ratio) => uniform_fit(image_bounds, ratio),
            None => image_bounds,
        }
    }

    /// Session and layout for gesture operations, if enabled and laid out.
    fn interactive(&self) -> Option<(Session, ViewportLayout)> {
        if !self.config.enabled {
            return None;
        }
        let session = self.session?;
        Some((session, session.layout?))
    }

    fn relayout(&mut self) {
        let canvas = self.canvas;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match ViewportLayout::fit(canvas, session.crop_rect, session.image_bounds) {
            Some(layout) => {
                log::trace!(
                    "layout: scale {} selection {:?}",
                    layout.scale(),
                    layout.selection
                );
                session.layout = Some(layout);
            }
            None if !is_valid_size(canvas) => session.layout = None,
            None => {}
        }
    }

    /// Stores a new display selection under the current mapping and derives
    /// the crop rectangle from it.
    fn adopt_selection(&mut self, selection: Rect) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(layout) = session.layout.as_mut() else {
            return;
        };
        layout.selection = selection;
        session.crop_rect = layout.crop_for_selection(selection, session.image_bounds);
    }

    fn enforce_aspect_ratio(&mut self) -> Result<(), CropError> {
        let Some(ratio) = self.aspect_ratio() else {
            return Ok(());
        };
        let Some(mut session) = self.session else {
            // Applied when an image is loaded.
            return Ok(());
        };
        let min_len = self.config.min_crop_pixel_length;
        let fitted = match session.layout {
            Some(layout) => fit_to_ratio(
                layout.selection,
                layout.view_bounds,
                ratio,
                min_len * layout.scale(),
            )
            .map(|sel| layout.crop_for_selection(sel, session.image_bounds)),
            None => fit_to_ratio(session.crop_rect, session.image_bounds, ratio, min_len)
                .map(|crop| crop.intersect(session.image_bounds)),
        };
        let Some(crop) = fitted else {
            return Err(CropError::AspectRatioUnsatisfiable { ratio });
        };
        session.crop_rect = crop;
        self.session = Some(session);
        self.relayout();
        Ok(())
    }
}

/// Re-fits `current` to `ratio` around its own center.
///
/// The result is the ratio rectangle inscribed in the square bounding the
/// current selection, shrunk to `bounds` if larger, grown to `min_len` if
/// smaller, and finally translated inside `bounds`.
fn fit_to_ratio(current: Rect, bounds: Rect, ratio: f64, min_len: f64) -> Option<Rect> {
    if !is_valid_rect(current) || !is_valid_rect(bounds) {
        return None;
    }
    let side = current.width().max(current.height());
    let square = Rect::from_center_size(current.center(), Size::new(side, side));
    let mut fitted = uniform_fit(square, ratio);
    if fitted.width() > bounds.width() || fitted.height() > bounds.height() {
        fitted = uniform_fit(bounds, ratio);
    }
    let shortest = fitted.width().min(fitted.height());
    if shortest < min_len {
        let grown = fitted.size() * (min_len / shortest);
        fitted = Rect::from_center_size(fitted.center(), grown);
        if !can_contain(bounds, fitted) {
            return None;
        }
    }
    contained_rect(bounds, fitted)
}

/// The largest `ratio` rectangle anchored at `anchor` inside the span to `current`.
fn span_with_ratio(anchor: Point, current: Point, ratio: f64) -> Rect {
    let dx = current.x - anchor.x;
    let dy = current.y - anchor.y;
    let (raw_w, raw_h) = (dx.abs(), dy.abs());
    let (w, h) = if raw_w / ratio <= raw_h {
        (raw_w, raw_w / ratio)
    } else {
        (raw_h * ratio, raw_h)
    };
    let x = if dx >= 0.0 { anchor.x } else { anchor.x - w };
    let y = if dy >= 0.0 { anchor.y } else { anchor.y - h };
    Rect::new(x, y, x + w, y + h)
}

/// Moves a zoomed-out crop back inside the image.
///
/// A crop that no longer fits is shrunk: to the largest rectangle of its own
/// ratio when `locked`, otherwise per axis around its center.
fn settle_in_image(crop: Rect, image: Rect, locked: bool) -> Option<Rect> {
    if let Some(inside) = contained_rect(image, crop) {
        return Some(inside);
    }
    if locked {
        return Some(uniform_fit(image, crop.width() / crop.height()));
    }
    let size = Size::new(
        crop.width().min(image.width()),
        crop.height().min(image.height()),
    );
    contained_rect(image, Rect::from_center_size(crop.center(), size))
}
