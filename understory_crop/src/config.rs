// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::handle::HandlePlacement;

/// Shape of the crop region as presented to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CropShape {
    /// Rectangular crop; honors the configured aspect ratio, if any.
    #[default]
    Rectangular,
    /// Circular crop; always behaves as a locked `1:1` ratio.
    Circular,
}

/// How a pointer press on the image (not on a handle) is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Dragging pans the image under a fixed-size selection.
    #[default]
    Move,
    /// The first drag draws a fresh selection. Once drawn, the session falls
    /// back to [`InteractionMode::Move`] behavior until re-armed with
    /// [`CropRegionState::reset_draw`](crate::CropRegionState::reset_draw).
    Draw,
}

/// Tunables for a [`CropRegionState`](crate::CropRegionState).
///
/// Every field has a matching setter on the state, which re-derives dependent
/// geometry immediately.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropConfig {
    /// Requested `width / height` lock. `None` is free-form.
    ///
    /// Ignored while [`CropConfig::shape`] is [`CropShape::Circular`].
    pub aspect_ratio: Option<f64>,
    /// Crop shape.
    pub shape: CropShape,
    /// Shortest allowed crop edge, in image pixels.
    pub min_crop_pixel_length: f64,
    /// Shortest allowed selection edge, in display units.
    pub min_select_length: f64,
    /// Which handles a rectangular crop offers.
    pub handle_placement: HandlePlacement,
    /// How presses away from handles are interpreted.
    pub interaction: InteractionMode,
    /// Whether cropping is active at all. Disabled croppers hide handles and
    /// mask and ignore gestures.
    pub enabled: bool,
    /// Whether dragging the image pans the selection.
    pub pan_enabled: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: None,
            shape: CropShape::Rectangular,
            min_crop_pixel_length: 40.0,
            min_select_length: 40.0,
            handle_placement: HandlePlacement::All,
            interaction: InteractionMode::Move,
            enabled: true,
            pan_enabled: true,
        }
    }
}

impl CropConfig {
    /// The ratio actually enforced: `1.0` for circles, otherwise the
    /// configured ratio when it is positive and finite.
    #[must_use]
    pub fn effective_aspect_ratio(&self) -> Option<f64> {
        match self.shape {
            CropShape::Circular => Some(1.0),
            CropShape::Rectangular => self.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0),
        }
    }
}
