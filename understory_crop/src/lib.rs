// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_crop --heading-base-level=0

//! Understory Crop: a headless interactive crop-region engine.
//!
//! This crate models the geometry behind an image crop control. Given an
//! image size and a canvas size it maintains:
//! - The authoritative crop rectangle in image pixels.
//! - The mapping between image space and display space, which always fits the
//!   crop rectangle into the canvas.
//! - The display-space selection, its eight resize handles, and the geometry
//!   of the dimmed overlay.
//!
//! It does **not** decode, resample, or paint images. Callers are expected to:
//! - Feed pointer input through [`CropGesture`], or call the operations on
//!   [`CropRegionState`] directly.
//! - Paint the image with [`AffineMap::to_affine`] from
//!   [`CropRegionState::forward_map`], then the overlay from [`MaskGeometry`]
//!   and handles from [`HandleSet`].
//! - Read back [`CropRegionState::cropped_region`] to do the actual cropping.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size, Vec2};
//! use understory_crop::{CropRegionState, HandlePosition};
//!
//! let mut crop = CropRegionState::default();
//! crop.set_canvas_size(Size::new(800.0, 400.0));
//! crop.load_image(2000.0, 1000.0).unwrap();
//!
//! // Lock a square ratio: the selection re-fits around its center.
//! crop.set_aspect_ratio(Some(1.0)).unwrap();
//! assert_eq!(crop.cropped_region(), Some(Rect::new(500.0, 0.0, 1500.0, 1000.0)));
//!
//! // Drag the right edge inward; the ratio holds.
//! crop.resize_via_handle(HandlePosition::Right, Vec2::new(-40.0, 0.0));
//! crop.finish_gesture();
//! let region = crop.cropped_region().unwrap();
//! assert!((region.width() - region.height()).abs() < 1e-6);
//!
//! // Zoom in around the canvas center.
//! crop.zoom(10.0, Point::new(400.0, 200.0));
//! assert!(crop.cropped_region().unwrap().width() < region.width());
//! ```
//!
//! ## Design notes
//!
//! - Every setter re-derives the display state synchronously; there is no
//!   partially updated state.
//! - Gesture operations return `Option<CropUpdate>`: `None` means the step was
//!   rejected and nothing changed. Programmatic setters return
//!   `Result<_, CropError>`.
//! - The engine never installs a logger. Rejections are reported through the
//!   [`log`] facade at debug level.
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

pub mod geometry;

mod config;
mod error;
mod gesture;
mod handle;
mod layout;
mod map;
mod mask;
mod resize;
mod state;

pub use config::{CropConfig, CropShape, InteractionMode};
pub use error::CropError;
pub use gesture::{CropGesture, GestureTarget, HANDLE_HIT_RADIUS, WHEEL_ZOOM_STEP};
pub use handle::{Edges, HandlePlacement, HandlePosition, HandleSet, HandleState};
pub use layout::ViewportLayout;
pub use map::AffineMap;
pub use mask::{MaskGeometry, MaskHole};
pub use resize::{ResizeRequest, solve_resize};
pub use state::{CropPhase, CropRegionState, CropUpdate};
