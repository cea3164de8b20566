// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::Size;

/// Why a crop operation was refused.
///
/// Every refusal leaves the [`CropRegionState`](crate::CropRegionState)
/// exactly as it was before the call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CropError {
    /// The operation needs a loaded image.
    NoImage,
    /// A rectangle, size, or length had a zero, negative, or non-finite extent.
    InvalidGeometry,
    /// The image is smaller than the minimum crop size and was not adopted.
    ImageTooSmall {
        /// Image width in pixels.
        width: f64,
        /// Image height in pixels.
        height: f64,
        /// Minimum crop size in effect.
        min: Size,
    },
    /// The region is smaller than the minimum crop size.
    BelowMinimumSize {
        /// Minimum crop size in effect.
        min: Size,
    },
    /// The region extends outside the image.
    OutOfBounds,
    /// The region does not match the locked aspect ratio.
    AspectRatioMismatch {
        /// Locked ratio.
        expected: f64,
        /// Ratio of the rejected region.
        actual: f64,
    },
    /// No rectangle with this ratio satisfies the minimum size inside the
    /// image; the ratio lock was dropped.
    AspectRatioUnsatisfiable {
        /// Requested ratio.
        ratio: f64,
    },
}

impl fmt::Display for CropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImage => f.write_str("no image is loaded"),
            Self::InvalidGeometry => {
                f.write_str("geometry has a zero, negative, or non-finite extent")
            }
            Self::ImageTooSmall { width, height, min } => write!(
                f,
                "image {width}x{height} is smaller than the minimum crop size {}x{}",
                min.width, min.height
            ),
            Self::BelowMinimumSize { min } => write!(
                f,
                "region is smaller than the minimum crop size {}x{}",
                min.width, min.height
            ),
            Self::OutOfBounds => f.write_str("region extends outside the image"),
            Self::AspectRatioMismatch { expected, actual } => write!(
                f,
                "region aspect ratio {actual} does not match the locked ratio {expected}"
            ),
            Self::AspectRatioUnsatisfiable { ratio } => write!(
                f,
                "no region with aspect ratio {ratio} fits the image at the minimum crop size"
            ),
        }
    }
}

impl core::error::Error for CropError {}
