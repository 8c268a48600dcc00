//! The two resize stages of pair generation.
//!
//! The stages have different contracts on purpose. Stage one only has to hit
//! the target dimensions. Stage two produces the low-resolution input the model
//! learns to invert, so its filter is fixed.

use image::{imageops::FilterType, DynamicImage};

use super::TargetSize;

/// Filter used to bring a source image to the high-resolution target.
pub const TARGET_FILTER: FilterType = FilterType::Triangle;

/// Filter used for the low-resolution downscale. Must stay bicubic.
pub const DOWNSCALE_FILTER: FilterType = FilterType::CatmullRom;

/// Stage one: resize to exactly `size`, ignoring aspect ratio.
///
/// Only the output dimensions are contractual; the bilinear filter is an
/// implementation choice.
#[must_use]
pub fn resize_to_target(img: &DynamicImage, size: TargetSize) -> DynamicImage {
    img.resize_exact(size.width, size.height, TARGET_FILTER)
}

/// Stage two: antialiased bicubic downscale to `size`.
///
/// `image`'s resampler widens the kernel support by the scale ratio when
/// shrinking, so the Catmull-Rom kernel acts as an antialiasing low-pass
/// filter rather than point-sampling the source.
#[must_use]
pub fn downscale_bicubic(img: &DynamicImage, size: TargetSize) -> DynamicImage {
    img.resize_exact(size.width, size.height, DOWNSCALE_FILTER)
}
