//! Image saving utilities.

use std::path::Path;

use image::{DynamicImage, ImageBuffer};

use crate::error::{Error, Result};

use super::{PixelTensor, RangeNorm};

/// Save a tensor as an image file.
///
/// The tensor is:
/// 1. Denormalized from `range` to `[0, 255]`
/// 2. Interpreted by channel count (1 luma, 2 luma+alpha, 3 RGB, 4 RGBA)
/// 3. Saved to the specified path (format inferred from extension)
///
/// # Errors
///
/// Returns an error if the tensor has no image layout or the file cannot be
/// written.
pub fn save_tensor<P: AsRef<Path>>(tensor: &PixelTensor, range: RangeNorm, path: P) -> Result<()> {
    let path = path.as_ref();

    tensor_to_image(tensor, range)?
        .save(path)
        .map_err(|source| Error::ImageSave {
            path: path.to_path_buf(),
            source,
        })
}

/// Convert a CHW tensor back to an 8-bit image.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the channel count is not 1 to 4 or the
/// spatial size does not fit an image.
pub fn tensor_to_image(tensor: &PixelTensor, range: RangeNorm) -> Result<DynamicImage> {
    let full = tensor.to_full();
    let (channels, height, width) = full.dim();

    let dims_err = || Error::ShapeMismatch {
        expected: "(1..=4, H, W) image tensor".to_string(),
        actual: format!("{:?}", full.dim()),
    };
    let w = u32::try_from(width).map_err(|_| dims_err())?;
    let h = u32::try_from(height).map_err(|_| dims_err())?;

    // HWC interleaved samples
    let mut samples = Vec::with_capacity(channels * height * width);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                samples.push(range.denormalize(full[[c, y, x]]));
            }
        }
    }

    let img = match channels {
        1 => ImageBuffer::from_raw(w, h, samples).map(DynamicImage::ImageLuma8),
        2 => ImageBuffer::from_raw(w, h, samples).map(DynamicImage::ImageLumaA8),
        3 => ImageBuffer::from_raw(w, h, samples).map(DynamicImage::ImageRgb8),
        4 => ImageBuffer::from_raw(w, h, samples).map(DynamicImage::ImageRgba8),
        _ => None,
    };

    img.ok_or_else(dims_err)
}
