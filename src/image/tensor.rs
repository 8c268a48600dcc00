//! Conversion from decoded images to normalized CHW tensors.

use std::borrow::Cow;

use half::f16;
use image::DynamicImage;
use ndarray::Array3;

use super::{load::to_8bit, ImageTensor, MAX_SAMPLE};

/// Value range that 8-bit samples are mapped onto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeNorm {
    /// `[0, 255] -> [0, 1]`.
    #[default]
    ZeroToOne,
    /// `[0, 255] -> [-1, 1]`.
    MinusOneToOne,
}

impl RangeNorm {
    /// Map one 8-bit sample into this range.
    #[inline]
    #[must_use]
    pub fn normalize(self, sample: u8) -> f32 {
        match self {
            Self::ZeroToOne => f32::from(sample) / MAX_SAMPLE,
            Self::MinusOneToOne => f32::from(sample) / 127.5 - 1.0,
        }
    }

    /// Map a value in this range back to an 8-bit sample, with clamping.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn denormalize(self, value: f32) -> u8 {
        let scaled = match self {
            Self::ZeroToOne => value * MAX_SAMPLE,
            Self::MinusOneToOne => (value + 1.0) * 127.5,
        };
        // Safe: clamped to [0, 255] range before casting
        scaled.round().clamp(0.0, MAX_SAMPLE) as u8
    }
}

/// Floating point width of tensor samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Precision {
    /// `f32` samples.
    #[default]
    Full,
    /// `f16` samples.
    Half,
}

/// Range and precision requested from [`image_to_tensor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TensorFormat {
    pub range: RangeNorm,
    pub precision: Precision,
}

impl TensorFormat {
    /// `[0, 1]` at full precision. Training pairs use this format.
    pub const UNIT_FULL: Self = Self {
        range: RangeNorm::ZeroToOne,
        precision: Precision::Full,
    };
}

/// A CHW tensor at either precision.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelTensor {
    Full(ImageTensor),
    Half(Array3<f16>),
}

impl PixelTensor {
    /// `(channels, height, width)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        match self {
            Self::Full(t) => t.dim(),
            Self::Half(t) => t.dim(),
        }
    }

    #[must_use]
    pub const fn precision(&self) -> Precision {
        match self {
            Self::Full(_) => Precision::Full,
            Self::Half(_) => Precision::Half,
        }
    }

    /// Borrow the `f32` tensor, if this is a full-precision tensor.
    #[must_use]
    pub const fn as_full(&self) -> Option<&ImageTensor> {
        match self {
            Self::Full(t) => Some(t),
            Self::Half(_) => None,
        }
    }

    /// Widen to an `f32` tensor. Lossless for both variants.
    #[must_use]
    pub fn to_full(&self) -> ImageTensor {
        match self {
            Self::Full(t) => t.clone(),
            Self::Half(t) => t.mapv(f16::to_f32),
        }
    }

    /// Smallest and largest sample, or `None` for an empty tensor.
    #[must_use]
    pub fn value_range(&self) -> Option<(f32, f32)> {
        let full = self.to_full();
        let mut values = full.iter().copied();
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Convert a decoded image into a CHW tensor.
///
/// Spatial content is copied unchanged. Each 8-bit sample is linearly mapped
/// according to `format.range`, then stored as `f32` or `f16` according to
/// `format.precision`. 8-bit images are read in place; anything else is
/// requantized on a copy first.
#[must_use]
pub fn image_to_tensor(img: &DynamicImage, format: TensorFormat) -> PixelTensor {
    let img = eight_bit(img);
    let channels = usize::from(img.color().channel_count());
    let (width, height) = (img.width() as usize, img.height() as usize);
    let samples = img.as_bytes();

    let tensor = Array3::from_shape_fn((channels, height, width), |(c, y, x)| {
        format.range.normalize(samples[(y * width + x) * channels + c])
    });

    match format.precision {
        Precision::Full => PixelTensor::Full(tensor),
        Precision::Half => PixelTensor::Half(tensor.mapv(f16::from_f32)),
    }
}

fn eight_bit(img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => Cow::Borrowed(img),
        other => Cow::Owned(to_8bit(other.clone())),
    }
}
