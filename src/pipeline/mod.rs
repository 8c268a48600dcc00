//! Resize-and-encode pipeline producing low/high resolution pairs.

mod pair;
mod resize;

pub use pair::{ImagePair, Pipeline};
pub use resize::{downscale_bicubic, resize_to_target, DOWNSCALE_FILTER, TARGET_FILTER};

use std::fmt;

use crate::error::{Error, Result};
use crate::image::TensorFormat;

/// Default high-resolution edge length.
pub const DEFAULT_TARGET_EDGE: u32 = 256;

/// Default ratio between high and low resolution.
pub const DEFAULT_UPSCALE_FACTOR: u32 = 4;

/// Spatial size of an image, height first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub height: u32,
    pub width: u32,
}

impl TargetSize {
    #[must_use]
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    #[must_use]
    pub const fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    /// Size divided by `factor` with floor division in each dimension.
    ///
    /// `(255, 255) / 4` is `(63, 63)`; the remainder is dropped, not rounded.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is zero.
    #[must_use]
    pub const fn div_floor(self, factor: u32) -> Self {
        Self::new(self.height / factor, self.width / factor)
    }
}

impl From<u32> for TargetSize {
    fn from(edge: u32) -> Self {
        Self::square(edge)
    }
}

impl From<(u32, u32)> for TargetSize {
    fn from((height, width): (u32, u32)) -> Self {
        Self::new(height, width)
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// Configuration for pair generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// High-resolution output size.
    pub target_size: TargetSize,

    /// Ratio between high and low resolution. Must be at least 1.
    pub upscale_factor: u32,

    /// Tensor range and precision for both halves of a pair.
    pub format: TensorFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_size: TargetSize::square(DEFAULT_TARGET_EDGE),
            upscale_factor: DEFAULT_UPSCALE_FACTOR,
            format: TensorFormat::UNIT_FULL,
        }
    }
}

impl Config {
    /// Configuration with the default `[0, 1]` full-precision format.
    #[must_use]
    pub fn new(target_size: TargetSize, upscale_factor: u32) -> Self {
        Self {
            target_size,
            upscale_factor,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the factor is zero or the target is too small to
    /// derive a non-empty low-resolution size.
    pub fn validate(&self) -> Result<()> {
        if self.upscale_factor == 0 {
            return Err(Error::InvalidConfiguration {
                name: "upscale_factor".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.target_size.height == 0 || self.target_size.width == 0 {
            return Err(Error::InvalidConfiguration {
                name: "target_size".to_string(),
                reason: format!("{} has a zero dimension", self.target_size),
            });
        }

        let low = self.target_size.div_floor(self.upscale_factor);
        if low.height == 0 || low.width == 0 {
            return Err(Error::InvalidConfiguration {
                name: "target_size".to_string(),
                reason: format!(
                    "{} is smaller than upscale factor {}",
                    self.target_size, self.upscale_factor
                ),
            });
        }

        Ok(())
    }

    /// Low-resolution size derived from the target by floor division.
    /// Only meaningful once [`Config::validate`] has passed.
    #[must_use]
    pub(crate) const fn low_res_size(&self) -> TargetSize {
        self.target_size.div_floor(self.upscale_factor)
    }
}
