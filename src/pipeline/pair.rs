//! Pair generation from a single source image.

use std::path::Path;

use ::image::DynamicImage;

use crate::error::Result;
use crate::image::{self, PixelTensor};

use super::resize::{downscale_bicubic, resize_to_target};
use super::{Config, TargetSize};

/// Low and high resolution tensors derived from the same source image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePair {
    /// Low-resolution tensor, `(channels, height / factor, width / factor)`.
    pub lr: PixelTensor,
    /// High-resolution tensor, `(channels, height, width)`.
    pub hr: PixelTensor,
}

impl ImagePair {
    /// Split into `(low_resolution, high_resolution)`, low first.
    #[must_use]
    pub fn into_tuple(self) -> (PixelTensor, PixelTensor) {
        (self.lr, self.hr)
    }
}

/// Turns source images into [`ImagePair`]s.
///
/// Holds only the validated configuration, so a single pipeline can be shared
/// across threads and called concurrently.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    low_res: TargetSize,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration is
    /// rejected by [`Config::validate`]: an upscale factor of zero, a zero
    /// target dimension, or a target smaller than the factor in either
    /// dimension (which would leave the low-resolution image empty).
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let low_res = config.low_res_size();
        tracing::debug!(
            "pipeline configured: hr {} -> lr {} (x{}), {:?}",
            config.target_size,
            low_res,
            config.upscale_factor,
            config.format
        );

        Ok(Self { config, low_res })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Size of the low-resolution half of every pair.
    #[must_use]
    pub const fn low_res_size(&self) -> TargetSize {
        self.low_res
    }

    /// Decode the image at `path` and produce its pair.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decode`] if the file is not a readable image.
    pub fn produce_pair<P: AsRef<Path>>(&self, path: P) -> Result<ImagePair> {
        let decoded = image::decode_image(path)?;
        Ok(self.pair_from_image(decoded))
    }

    /// Produce a pair from an already decoded image.
    ///
    /// The source is requantized to 8 bits per sample here, once, then
    /// consumed and released once the high-resolution image exists.
    #[must_use]
    pub fn pair_from_image(&self, source: DynamicImage) -> ImagePair {
        let hr_image = resize_to_target(&image::to_8bit(source), self.config.target_size);
        let lr_image = downscale_bicubic(&hr_image, self.low_res);

        ImagePair {
            lr: image::image_to_tensor(&lr_image, self.config.format),
            hr: image::image_to_tensor(&hr_image, self.config.format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Precision, RangeNorm, TensorFormat};
    use crate::Error;
    use ::image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};
    use ndarray::Axis;

    fn noise(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503)) as u8;
            Rgb([v, v.wrapping_add(85), v.wrapping_mul(3)])
        }))
    }

    #[test]
    fn test_pair_shapes() {
        let pipeline = Pipeline::new(Config::new(TargetSize::square(256), 4)).unwrap();
        let pair = pipeline.pair_from_image(noise(300, 200));

        assert_eq!(pair.hr.shape(), (3, 256, 256));
        assert_eq!(pair.lr.shape(), (3, 64, 64));
    }

    #[test]
    fn test_pair_shapes_floor_division() {
        let pipeline = Pipeline::new(Config::new(TargetSize::square(255), 4)).unwrap();
        assert_eq!(pipeline.low_res_size(), TargetSize::square(63));

        let pair = pipeline.pair_from_image(noise(100, 100));
        assert_eq!(pair.hr.shape(), (3, 255, 255));
        assert_eq!(pair.lr.shape(), (3, 63, 63));
    }

    #[test]
    fn test_non_square_target() {
        let pipeline = Pipeline::new(Config::new(TargetSize::new(96, 48), 3)).unwrap();
        let pair = pipeline.pair_from_image(noise(40, 40));

        assert_eq!(pair.hr.shape(), (3, 96, 48));
        assert_eq!(pair.lr.shape(), (3, 32, 16));
    }

    #[test]
    fn test_values_in_unit_range() {
        let pipeline = Pipeline::new(Config::new(TargetSize::square(64), 4)).unwrap();
        let pair = pipeline.pair_from_image(noise(97, 61));

        for tensor in [&pair.lr, &pair.hr] {
            assert_eq!(tensor.precision(), Precision::Full);
            let (lo, hi) = tensor.value_range().unwrap();
            assert!(lo >= 0.0 && hi <= 1.0, "range [{lo}, {hi}]");
        }
    }

    #[test]
    fn test_channels_preserved() {
        let pipeline = Pipeline::new(Config::new(TargetSize::square(32), 2)).unwrap();
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 4])));
        let gray = DynamicImage::new_luma8(10, 10);

        assert_eq!(pipeline.pair_from_image(rgba).lr.shape(), (4, 16, 16));
        assert_eq!(pipeline.pair_from_image(gray).hr.shape(), (1, 32, 32));
    }

    #[test]
    fn test_deterministic() {
        let pipeline = Pipeline::new(Config::new(TargetSize::square(48), 4)).unwrap();
        let a = pipeline.pair_from_image(noise(77, 50));
        let b = pipeline.pair_from_image(noise(77, 50));
        assert_eq!(a, b);
    }

    #[test]
    fn test_identical_configs_agree() {
        let first = Pipeline::new(Config::new(TargetSize::new(40, 60), 2)).unwrap();
        let second = Pipeline::new(Config::new(TargetSize::new(40, 60), 2)).unwrap();
        assert_eq!(
            first.pair_from_image(noise(33, 21)),
            second.pair_from_image(noise(33, 21))
        );
    }

    #[test]
    fn test_into_tuple_is_low_first() {
        let pipeline = Pipeline::new(Config::new(TargetSize::square(16), 4)).unwrap();
        let (lr, hr) = pipeline.pair_from_image(noise(16, 16)).into_tuple();
        assert_eq!(lr.shape(), (3, 4, 4));
        assert_eq!(hr.shape(), (3, 16, 16));
    }

    #[test]
    fn test_custom_format() {
        let config = Config {
            format: TensorFormat {
                range: RangeNorm::MinusOneToOne,
                precision: Precision::Half,
            },
            ..Config::new(TargetSize::square(16), 2)
        };
        let pair = Pipeline::new(config).unwrap().pair_from_image(noise(20, 20));

        assert_eq!(pair.hr.precision(), Precision::Half);
        let (lo, _) = pair.hr.value_range().unwrap();
        assert!(lo >= -1.0);
    }

    #[test]
    fn test_invalid_config() {
        let err = Pipeline::new(Config::new(TargetSize::square(256), 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_produce_pair_from_16bit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.png");
        ImageBuffer::<Rgb<u16>, Vec<u16>>::from_pixel(12, 12, Rgb([65_535, 0, 32_896]))
            .save(&path)
            .unwrap();

        let pipeline = Pipeline::new(Config::new(TargetSize::square(8), 2)).unwrap();
        let pair = pipeline.produce_pair(&path).unwrap();
        let lr = pair.lr.as_full().unwrap();

        assert_eq!(pair.lr.shape(), (3, 4, 4));
        for (channel, expected) in [(0, 255.0), (1, 0.0), (2, 128.0)] {
            let plane = lr.index_axis(Axis(0), channel);
            assert!(plane.iter().all(|&v| (v - expected / 255.0).abs() < 1e-6));
        }
    }

    #[test]
    fn test_target_smaller_than_factor() {
        let err = Pipeline::new(Config::new(TargetSize::square(3), 4)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfiguration { name, .. } if name == "target_size"
        ));
    }

    #[test]
    fn test_produce_pair_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0, 0]).unwrap();

        let pipeline = Pipeline::new(Config::default()).unwrap();
        assert!(matches!(
            pipeline.produce_pair(&path),
            Err(Error::Decode { .. })
        ));
    }
}
