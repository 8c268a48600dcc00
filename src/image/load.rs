//! Image decoding utilities.

use std::path::Path;

use image::{DynamicImage, ImageError, ImageReader};

use crate::error::{Error, Result};

/// Decode the image at `path`.
///
/// The format is guessed from the file contents, so catalogued files without
/// an extension still decode. The image is returned as decoded, at its native
/// sample depth.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file cannot be opened or is not a
/// decodable image.
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let decode_err = |source: ImageError| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;

    tracing::trace!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img)
}

/// Convert an image to 8 bits per sample, keeping its channel layout.
///
/// Luma stays luma, alpha stays alpha; 16-bit and float images are
/// requantized to `[0, 255]`.
#[must_use]
pub fn to_8bit(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => img,
        other => {
            let color = other.color();
            match (color.has_color(), color.has_alpha()) {
                (false, false) => DynamicImage::ImageLuma8(other.to_luma8()),
                (false, true) => DynamicImage::ImageLumaA8(other.to_luma_alpha8()),
                (true, false) => DynamicImage::ImageRgb8(other.to_rgb8()),
                (true, true) => DynamicImage::ImageRgba8(other.to_rgba8()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ColorType;

    #[test]
    fn test_to_8bit_keeps_rgb8() {
        let img = DynamicImage::new_rgb8(4, 3);
        let out = to_8bit(img);
        assert_eq!(out.color(), ColorType::Rgb8);
        assert_eq!((out.width(), out.height()), (4, 3));
    }

    #[test]
    fn test_to_8bit_requantizes_16bit() {
        assert_eq!(to_8bit(DynamicImage::new_luma16(2, 2)).color(), ColorType::L8);
        assert_eq!(to_8bit(DynamicImage::new_rgba16(2, 2)).color(), ColorType::Rgba8);
        assert_eq!(to_8bit(DynamicImage::new_rgb32f(2, 2)).color(), ColorType::Rgb8);
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode_image("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_decode_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"this is not an image").unwrap();

        let err = decode_image(&path).unwrap_err();
        assert!(matches!(err, Error::Decode { path: p, .. } if p == path));
    }

    #[test]
    fn test_decode_keeps_native_depth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.png");
        image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_pixel(3, 2, image::Luma([40_000]))
            .save(&path)
            .unwrap();

        let img = decode_image(&path).unwrap();
        assert_eq!(img.color(), ColorType::L16);
        assert_eq!(to_8bit(img).color(), ColorType::L8);
    }

    #[test]
    fn test_decode_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        image::RgbImage::from_pixel(5, 7, image::Rgb([10, 20, 30]))
            .save(&png)
            .unwrap();
        let bare = dir.path().join("sample");
        std::fs::rename(&png, &bare).unwrap();

        let img = decode_image(&bare).unwrap();
        assert_eq!((img.width(), img.height()), (5, 7));
        assert_eq!(img.color(), ColorType::Rgb8);
    }
}
