//! Raster file I/O
//!
//! All formats are inferred from the file extension by the `image` codecs.

use std::path::Path;

use image::{GrayImage, RgbImage};
use tracing::debug;

use super::types::{GrayF32Image, RasterError};

/// Read any supported image as 8-bit grayscale
pub fn read_gray8(path: &Path) -> Result<GrayImage, RasterError> {
    let img = image::open(path)?;
    debug!(
        "Read {:?}: {}x{} {:?}",
        path,
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.to_luma8())
}

/// Read any supported image as a float plane with samples in [0, 1].
///
/// 16-bit sources keep their full precision.
pub fn read_gray_f32(path: &Path) -> Result<GrayF32Image, RasterError> {
    let img = image::open(path)?;
    debug!(
        "Read {:?}: {}x{} {:?}",
        path,
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.to_luma32f())
}

/// Read any supported image as 8-bit RGB
pub fn read_rgb8(path: &Path) -> Result<RgbImage, RasterError> {
    let img = image::open(path)?;
    Ok(img.to_rgb8())
}

pub fn write_gray8(path: &Path, img: &GrayImage) -> Result<(), RasterError> {
    img.save(path)?;
    debug!("Wrote {:?} ({}x{})", path, img.width(), img.height());
    Ok(())
}

pub fn write_rgb8(path: &Path, img: &RgbImage) -> Result<(), RasterError> {
    img.save(path)?;
    debug!("Wrote {:?} ({}x{})", path, img.width(), img.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};

    #[test]
    fn test_gray_roundtrip_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let img = GrayImage::from_fn(7, 3, |x, y| Luma([(x * 30 + y) as u8]));

        write_gray8(&path, &img).unwrap();
        let back = read_gray8(&path).unwrap();

        assert_eq!(back, img);
    }

    #[test]
    fn test_read_sixteen_bit_as_unit_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.png");
        let img: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 65535 }]));
        img.save(&path).unwrap();

        let plane = read_gray_f32(&path).unwrap();

        assert_eq!(plane.get_pixel(0, 0)[0], 0.0);
        assert!((plane.get_pixel(1, 0)[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_read_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_rgb8(&dir.path().join("missing.png"));
        assert!(result.is_err());
    }

    #[test]
    fn test_rgb_write_tiff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.tif");
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));

        write_rgb8(&path, &img).unwrap();

        assert_eq!(read_rgb8(&path).unwrap(), img);
    }
}
