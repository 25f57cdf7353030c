//! Post-normalization of classifier output to the full 8-bit range

use image::{GrayImage, Luma};

use crate::raster::{GrayF32Image, RasterError};

/// Linearly map the image minimum to 0 and its maximum to 255.
///
/// A constant image has no range to stretch and is rejected.
pub fn normalize_full_range(img: &GrayF32Image) -> Result<GrayImage, RasterError> {
    let (min, max) = img
        .pixels()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[0]), hi.max(p[0]))
        });

    if max <= min {
        let value = if min.is_finite() { min } else { 0.0 };
        return Err(RasterError::DegenerateRange(value));
    }

    let span = (max - min) as f64;
    Ok(GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let v = img.get_pixel(x, y)[0];
        let scaled = (v - min) as f64 / span * 255.0;
        Luma([scaled.clamp(0.0, 255.0) as u8])
    }))
}
