//! Resampling helpers: canvas alignment, upscaling and downscaling
//!
//! The classifier runs on a downscaled copy of the tissue, so its output has
//! to be brought back onto the full-resolution pixel grid before it can be
//! compared against the original channels.

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma, Pixel};

use super::types::GrayF32Image;

/// Place `img` on a `nb_rows` x `nb_cols` canvas filled with `fill`.
///
/// Rows and columns beyond the target are cropped from the top-left first,
/// then the remaining image is centered with offsets `(target - source) / 2`.
/// Each axis is handled independently, so an image can be cropped along one
/// axis and padded along the other.
pub fn adjust<P>(
    img: &ImageBuffer<P, Vec<P::Subpixel>>,
    nb_rows: u32,
    nb_cols: u32,
    fill: P,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let mut out = ImageBuffer::from_pixel(nb_cols, nb_rows, fill);

    let rows = img.height().min(nb_rows);
    let cols = img.width().min(nb_cols);
    let delta_rows = (nb_rows - rows) / 2;
    let delta_cols = (nb_cols - cols) / 2;

    for y in 0..rows {
        for x in 0..cols {
            out.put_pixel(x + delta_cols, y + delta_rows, *img.get_pixel(x, y));
        }
    }

    out
}

/// Convert an 8-bit image to floats in [0, 1]
pub fn to_unit_range(img: &GrayImage) -> GrayF32Image {
    GrayF32Image::from_fn(img.width(), img.height(), |x, y| {
        Luma([img.get_pixel(x, y)[0] as f32 / 255.0])
    })
}

/// Upscale an 8-bit image by an integer factor with bilinear interpolation.
///
/// The returned samples stay in the 0-255 intensity range of the source.
pub fn upscale_preserving_range(img: &GrayImage, factor: u32) -> GrayF32Image {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return GrayF32Image::new(width * factor, height * factor);
    }

    // Float resampling clamps to [0, 1], so interpolate in unit range and scale back.
    let unit = to_unit_range(img);
    let upscaled = imageops::resize(
        &unit,
        width * factor,
        height * factor,
        FilterType::Triangle,
    );

    GrayF32Image::from_fn(upscaled.width(), upscaled.height(), |x, y| {
        Luma([upscaled.get_pixel(x, y)[0] * 255.0])
    })
}

/// Output length of an axis rescaled by `scale`
pub fn scaled_len(len: u32, scale: f64) -> u32 {
    ((len as f64 * scale).round() as u32).max(1)
}

/// Anti-aliased downscale of a float plane by `scale` (< 1)
pub fn downscale(plane: &GrayF32Image, scale: f64) -> GrayF32Image {
    let (width, height) = plane.dimensions();
    if width == 0 || height == 0 {
        return plane.clone();
    }

    imageops::resize(
        plane,
        scaled_len(width, scale),
        scaled_len(height, scale),
        FilterType::Triangle,
    )
}
