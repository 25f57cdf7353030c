//! RGB preparation for the pixel classifier
//!
//! Three marker channels are downscaled, contrast-stretched between robust
//! percentiles and stacked into an 8-bit RGB image that the classifier can
//! annotate and segment.

use image::{Rgb, RgbImage};
use tracing::{debug, warn};

use crate::raster::{ChannelStack, GrayF32Image, downscale};

/// Channels stacked into red, green and blue
pub const RGB_CHANNELS: [&str; 3] = ["CD3", "CD19", "E-Cadherin"];
/// Spatial scale of the prepared image
pub const PREPARE_SCALE: f64 = 0.25;
/// Percentile mapped to 0
pub const LOW_PERCENTILE: f64 = 10.0;
/// Percentile mapped to 255
pub const HIGH_PERCENTILE: f64 = 99.9;

/// Percentile with linear interpolation between closest ranks.
///
/// Returns 0 for an empty slice.
pub fn percentile(values: &[f32], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    let lo = sorted[lower] as f64;
    let hi = sorted[upper] as f64;
    lo + (hi - lo) * frac
}

/// Stretch a plane so `[low, high]` maps to `[0, 255]`, clipping outside.
///
/// A zero-width range yields an all-zero channel.
pub fn stretch_to_u8(plane: &GrayF32Image, low: f64, high: f64) -> Vec<u8> {
    let span = high - low;
    plane
        .pixels()
        .map(|p| {
            if span <= 0.0 {
                return 0;
            }
            let normalized = ((p[0] as f64 - low) / span).clamp(0.0, 1.0);
            (255.0 * normalized) as u8
        })
        .collect()
}

/// Build the classifier input from up to three channels.
///
/// Percentiles are computed per channel on the downscaled plane. Channels
/// missing from the stack stay black.
pub fn build_classifier_rgb(stack: &ChannelStack, scale: f64) -> RgbImage {
    let downscaled: Vec<GrayF32Image> = stack
        .planes
        .iter()
        .take(3)
        .map(|plane| downscale(plane, scale))
        .collect();

    let (width, height) = downscaled
        .first()
        .map(|p| p.dimensions())
        .unwrap_or((0, 0));
    let mut rgb = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));

    for (channel, plane) in downscaled.iter().enumerate() {
        let low = percentile(plane.as_raw(), LOW_PERCENTILE);
        let high = percentile(plane.as_raw(), HIGH_PERCENTILE);
        debug!(
            "Channel {} ({}): p{} = {:.5}, p{} = {:.5}",
            channel,
            stack.names.get(channel).map(String::as_str).unwrap_or("?"),
            LOW_PERCENTILE,
            low,
            HIGH_PERCENTILE,
            high
        );

        if high <= low {
            warn!(
                "Channel {} has no contrast between percentiles, leaving it black",
                channel
            );
        }

        let stretched = stretch_to_u8(plane, low, high);
        for (pixel, value) in rgb.pixels_mut().zip(stretched) {
            pixel[channel] = value;
        }
    }

    rgb
}
