//! Relabeling of raw classifier output into overlay labels
//!
//! The classifier exports its classes as fixed gray levels: near-black,
//! mid-gray (~127) and near-white for background. These bands are a
//! convention of that export, not something derived from the data.

use image::GrayImage;

/// Label for the near-black band
pub const DARK_LABEL: u8 = 1;
/// Label for the mid-gray band
pub const MID_LABEL: u8 = 2;
/// Label for background pixels
pub const NO_LABEL: u8 = 0;

/// Rewrite classifier gray levels into overlay labels, in place.
///
/// Applied in order: `< 10` becomes 1, `(120, 135)` becomes 2, `> 245`
/// becomes 0. Values outside these bands are left untouched.
pub fn relabel_segmentation(segmentation: &mut GrayImage) {
    for pixel in segmentation.pixels_mut() {
        if pixel[0] < 10 {
            pixel[0] = DARK_LABEL;
        }
    }
    for pixel in segmentation.pixels_mut() {
        if pixel[0] > 120 && pixel[0] < 135 {
            pixel[0] = MID_LABEL;
        }
    }
    for pixel in segmentation.pixels_mut() {
        if pixel[0] > 245 {
            pixel[0] = NO_LABEL;
        }
    }
}
