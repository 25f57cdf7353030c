//! Cluster map export: merge the cell region masks into one labeled raster

use image::{GrayImage, Luma};

use super::regions::{RegionMasks, is_set};

/// Unlabeled pixel
pub const UNLABELED: u8 = 0;
/// B-cell region label
pub const B_CELL_LABEL: u8 = 100;
/// T-cell region label
pub const T_CELL_LABEL: u8 = 200;

/// Merge the B-cell and T-cell masks into a single labeled map.
///
/// T-cell labels are written last and win if both masks are set.
pub fn build_cluster_map(masks: &RegionMasks) -> GrayImage {
    let (width, height) = masks.dimensions();
    let mut map = GrayImage::from_pixel(width, height, Luma([UNLABELED]));

    for (x, y, pixel) in map.enumerate_pixels_mut() {
        if is_set(&masks.b_cell, x, y) {
            pixel[0] = B_CELL_LABEL;
        }
        if is_set(&masks.t_cell, x, y) {
            pixel[0] = T_CELL_LABEL;
        }
    }

    map
}
