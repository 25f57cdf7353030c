//! Region masks derived from the aligned classifier output
//!
//! The classifier encodes its three classes as intensity bands: bright pixels
//! are background, mid-gray pixels B-cell regions and dark pixels T-cell
//! regions. Each band is thresholded into a mask and cleaned by filling small
//! holes.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};
use tracing::debug;

use crate::raster::GrayF32Image;

/// Value of a set mask pixel
pub const MASK_ON: u8 = 255;

/// Intensity above which a pixel is background
pub const BACKGROUND_THRESHOLD: f32 = 250.0;
/// Intensity above which a non-background pixel is B-cell region
pub const B_CELL_THRESHOLD: f32 = 124.0;
/// Intensity below which a pixel is T-cell region
pub const T_CELL_THRESHOLD: f32 = 5.0;
/// Holes strictly smaller than this many pixels are filled
pub const HOLE_AREA_THRESHOLD: usize = 400;

/// The three masks derived from one classifier output
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMasks {
    pub background: GrayImage,
    pub b_cell: GrayImage,
    pub t_cell: GrayImage,
}

impl RegionMasks {
    pub fn dimensions(&self) -> (u32, u32) {
        self.background.dimensions()
    }
}

#[inline]
pub fn is_set(mask: &GrayImage, x: u32, y: u32) -> bool {
    mask.get_pixel(x, y)[0] > 0
}

/// Build a mask from a per-pixel predicate on intensity
pub fn threshold_mask(img: &GrayF32Image, predicate: impl Fn(f32) -> bool) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        if predicate(img.get_pixel(x, y)[0]) {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

/// Clear every pixel of `mask` that is set in `exclude`
pub fn clear_where(mask: &mut GrayImage, exclude: &GrayImage) {
    for (x, y, pixel) in mask.enumerate_pixels_mut() {
        if is_set(exclude, x, y) {
            pixel[0] = 0;
        }
    }
}

/// Fill connected components of unset pixels smaller than `area_threshold`.
///
/// Components touching the image border count as holes too.
pub fn remove_small_holes(
    mask: &GrayImage,
    area_threshold: usize,
    connectivity: Connectivity,
) -> GrayImage {
    let holes = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if is_set(mask, x, y) {
            Luma([0])
        } else {
            Luma([MASK_ON])
        }
    });

    let labels = connected_components(&holes, connectivity, Luma([0u8]));

    let max_label = labels.pixels().map(|p| p[0]).max().unwrap_or(0) as usize;
    let mut areas = vec![0usize; max_label + 1];
    for p in labels.pixels() {
        areas[p[0] as usize] += 1;
    }

    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let label = labels.get_pixel(x, y)[0] as usize;
        if is_set(mask, x, y) || (label > 0 && areas[label] < area_threshold) {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

fn fill_holes(mask: &GrayImage) -> GrayImage {
    remove_small_holes(mask, HOLE_AREA_THRESHOLD, Connectivity::Eight)
}

fn count_set(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] > 0).count()
}

/// Threshold an aligned classifier output (0-255 intensities) into masks.
///
/// B-cell pixels are removed from the background before their holes are
/// filled. After filling, background wins over both cell regions and T-cell
/// wins over B-cell, so the returned masks are pairwise disjoint.
pub fn derive_region_masks(img: &GrayF32Image) -> RegionMasks {
    let background = fill_holes(&threshold_mask(img, |v| v > BACKGROUND_THRESHOLD));

    let mut b_cell = threshold_mask(img, |v| v > B_CELL_THRESHOLD);
    clear_where(&mut b_cell, &background);
    let mut b_cell = fill_holes(&b_cell);

    let mut t_cell = fill_holes(&threshold_mask(img, |v| v < T_CELL_THRESHOLD));

    clear_where(&mut t_cell, &background);
    clear_where(&mut b_cell, &background);
    clear_where(&mut b_cell, &t_cell);

    debug!(
        "Region masks: background={}, b_cell={}, t_cell={} pixels",
        count_set(&background),
        count_set(&b_cell),
        count_set(&t_cell)
    );

    RegionMasks {
        background,
        b_cell,
        t_cell,
    }
}
