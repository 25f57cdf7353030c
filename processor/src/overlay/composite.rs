//! Compositing of label images onto RGB images

use std::collections::BTreeMap;

use image::{GrayImage, Rgb, RgbImage};

use crate::raster::RasterError;

/// Color per label value; labels without an entry are left transparent
pub type ColorMap = BTreeMap<u8, Rgb<u8>>;

/// Label overlay renderer
#[derive(Debug, Clone, Copy)]
pub struct Overlays {
    /// Weight of the label color when blending
    alpha: f32,
}

impl Default for Overlays {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Overlays {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Paint `labels` onto a copy of `rgb_image`.
    ///
    /// With `blend` the label color is mixed with the underlying pixel using
    /// the configured alpha, otherwise the pixel is replaced.
    pub fn overlay_rgb_img(
        &self,
        rgb_image: &RgbImage,
        labels: &GrayImage,
        colors: &ColorMap,
        blend: bool,
    ) -> Result<RgbImage, RasterError> {
        if rgb_image.dimensions() != labels.dimensions() {
            return Err(RasterError::DimensionMismatch {
                expected: rgb_image.dimensions(),
                actual: labels.dimensions(),
            });
        }

        let mut out = rgb_image.clone();
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let Some(color) = colors.get(&labels.get_pixel(x, y)[0]) else {
                continue;
            };

            *pixel = if blend {
                self.mix(pixel, color)
            } else {
                *color
            };
        }

        Ok(out)
    }

    fn mix(&self, base: &Rgb<u8>, color: &Rgb<u8>) -> Rgb<u8> {
        let mut mixed = [0u8; 3];
        for (c, value) in mixed.iter_mut().enumerate() {
            let v = (1.0 - self.alpha) * base[c] as f32 + self.alpha * color[c] as f32;
            *value = v.round().clamp(0.0, 255.0) as u8;
        }
        Rgb(mixed)
    }
}
