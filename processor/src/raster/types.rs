//! Raster types and error definitions

use image::{ImageBuffer, Luma};
use thiserror::Error;

/// Single-channel float image used for intermediate computations
pub type GrayF32Image = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Errors that can occur when reading, transforming, or writing rasters
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Channel '{channel}' not found in {folder}")]
    ChannelNotFound { channel: String, folder: String },

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Image has a degenerate intensity range (min = max = {0})")]
    DegenerateRange(f32),
}

/// Multi-channel image made of equally sized planes, one per named channel
#[derive(Debug, Clone)]
pub struct ChannelStack {
    /// Channel names in plane order
    pub names: Vec<String>,
    /// One plane per channel, samples in [0, 1]
    pub planes: Vec<GrayF32Image>,
}

impl ChannelStack {
    /// Build a stack, checking that all planes share the same dimensions
    pub fn new(names: Vec<String>, planes: Vec<GrayF32Image>) -> Result<Self, RasterError> {
        if let Some(first) = planes.first() {
            let expected = first.dimensions();
            if let Some(other) = planes.iter().find(|p| p.dimensions() != expected) {
                return Err(RasterError::DimensionMismatch {
                    expected,
                    actual: other.dimensions(),
                });
            }
        }
        Ok(Self { names, planes })
    }

    /// Number of rows (image height)
    pub fn rows(&self) -> u32 {
        self.planes.first().map(|p| p.height()).unwrap_or(0)
    }

    /// Number of columns (image width)
    pub fn cols(&self) -> u32 {
        self.planes.first().map(|p| p.width()).unwrap_or(0)
    }

    pub fn channel_count(&self) -> usize {
        self.planes.len()
    }

    /// Look up a plane by channel name
    pub fn plane(&self, name: &str) -> Option<&GrayF32Image> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.planes.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_rejects_mismatched_planes() {
        let result = ChannelStack::new(
            vec!["CD3".to_string(), "CD19".to_string()],
            vec![GrayF32Image::new(4, 3), GrayF32Image::new(4, 4)],
        );

        match result {
            Err(RasterError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, (4, 3));
                assert_eq!(actual, (4, 4));
            }
            other => panic!("Expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_stack_shape_and_lookup() {
        let stack = ChannelStack::new(
            vec!["CD3".to_string(), "CD19".to_string()],
            vec![
                GrayF32Image::from_pixel(5, 2, Luma([0.25])),
                GrayF32Image::from_pixel(5, 2, Luma([0.75])),
            ],
        )
        .unwrap();

        assert_eq!(stack.rows(), 2);
        assert_eq!(stack.cols(), 5);
        assert_eq!(stack.channel_count(), 2);
        assert_eq!(stack.plane("CD19").unwrap().get_pixel(0, 0)[0], 0.75);
        assert!(stack.plane("E-Cadherin").is_none());
    }

    #[test]
    fn test_empty_stack_has_zero_shape() {
        let stack = ChannelStack::new(vec![], vec![]).unwrap();
        assert_eq!(stack.rows(), 0);
        assert_eq!(stack.cols(), 0);
    }
}
