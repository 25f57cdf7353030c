//! Raster module: image types, codec I/O and resampling
//!
//! This module provides:
//! - `GrayF32Image` and `ChannelStack` for intermediate float work
//! - `RasterError` for codec, shape and range failures
//! - Resampling helpers used to align classifier output with the channels

pub mod io;
pub mod resample;
mod types;

pub use resample::{adjust, downscale, to_unit_range, upscale_preserving_range};
pub use types::{ChannelStack, GrayF32Image, RasterError};
