//! ilastik region processor library
//!
//! Prepares multi-channel microscopy images for the ilastik pixel classifier
//! and turns its output into region masks, cluster maps and overlays.

pub mod config;
pub mod overlay;
pub mod pipeline;
pub mod postprocess;
pub mod prepare;
pub mod raster;
pub mod segment;
pub mod sequence;

// Re-export commonly used types
pub use config::{ConfigError, Settings, SettingsTemplate};
pub use pipeline::{ClassifierPipeline, PipelineBuilder, PipelineError};
pub use raster::{ChannelStack, GrayF32Image, RasterError};
pub use segment::RegionMasks;
pub use sequence::{FolderSequenceReader, SequenceReader};
