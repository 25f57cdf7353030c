//! Overlay module: relabeling and compositing of classifier output
//!
//! Produces a visual check of the segmentation by painting the B-cell and
//! T-cell labels on top of a downsampled RGB rendering of the tissue.

pub mod composite;
pub mod relabel;

pub use composite::{ColorMap, Overlays};
pub use relabel::relabel_segmentation;
