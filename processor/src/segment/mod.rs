//! Segmentation of classifier output into region masks and cluster maps

pub mod cluster_map;
pub mod regions;

pub use cluster_map::{B_CELL_LABEL, T_CELL_LABEL, UNLABELED, build_cluster_map};
pub use regions::{RegionMasks, derive_region_masks, remove_small_holes};
