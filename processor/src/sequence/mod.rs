//! Sequence module for reading multi-channel acquisitions
//!
//! This module provides:
//! - `SequenceReader` trait for abstracting channel sources
//! - `FolderSequenceReader` for one-file-per-channel folders

mod reader;

pub use reader::{FolderSequenceReader, SequenceReader};
