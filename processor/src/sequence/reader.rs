//! Channel readers for folders of single-channel acquisitions

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::raster::io::read_gray_f32;
use crate::raster::{ChannelStack, RasterError};

/// Supported channel file extensions
const CHANNEL_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

/// Trait for reading a set of named channels as one multi-channel image
pub trait SequenceReader: Send + Sync {
    /// Read `channels` from `folder`, in the requested order
    fn read(&self, channels: &[&str], folder: &Path) -> Result<ChannelStack, RasterError>;
}

/// Reader for folders holding one grayscale image per channel.
///
/// A file belongs to a channel when its stem equals the channel name or ends
/// with `_<channel>` (e.g. `tissue12_CD3.tif`).
#[derive(Debug, Default, Clone, Copy)]
pub struct FolderSequenceReader;

impl FolderSequenceReader {
    pub fn new() -> Self {
        Self
    }

    /// List candidate channel files in the folder, sorted by name
    fn scan_folder(&self, folder: &Path) -> Result<Vec<PathBuf>, RasterError> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(folder)?.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase());

            if let Some(ext) = ext {
                if CHANNEL_EXTENSIONS.contains(&ext.as_str()) {
                    files.push(path);
                }
            }
        }

        files.sort();
        debug!("Found {} channel files in {:?}", files.len(), folder);
        Ok(files)
    }

    /// Find the file holding `channel`
    fn find_channel_file<'a>(&self, files: &'a [PathBuf], channel: &str) -> Option<&'a PathBuf> {
        let suffix = format!("_{}", channel);
        files.iter().find(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(|stem| stem == channel || stem.ends_with(&suffix))
                .unwrap_or(false)
        })
    }
}

impl SequenceReader for FolderSequenceReader {
    fn read(&self, channels: &[&str], folder: &Path) -> Result<ChannelStack, RasterError> {
        let files = self.scan_folder(folder)?;

        let mut names = Vec::with_capacity(channels.len());
        let mut planes = Vec::with_capacity(channels.len());

        for &channel in channels {
            let path = self.find_channel_file(&files, channel).ok_or_else(|| {
                RasterError::ChannelNotFound {
                    channel: channel.to_string(),
                    folder: folder.display().to_string(),
                }
            })?;

            debug!("Channel {} -> {:?}", channel, path);
            names.push(channel.to_string());
            planes.push(read_gray_f32(path)?);
        }

        let stack = ChannelStack::new(names, planes)?;
        info!(
            "Read {} channels from {:?} ({} rows x {} cols)",
            stack.channel_count(),
            folder,
            stack.rows(),
            stack.cols()
        );
        Ok(stack)
    }
}
