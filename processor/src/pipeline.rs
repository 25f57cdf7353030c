//! Classifier pipeline driver
//!
//! Reads inputs from disk, runs the pure transforms from the other modules
//! and writes the results. Every operation is a blocking sequence; any error
//! is returned before the output is written.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::{Luma, Rgb};
use metrics::histogram;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, Settings, SettingsTemplate, ensure_directory};
use crate::overlay::{ColorMap, Overlays, relabel_segmentation};
use crate::postprocess::normalize_full_range;
use crate::prepare::{PREPARE_SCALE, RGB_CHANNELS, build_classifier_rgb};
use crate::raster::io::{read_gray8, read_gray_f32, read_rgb8, write_gray8, write_rgb8};
use crate::raster::{RasterError, adjust, upscale_preserving_range};
use crate::segment::{RegionMasks, build_cluster_map, derive_region_masks};
use crate::sequence::{FolderSequenceReader, SequenceReader};

/// Channel defining the full-resolution pixel grid
pub const REFERENCE_CHANNEL: &str = "CD3";
/// Ratio between full resolution and the classifier's input
pub const CLASSIFIER_UPSCALE: u32 = 4;
/// Intensity used where the aligned classifier output has no data
pub const ALIGN_FILL: f32 = 255.0;

/// Errors that can occur while running the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    #[error("Failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builder for [`ClassifierPipeline`]
#[derive(Default)]
pub struct PipelineBuilder {
    template: Option<SettingsTemplate>,
    settings_file: Option<PathBuf>,
    tissue_id: Option<String>,
    reader: Option<Box<dyn SequenceReader>>,
}

impl PipelineBuilder {
    /// Use an already loaded settings template
    pub fn with_template(mut self, template: SettingsTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Load the settings template from a file (ignored if a template is given)
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Override the tissue id from the settings
    pub fn with_tissue_id(mut self, tissue_id: Option<String>) -> Self {
        self.tissue_id = tissue_id;
        self
    }

    /// Use a custom channel reader instead of [`FolderSequenceReader`]
    pub fn with_reader(mut self, reader: Box<dyn SequenceReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Resolve the settings and create the configured folders
    pub fn build(self) -> Result<ClassifierPipeline, PipelineError> {
        let template = match (self.template, self.settings_file) {
            (Some(template), _) => template,
            (None, Some(path)) => {
                let path = std::path::absolute(&path).unwrap_or(path);
                SettingsTemplate::load(&path)?
            }
            (None, None) => return Err(ConfigError::MissingSettings.into()),
        };

        let settings = template.resolve(self.tissue_id.as_deref())?;
        if let Some(ref tissue_id) = self.tissue_id {
            info!("Overwriting settings for tissue id: {}", tissue_id);
            info!("output_folder: {:?}", settings.output_folder);
        }

        for folder in &settings.makefolders {
            ensure_directory(folder).map_err(|source| PipelineError::CreateDir {
                path: folder.clone(),
                source,
            })?;
        }

        Ok(ClassifierPipeline {
            settings,
            reader: self
                .reader
                .unwrap_or_else(|| Box::new(FolderSequenceReader::new())),
        })
    }
}

/// Driver for preparing classifier input and processing its output
pub struct ClassifierPipeline {
    settings: Settings,
    reader: Box<dyn SequenceReader>,
}

impl ClassifierPipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read the classifier output and derive the three region masks on the
    /// full-resolution grid of the reference channel.
    pub fn read_region_images(&self) -> Result<RegionMasks, PipelineError> {
        let start = Instant::now();

        let small = read_gray8(&self.settings.ilastik_filename)?;
        let upscaled = upscale_preserving_range(&small, CLASSIFIER_UPSCALE);

        let reference = self
            .reader
            .read(&[REFERENCE_CHANNEL], &self.settings.input_folder)?;
        debug!(
            "Aligning {}x{} classifier output to {} rows x {} cols",
            upscaled.width(),
            upscaled.height(),
            reference.rows(),
            reference.cols()
        );
        let aligned = adjust(
            &upscaled,
            reference.rows(),
            reference.cols(),
            Luma([ALIGN_FILL]),
        );

        let masks = derive_region_masks(&aligned);
        histogram!("ilastik_stage_duration_seconds", "stage" => "segment")
            .record(start.elapsed());
        Ok(masks)
    }

    /// Write the merged B-cell / T-cell label map to `filename`
    pub fn export_empty_cluster_map(&self, filename: &Path) -> Result<(), PipelineError> {
        let masks = self.read_region_images()?;
        let cluster_map = build_cluster_map(&masks);
        write_gray8(filename, &cluster_map)?;
        info!("Exported cluster map: {:?}", filename);
        Ok(())
    }

    /// Stretch the classifier output to the full 8-bit range, in place
    pub fn post_process(&self) -> Result<(), PipelineError> {
        let start = Instant::now();
        let filename = &self.settings.ilastik_filename;

        let img = read_gray_f32(filename)?;
        let normalized = normalize_full_range(&img)?;
        write_gray8(filename, &normalized)?;

        histogram!("ilastik_stage_duration_seconds", "stage" => "post")
            .record(start.elapsed());
        info!("Normalized {:?}", filename);
        Ok(())
    }

    /// Build the RGB input image for the classifier
    pub fn prepare(&self) -> Result<PathBuf, PipelineError> {
        let start = Instant::now();
        let rgb_folder = &self.settings.ilastik_input_rgb_folder;
        ensure_directory(rgb_folder).map_err(|source| PipelineError::CreateDir {
            path: rgb_folder.clone(),
            source,
        })?;

        let stack = self
            .reader
            .read(&RGB_CHANNELS, &self.settings.input_folder)?;
        let rgb = build_classifier_rgb(&stack, PREPARE_SCALE);

        let filename = self.settings.ilastik_input_rgb_filename.clone();
        write_rgb8(&filename, &rgb)?;

        histogram!("ilastik_stage_duration_seconds", "stage" => "prepare")
            .record(start.elapsed());
        info!(
            "Prepared {}x{} RGB image: {:?}",
            rgb.width(),
            rgb.height(),
            filename
        );
        Ok(filename)
    }

    /// Paint the classifier labels over the downsampled RGB image and return
    /// the written path
    pub fn save_overlay(&self) -> Result<PathBuf, PipelineError> {
        let start = Instant::now();

        let mut segmentation = read_gray8(&self.settings.ilastik_filename)?;
        relabel_segmentation(&mut segmentation);

        let rgb_image = read_rgb8(&self.settings.downsample_image)?;
        let colors = ColorMap::from([(1, Rgb([255, 0, 0])), (2, Rgb([0, 255, 0]))]);
        let overlay =
            Overlays::default().overlay_rgb_img(&rgb_image, &segmentation, &colors, true)?;

        let filename = self.settings.overlay_path();
        write_rgb8(&filename, &overlay)?;

        histogram!("ilastik_stage_duration_seconds", "stage" => "overlay")
            .record(start.elapsed());
        info!("Saved overlay: {:?}", filename);
        Ok(filename)
    }
}
