//! Run configuration
//!
//! Settings are loaded from a JSON file. String fields may contain the
//! `{tissue_id}` and `{dataset}` placeholders, which are substituted when the
//! template is resolved into immutable [`Settings`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const TISSUE_PLACEHOLDER: &str = "{tissue_id}";
const DATASET_PLACEHOLDER: &str = "{dataset}";

/// Errors that can occur while loading or resolving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Either a settings template or a settings filename has to be given")]
    MissingSettings,

    #[error("IO error reading {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Setting '{0}' uses {{tissue_id}} but no tissue id is configured")]
    MissingTissueId(&'static str),
}

/// Settings as written in the settings file, before placeholder resolution
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsTemplate {
    /// Dataset name used in output filenames
    pub dataset: String,
    /// Default tissue id, replaced by an explicit override
    #[serde(default)]
    pub tissue_id: Option<String>,
    /// Classifier output image
    pub ilastik_filename: String,
    /// Folder with one image per channel
    pub input_folder: String,
    /// Folder receiving the prepared RGB image
    pub ilastik_input_rgb_folder: String,
    /// Prepared RGB image path
    pub ilastik_input_rgb_filename: String,
    /// Folder receiving overlays
    pub output_folder: String,
    /// Downsampled RGB rendering used as overlay background
    pub downsample_image: String,
    /// Folders created when the pipeline starts
    #[serde(default)]
    pub makefolders: Vec<String>,
}

/// Resolved, immutable settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dataset: String,
    pub tissue_id: Option<String>,
    pub ilastik_filename: PathBuf,
    pub input_folder: PathBuf,
    pub ilastik_input_rgb_folder: PathBuf,
    pub ilastik_input_rgb_filename: PathBuf,
    pub output_folder: PathBuf,
    pub downsample_image: PathBuf,
    pub makefolders: Vec<PathBuf>,
}

impl SettingsTemplate {
    /// Load a template from a JSON settings file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        let template = Self::from_json(&text)?;
        info!("Loaded settings from {:?}", path);
        Ok(template)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve placeholders, with `tissue_override` taking precedence over the
    /// template's own tissue id.
    pub fn resolve(&self, tissue_override: Option<&str>) -> Result<Settings, ConfigError> {
        let tissue_id = tissue_override
            .map(str::to_string)
            .or_else(|| self.tissue_id.clone());

        let substitute_tissue = |field: &'static str, value: &str| -> Result<String, ConfigError> {
            if !value.contains(TISSUE_PLACEHOLDER) {
                return Ok(value.to_string());
            }
            tissue_id
                .as_deref()
                .map(|id| value.replace(TISSUE_PLACEHOLDER, id))
                .ok_or(ConfigError::MissingTissueId(field))
        };

        let dataset = substitute_tissue("dataset", &self.dataset)?;
        let path = |field: &'static str, value: &str| -> Result<PathBuf, ConfigError> {
            let value = substitute_tissue(field, value)?;
            Ok(PathBuf::from(value.replace(DATASET_PLACEHOLDER, &dataset)))
        };

        let makefolders = self
            .makefolders
            .iter()
            .map(|folder| path("makefolders", folder))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Settings {
            ilastik_filename: path("ilastik_filename", &self.ilastik_filename)?,
            input_folder: path("input_folder", &self.input_folder)?,
            ilastik_input_rgb_folder: path(
                "ilastik_input_rgb_folder",
                &self.ilastik_input_rgb_folder,
            )?,
            ilastik_input_rgb_filename: path(
                "ilastik_input_rgb_filename",
                &self.ilastik_input_rgb_filename,
            )?,
            output_folder: path("output_folder", &self.output_folder)?,
            downsample_image: path("downsample_image", &self.downsample_image)?,
            makefolders,
            tissue_id,
            dataset,
        })
    }
}

impl Settings {
    /// Overlay output path: `<output_folder>/segmentation_overlay_ilastik_<dataset>.png`
    pub fn overlay_path(&self) -> PathBuf {
        self.output_folder
            .join(format!("segmentation_overlay_ilastik_{}.png", self.dataset))
    }
}

/// Ensure a directory exists, creating it if necessary.
/// Returns true if the directory was created.
pub fn ensure_directory(path: &Path) -> std::io::Result<bool> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created directory: {:?}", path);
        Ok(true)
    } else if path.is_dir() {
        Ok(false)
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("path {:?} exists but is not a directory", path),
        ))
    }
}
