//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

use std::path::{Path, PathBuf};

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use ilastik_processor::ClassifierPipeline;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

/// Full-resolution size of the synthetic channels (cols, rows)
pub const CHANNEL_SIZE: (u32, u32) = (160, 120);

/// A temporary analysis folder with channels and a settings file
pub struct TestWorkspace {
    pub dir: TempDir,
}

impl TestWorkspace {
    /// Create a workspace with the three marker channels written as 16-bit TIFFs
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let workspace = Self { dir };

        std::fs::create_dir_all(workspace.channels_dir()).unwrap();
        for (i, channel) in ["CD3", "CD19", "E-Cadherin"].iter().enumerate() {
            let plane = noisy_channel(CHANNEL_SIZE.0, CHANNEL_SIZE.1, i as u64);
            plane
                .save(workspace.channels_dir().join(format!("tissue_{}.tif", channel)))
                .unwrap();
        }

        workspace.write_settings();
        workspace
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn channels_dir(&self) -> PathBuf {
        self.root().join("T1").join("channels")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root().join("settings.json")
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.root().join("T1").join("ilastik").join("result_T1.png")
    }

    pub fn downsample_path(&self) -> PathBuf {
        self.root().join("T1").join("small.png")
    }

    fn write_settings(&self) {
        let root = self.root().display().to_string();
        let settings = serde_json::json!({
            "dataset": "result_{tissue_id}",
            "tissue_id": "T1",
            "input_folder": format!("{}/{{tissue_id}}/channels", root),
            "ilastik_filename": format!("{}/{{tissue_id}}/ilastik/{{dataset}}.png", root),
            "ilastik_input_rgb_folder": format!("{}/{{tissue_id}}/rgb", root),
            "ilastik_input_rgb_filename": format!("{}/{{tissue_id}}/rgb/rgb_{{dataset}}.png", root),
            "output_folder": format!("{}/{{tissue_id}}/out", root),
            "downsample_image": format!("{}/{{tissue_id}}/small.png", root),
            "makefolders": [
                format!("{}/{{tissue_id}}/out", root),
                format!("{}/{{tissue_id}}/ilastik", root)
            ]
        });
        std::fs::write(
            self.settings_path(),
            serde_json::to_string_pretty(&settings).unwrap(),
        )
        .unwrap();
    }

    /// Build a pipeline from the settings file, with the given tissue override
    pub fn pipeline(&self, tissue_id: Option<&str>) -> ClassifierPipeline {
        ClassifierPipeline::builder()
            .with_settings_file(self.settings_path())
            .with_tissue_id(tissue_id.map(str::to_string))
            .build()
            .expect("Failed to build pipeline")
    }

    /// Write a classifier output for tissue T1
    pub fn write_classifier_output(&self, img: &GrayImage) {
        let path = self.classifier_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        img.save(path).unwrap();
    }

    /// Write the downsampled RGB rendering for tissue T1
    pub fn write_downsample_image(&self, img: &RgbImage) {
        let path = self.downsample_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        img.save(path).unwrap();
    }
}

/// Channel with a bright blob on a noisy dark background
pub fn noisy_channel(width: u32, height: u32, seed: u64) -> ImageBuffer<Luma<u16>, Vec<u16>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    ImageBuffer::from_fn(width, height, |x, y| {
        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
        let signal = if d < 30.0 { 30000 } else { 2000 };
        Luma([signal + rng.random_range(0..4000u16)])
    })
}

/// Classifier output with three vertical bands: dark, mid-gray and white
pub fn banded_classifier_output(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _| {
        Luma([match x * 3 / width {
            0 => 0,
            1 => 127,
            _ => 255,
        }])
    })
}

pub fn gray_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([100, 100, 100]))
}

/// Initialize test logging for detailed output
#[allow(dead_code)]
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ilastik_processor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
