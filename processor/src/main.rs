use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use ilastik_processor::ClassifierPipeline;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ilastik-process")]
#[command(
    version,
    about = "Prepare images for ilastik and post-process its results into region maps",
    long_about = None
)]
struct Cli {
    /// Settings file for the analysis
    #[arg(short = 's', long = "settings_file", value_name = "FILE")]
    settings_file: PathBuf,

    /// Tissue id; defaults to the tissue id from the settings file
    #[arg(short = 't', long = "tissue_id", value_name = "ID")]
    tissue_id: Option<String>,

    /// Prepare an RGB file for ilastik processing
    #[arg(long)]
    prepare: bool,

    /// Normalize the ilastik output to the full 8-bit range
    #[arg(long)]
    post: bool,

    /// Save the overlay of the B- and T-regions on top of the image
    #[arg(long = "save_overlay")]
    save_overlay: bool,

    /// Filename for an empty cluster map
    #[arg(long = "export_empty_cluster_map", value_name = "FILE")]
    export_empty_cluster_map: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ilastik_processor=info,ilastik_process=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let pipeline = ClassifierPipeline::builder()
        .with_settings_file(&cli.settings_file)
        .with_tissue_id(cli.tissue_id.clone())
        .build()
        .with_context(|| format!("Failed to set up pipeline from {:?}", cli.settings_file))?;
    info!(
        "Dataset {} (tissue id: {:?})",
        pipeline.settings().dataset,
        pipeline.settings().tissue_id
    );

    if cli.prepare {
        println!(" *** Preparation for Ilastik ***");
        pipeline.prepare().context("RGB preparation failed")?;
    }

    if cli.post {
        println!(" *** Postprocessing ***");
        pipeline.post_process().context("Post-processing failed")?;
    }

    if cli.save_overlay {
        println!(" *** Saving overlay to ***");
        let filename = pipeline.save_overlay().context("Saving overlay failed")?;
        println!("Saved: {}", filename.display());
    }

    if let Some(ref filename) = cli.export_empty_cluster_map {
        println!(" *** Exporting empty cluster map ***");
        pipeline
            .export_empty_cluster_map(filename)
            .context("Cluster map export failed")?;
    }

    Ok(())
}
