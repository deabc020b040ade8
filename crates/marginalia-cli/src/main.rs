// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Marginalia: extract margin annotations from manuscript scans.
//
// Entry point. Initialises logging, builds the extractor from flags and an
// optional JSON config, runs one extraction and writes the crop, the
// diagnostic panel and a JSON summary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use marginalia_core::{ExtractorConfig, MarginaliaError};
use marginalia_extract::raster::save_image;
use marginalia_extract::{ComponentExtractor, InputLayout, ModelClassifier, ModelConfig};

/// Extract the annotation crop from a scanned manuscript page.
#[derive(Debug, Parser)]
#[command(name = "marginalia", version, about)]
struct Args {
    /// Scan to process (TIFF, JPEG, PNG).
    image: PathBuf,

    /// Component classifier model (.rten).
    #[arg(long)]
    model: PathBuf,

    /// Model expects channels-first input ([1, 1, H, W]).
    #[arg(long)]
    channels_first: bool,

    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Expected number of characters on the annotation line.
    #[arg(long)]
    num_chars: Option<u32>,

    /// Exclusive lower bound on component area.
    #[arg(long)]
    min_area: Option<u32>,

    /// Exclusive upper bound on component area.
    #[arg(long)]
    max_area: Option<u32>,

    /// Exclusive lower bound on the shorter bounding-box side.
    #[arg(long)]
    min_dim: Option<u32>,

    /// Seed for diagnostic rendering.
    #[arg(long)]
    seed: Option<u64>,

    /// Log per-step summaries, including "No annotation found".
    #[arg(short, long)]
    verbose: bool,

    /// Where to write the cropped image.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the 4-panel diagnostic image.
    #[arg(long)]
    diagnostics: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "extraction failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), MarginaliaError> {
    let config = build_config(&args)?;
    tracing::info!(image = %args.image.display(), num_chars = config.num_chars, "Marginalia starting");

    let layout = if args.channels_first {
        InputLayout::Nchw
    } else {
        InputLayout::Nhwc
    };
    let classifier = ModelClassifier::new(ModelConfig::new(&args.model).with_layout(layout))?;
    let extractor = ComponentExtractor::new(config, classifier)?;

    let extraction = extractor.extract_path(&args.image)?;

    if let Some(path) = &args.output {
        save_image(&extraction.crop, path)?;
        tracing::info!(path = %path.display(), "Crop written");
    }
    if let (Some(path), Some(diagnostics)) = (&args.diagnostics, &extraction.diagnostics) {
        diagnostics.save(path)?;
        tracing::info!(path = %path.display(), "Diagnostics written");
    }

    println!("{}", serde_json::to_string_pretty(&extraction.summary())?);
    Ok(())
}

/// Merge the optional config file with command-line overrides.
fn build_config(args: &Args) -> Result<ExtractorConfig, MarginaliaError> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_json_file(path)?,
        None => {
            let num_chars = args.num_chars.ok_or_else(|| {
                MarginaliaError::InvalidConfig(
                    "--num-chars is required without --config".into(),
                )
            })?;
            ExtractorConfig::new(num_chars)
        }
    };

    if let Some(num_chars) = args.num_chars {
        config.num_chars = num_chars;
    }
    if let Some(min_area) = args.min_area {
        config.min_area = min_area;
    }
    if let Some(max_area) = args.max_area {
        config.max_area = max_area;
    }
    if let Some(min_dim) = args.min_dim {
        config.min_dim = min_dim;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.verbose |= args.verbose;
    config.plot = args.diagnostics.is_some();

    config.validate()?;
    Ok(config)
}
