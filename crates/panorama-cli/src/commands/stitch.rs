use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use panorama_core::consts::LARGE_CANVAS_WARNING_BYTES;
use panorama_core::io::cleanup::timestamped_name;
use panorama_core::io::image_io::{load_color_image, save_color_image};
use panorama_core::pipeline::config::{PanoramaConfig, ReductionOrder, StitchConfig, ValidationConfig};
use panorama_core::pipeline::{
    estimate_peak_canvas_bytes, stitch_panorama_reported, validate_inputs, ProgressReporter,
    StitchStage,
};
use tracing::warn;

use crate::progress::BarReporter;
use crate::summary::{print_result_summary, print_stitch_summary, print_warning};

#[derive(Clone, ValueEnum)]
pub enum OrderArg {
    Sequential,
    BalancedTree,
}

#[derive(Args)]
pub struct StitchArgs {
    /// Input images, ordered left to right
    pub images: Vec<PathBuf>,

    /// Stitching config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum cross-checked matches per pair
    #[arg(long)]
    pub min_matches: Option<usize>,

    /// RANSAC reprojection threshold in pixels
    #[arg(long)]
    pub reproj_threshold: Option<f64>,

    /// Seam feather width as a fraction of the narrower image
    #[arg(long)]
    pub window_percent: Option<f32>,

    /// Reduction order
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Save the match visualization of the final pair here
    #[arg(long)]
    pub diagnostic: Option<PathBuf>,

    /// Require exactly this many input images
    #[arg(long)]
    pub expect: Option<usize>,

    /// Minimum width and height of every input image
    #[arg(long)]
    pub min_side: Option<usize>,

    /// Prefix output file names with the current Unix time
    #[arg(long)]
    pub timestamp: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &StitchArgs) -> Result<()> {
    let mut config = build_config(args)?;
    if config.inputs.is_empty() {
        bail!("No input images given (pass paths or set `inputs` in the config file)");
    }
    if args.timestamp {
        config.output = with_timestamp(&config.output);
        config.diagnostic = config.diagnostic.as_deref().map(with_timestamp);
    }
    // Not part of the config file; only the final pair's visualization is written.
    config.stitching.render_diagnostics = config.diagnostic.is_some();
    config.stitching.validate().context("Invalid stitching config")?;

    print_stitch_summary(&config);

    let reporter = Arc::new(BarReporter::new());

    reporter.begin_stage(StitchStage::Loading, Some(config.inputs.len()));
    let mut images = Vec::with_capacity(config.inputs.len());
    for (i, path) in config.inputs.iter().enumerate() {
        let image = load_color_image(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        images.push(image);
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    reporter.begin_stage(StitchStage::Validating, None);
    validate_inputs(&images, &config.validation).context("Input validation failed")?;
    reporter.finish_stage();

    let peak = estimate_peak_canvas_bytes(&images);
    if peak > LARGE_CANVAS_WARNING_BYTES {
        warn!(peak_bytes = peak, "Large blend canvas expected");
        print_warning(&format!(
            "largest blend canvas may need {:.1} GiB",
            peak as f64 / (1024.0 * 1024.0 * 1024.0)
        ));
    }

    let panorama = stitch_panorama_reported(images, &config.stitching, reporter.clone())
        .context("Stitching failed")?;

    reporter.begin_stage(StitchStage::Writing, None);
    save_color_image(&panorama.image, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    if let (Some(path), Some(diagnostic)) = (&config.diagnostic, &panorama.diagnostic) {
        save_color_image(diagnostic, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    reporter.finish_stage();
    reporter.done();

    print_result_summary(&panorama, &config);
    Ok(())
}

/// Config file (or defaults), then explicit flags on top.
fn build_config(args: &StitchArgs) -> Result<PanoramaConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid panorama config")?
    } else {
        PanoramaConfig {
            inputs: Vec::new(),
            output: PathBuf::from("panorama.png"),
            diagnostic: None,
            validation: ValidationConfig::default(),
            stitching: StitchConfig::default(),
        }
    };

    if !args.images.is_empty() {
        config.inputs = args.images.clone();
    }
    if let Some(ref output) = args.output {
        config.output = output.clone();
    }
    if args.diagnostic.is_some() {
        config.diagnostic = args.diagnostic.clone();
    }
    if let Some(n) = args.min_matches {
        config.stitching.min_match_count = n;
    }
    if let Some(px) = args.reproj_threshold {
        config.stitching.reprojection_threshold = px;
    }
    if let Some(pct) = args.window_percent {
        config.stitching.smoothing_window_percent = pct;
    }
    if let Some(ref order) = args.order {
        config.stitching.order = match order {
            OrderArg::Sequential => ReductionOrder::Sequential,
            OrderArg::BalancedTree => ReductionOrder::BalancedTree,
        };
    }
    if args.expect.is_some() {
        config.validation.expected_count = args.expect;
    }
    if let Some(side) = args.min_side {
        config.validation.min_side = side;
    }
    Ok(config)
}

fn with_timestamp(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(timestamped_name(&name))
}
