use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use panorama_core::io::image_io::load_color_image;
use panorama_core::pipeline::estimate_peak_canvas_bytes;

#[derive(Args)]
pub struct InfoArgs {
    /// Input images, ordered left to right
    #[arg(required = true)]
    pub images: Vec<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let image = load_color_image(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        println!(
            "{:<40} {}x{}  ({:.1} MB in memory)",
            path.display(),
            image.width(),
            image.height(),
            image.byte_size() as f64 / (1024.0 * 1024.0)
        );
        images.push(image);
    }

    let total_width: usize = images.iter().map(|i| i.width()).sum();
    let peak = estimate_peak_canvas_bytes(&images);
    println!();
    println!("Images:       {}", images.len());
    println!("Stitch steps: {}", images.len().saturating_sub(1));
    println!("Total width:  {} px", total_width);
    println!("Peak canvas:  {:.1} MB", peak as f64 / (1024.0 * 1024.0));

    Ok(())
}
