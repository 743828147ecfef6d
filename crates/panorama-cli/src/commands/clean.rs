use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use panorama_core::consts::DEFAULT_ARTIFACT_MAX_AGE_HOURS;
use panorama_core::io::cleanup::cleanup_old_artifacts;

#[derive(Args)]
pub struct CleanArgs {
    /// Directory holding stitched outputs
    pub dir: PathBuf,

    /// Delete artifacts older than this many hours
    #[arg(long, default_value_t = DEFAULT_ARTIFACT_MAX_AGE_HOURS)]
    pub max_age_hours: u64,
}

pub fn run(args: &CleanArgs) -> Result<()> {
    let max_age = Duration::from_secs(args.max_age_hours * 3600);
    let removed = cleanup_old_artifacts(&args.dir, max_age)
        .with_context(|| format!("Failed to clean {}", args.dir.display()))?;

    for path in &removed {
        println!("Removed {}", path.display());
    }
    println!(
        "{} artifact(s) older than {}h removed from {}",
        removed.len(),
        args.max_age_hours,
        args.dir.display()
    );
    Ok(())
}
