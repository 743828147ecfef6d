use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use panorama_core::pipeline::config::{PanoramaConfig, StitchConfig, ValidationConfig};

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a full default PanoramaConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = PanoramaConfig {
        inputs: vec![
            PathBuf::from("left.jpg"),
            PathBuf::from("center.jpg"),
            PathBuf::from("right.jpg"),
        ],
        output: PathBuf::from("panorama.png"),
        diagnostic: Some(PathBuf::from("matches.png")),
        validation: ValidationConfig::default(),
        stitching: StitchConfig::default(),
    };
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
